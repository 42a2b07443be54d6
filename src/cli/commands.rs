// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `prepare` and `inspect`, and all
// their flags. Defaults reproduce the classic setup: two class
// folders under data/clips, MATLAB-style [H, W, n] stacks under
// the key "regions", a 70/20/10 split and 8-bit pixels.

use clap::{Args, Subcommand};

use crate::application::{pipeline::PipelineConfig, prepare_use_case::PrepareConfig};
use crate::data::loader::{DEFAULT_EXTENSION, DEFAULT_KEY};
use crate::domain::{
    layout::{ChannelLayout, PixelScale, SampleAxis},
    split::SplitBounds,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load, shuffle, split and normalize the class folders
    Prepare(PrepareArgs),

    /// Report files, samples and sample shape per class
    Inspect(SourceArgs),
}

/// Where the samples come from and how their files are laid out
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory with one subdirectory per class
    #[arg(long, default_value = "data/clips")]
    pub data_root: String,

    /// Class subdirectories in label order (label 0 first)
    #[arg(long, value_delimiter = ',', default_value = "class0,class1")]
    pub classes: Vec<String>,

    /// Name of the tensor inside each payload file
    #[arg(long, default_value = DEFAULT_KEY)]
    pub key: String,

    /// Extension of payload files
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Axis of a 3D payload that indexes samples
    #[arg(long, value_enum, default_value_t = SampleAxis::Last)]
    pub sample_axis: SampleAxis,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Fraction of the data at which the training split ends
    #[arg(long, default_value_t = 0.7)]
    pub train_end: f64,

    /// Fraction of the data at which the validation split ends
    #[arg(long, default_value_t = 0.9)]
    pub validation_end: f64,

    /// Shuffle seed; omit for a fresh shuffle every run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pixel divisor: a number such as 255, or `max`
    #[arg(long, default_value = "255")]
    pub pixel_scale: PixelScale,

    /// Width of the one-hot targets (defaults to the number of classes)
    #[arg(long)]
    pub num_classes: Option<usize>,

    /// Where the prepared splits are written
    #[arg(long, default_value = "prepared")]
    pub output_dir: String,

    /// Position of the channel axis in image batches
    #[arg(long, value_enum, default_value_t = ChannelLayout::ChannelsFirst)]
    pub layout: ChannelLayout,

    /// Batch size for the hand-off check
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,
}

impl From<SourceArgs> for PipelineConfig {
    fn from(a: SourceArgs) -> Self {
        PipelineConfig {
            data_root:   a.data_root,
            classes:     a.classes,
            key:         a.key,
            extension:   a.extension,
            sample_axis: a.sample_axis,
            ..PipelineConfig::default()
        }
    }
}

/// The application layer never sees clap types.
impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        let pipeline = PipelineConfig {
            bounds:      SplitBounds {
                train_end:      a.train_end,
                validation_end: a.validation_end,
            },
            seed:        a.seed,
            pixel_scale: a.pixel_scale,
            num_classes: a.num_classes,
            ..PipelineConfig::from(a.source)
        };
        PrepareConfig {
            pipeline,
            output_dir: a.output_dir,
            layout:     a.layout,
            batch_size: a.batch_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_prepare_defaults() {
        let cli = Cli::parse_from(["class-split", "prepare"]);
        let Commands::Prepare(args) = cli.command else {
            panic!("expected prepare");
        };
        let cfg = PrepareConfig::from(args);
        assert_eq!(cfg, PrepareConfig::default());
    }

    #[test]
    fn test_prepare_flags() {
        let cli = Cli::parse_from([
            "class-split",
            "prepare",
            "--data-root", "clips",
            "--classes", "noise,speech,music",
            "--sample-axis", "first",
            "--train-end", "0.8",
            "--validation-end", "0.9",
            "--seed", "7",
            "--pixel-scale", "max",
            "--layout", "channels-last",
        ]);
        let Commands::Prepare(args) = cli.command else {
            panic!("expected prepare");
        };
        let cfg = PrepareConfig::from(args);

        assert_eq!(cfg.pipeline.data_root, "clips");
        assert_eq!(cfg.pipeline.classes, vec!["noise", "speech", "music"]);
        assert_eq!(cfg.pipeline.sample_axis, SampleAxis::First);
        assert_eq!(cfg.pipeline.bounds, SplitBounds { train_end: 0.8, validation_end: 0.9 });
        assert_eq!(cfg.pipeline.seed, Some(7));
        assert_eq!(cfg.pipeline.pixel_scale, PixelScale::DatasetMax);
        assert_eq!(cfg.pipeline.num_classes(), 3);
        assert_eq!(cfg.layout, ChannelLayout::ChannelsLast);
    }

    #[test]
    fn test_bad_pixel_scale_rejected() {
        assert!(Cli::try_parse_from(["class-split", "prepare", "--pixel-scale", "0"]).is_err());
    }
}
