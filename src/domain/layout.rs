// ============================================================
// Layer 3: Array Layout Options
// ============================================================
// Small enums describing how arrays are laid out on disk and how
// they should be laid out for the trainer. They derive
// clap::ValueEnum so the CLI can accept them directly, and serde
// so they are recorded in prepare_config.json.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

/// Which axis of a 3D payload indexes the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SampleAxis {
    /// [n, H, W]
    First,
    /// [H, W, n], the layout of MATLAB `regions` exports
    #[default]
    Last,
}

/// Where the single image channel goes in the trainer's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelLayout {
    /// [N, 1, H, W]
    #[default]
    ChannelsFirst,
    /// [N, H, W, 1]
    ChannelsLast,
}

impl ChannelLayout {
    /// Full 4D shape for `n` images of `height x width`.
    pub fn shape(self, n: usize, height: usize, width: usize) -> [usize; 4] {
        match self {
            ChannelLayout::ChannelsFirst => [n, 1, height, width],
            ChannelLayout::ChannelsLast  => [n, height, width, 1],
        }
    }
}

/// Divisor that maps raw pixel values into [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PixelScale {
    /// Divide by a fixed value, 255 for 8-bit images
    Fixed(f32),
    /// Divide by the largest value in the loaded dataset
    DatasetMax,
}

impl Default for PixelScale {
    fn default() -> Self {
        PixelScale::Fixed(255.0)
    }
}

impl FromStr for PixelScale {
    type Err = PipelineError;

    /// Accepts `max` or a positive number such as `255`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            return Ok(PixelScale::DatasetMax);
        }
        let value: f32 = s.parse().map_err(|_| PipelineError::InvalidScale(f32::NAN))?;
        if value.is_finite() && value > 0.0 {
            Ok(PixelScale::Fixed(value))
        } else {
            Err(PipelineError::InvalidScale(value))
        }
    }
}

impl fmt::Display for PixelScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelScale::Fixed(v)   => write!(f, "{v}"),
            PixelScale::DatasetMax => f.write_str("max"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_scale_parsing() {
        assert_eq!("255".parse::<PixelScale>().unwrap(), PixelScale::Fixed(255.0));
        assert_eq!("MAX".parse::<PixelScale>().unwrap(), PixelScale::DatasetMax);
        assert!("0".parse::<PixelScale>().is_err());
        assert!("-1".parse::<PixelScale>().is_err());
        assert!("bright".parse::<PixelScale>().is_err());
    }

    #[test]
    fn test_channel_layout_shape() {
        assert_eq!(ChannelLayout::ChannelsFirst.shape(8, 32, 32), [8, 1, 32, 32]);
        assert_eq!(ChannelLayout::ChannelsLast.shape(8, 32, 32), [8, 32, 32, 1]);
    }
}
