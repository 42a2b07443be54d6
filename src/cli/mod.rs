// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// Parses the command line with clap and hands off to Layer 2.
//
// Two commands are supported:
//   1. `prepare`: builds and writes train/validation/test splits
//   2. `inspect`: reports what the class folders contain

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PrepareArgs, SourceArgs};

#[derive(Parser, Debug)]
#[command(
    name = "class-split",
    version,
    about = "Prepare class-folder image tensors as train/validation/test splits for a CNN trainer."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. The CLI layer only routes
    /// and prints.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Inspect(args) => run_inspect(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    let output_dir = args.output_dir.clone();
    let splits = PrepareUseCase::new(args.into()).execute()?;

    let [h, w] = splits.sample_shape;
    println!("Sample shape: {h}x{w}, {} classes", splits.num_classes);
    println!("{} train samples", splits.train.len());
    println!("{} validation samples", splits.validation.len());
    println!("{} test samples", splits.test.len());
    println!("Prepared splits saved to '{output_dir}'");
    Ok(())
}

fn run_inspect(args: SourceArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let inventory = InspectUseCase::new(args.into()).execute()?;

    let [h, w] = inventory.sample_shape;
    for c in &inventory.classes {
        println!("{:<12} label {:<3} {:>6} files {:>8} samples", c.class, c.label, c.files, c.samples);
    }
    println!("Total: {} samples of {h}x{w}", inventory.total_samples());
    Ok(())
}
