//! `footprint train` implementation.

use std::fs;

use anyhow::{Context, Result};

use crate::artifact::TargetTransform;
use crate::cli::{Cli, TrainArgs};
use crate::data::load_training_csv;
use crate::forest::ForestParams;
use crate::io::ArtifactPaths;
use crate::training::{Trainer, TrainerParams};

pub fn run(cli: &Cli, args: &TrainArgs) -> Result<()> {
    let frame = load_training_csv(&args.data)
        .with_context(|| format!("loading training data from {}", args.data.display()))?;
    if cli.verbose > 0 {
        eprintln!("[train] loaded {} survey rows", frame.len());
    }

    let params = TrainerParams {
        forest: ForestParams {
            num_trees: args.trees,
            seed: args.seed,
            ..ForestParams::default()
        },
        target_transform: if args.raw_target {
            TargetTransform::Identity
        } else {
            TargetTransform::Log1p
        },
        valid_fraction: args.valid_fraction,
        verbosity: cli.verbosity(),
    };
    let (artifact, report) = Trainer::new(params).fit(&frame)?;

    fs::create_dir_all(&args.out)
        .with_context(|| format!("creating output directory {}", args.out.display()))?;
    let paths = ArtifactPaths::in_dir(&args.out);
    artifact.save(&paths)?;

    let scope = if report.valid_rows > 0 { "valid" } else { "train" };
    println!(
        "fitted {} trees on {} rows: {scope}-rmse {:.2} kg, {scope}-mae {:.2} kg",
        report.num_trees, report.rows, report.rmse, report.mae
    );
    println!("wrote artifacts to {}", args.out.display());
    Ok(())
}
