//! `footprint predict` implementation.

use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};

use crate::artifact::Artifact;
use crate::cli::{Cli, PredictArgs};
use crate::estimate::Estimator;
use crate::io::ArtifactPaths;
use crate::survey::SurveyResponse;

pub fn run(cli: &Cli, args: &PredictArgs) -> Result<()> {
    let file = File::open(&args.survey)
        .with_context(|| format!("opening survey file {}", args.survey.display()))?;
    let response: SurveyResponse = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing survey file {}", args.survey.display()))?;

    let paths = ArtifactPaths::in_dir(&args.models);
    let artifact = Artifact::load(&paths)
        .with_context(|| format!("loading artifacts from {}", args.models.display()))?;
    let estimator = Estimator::new(artifact)?;

    if cli.verbose > 0 {
        eprintln!(
            "[predict] schema v{} with {} features, fingerprint {:#010x}",
            estimator.schema().version(),
            estimator.schema().len(),
            estimator.schema().fingerprint()
        );
    }

    let result = estimator.estimate(&response)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let noun = if result.trees_owed == 1 { "tree" } else { "trees" };
        println!("estimated emission: {} kg CO2 per month", result.kilograms);
        println!(
            "equivalent to the yearly absorption of {} {noun}",
            result.trees_owed
        );
    }
    Ok(())
}
