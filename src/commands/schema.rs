//! `footprint schema` implementation.

use std::fs;

use anyhow::{Context, Result};

use crate::cli::{Cli, SchemaArgs};
use crate::io::{ArtifactKind, ArtifactPaths, NativeCodec};
use crate::schema::FeatureSchema;

pub fn run(cli: &Cli, args: &SchemaArgs) -> Result<()> {
    let schema = match &args.models {
        Some(dir) => {
            let path = ArtifactPaths::in_dir(dir).schema;
            let bytes = fs::read(&path)
                .with_context(|| format!("reading schema artifact {}", path.display()))?;
            let (_, schema): (_, FeatureSchema) = NativeCodec::new()
                .deserialize(ArtifactKind::Schema, &bytes)
                .with_context(|| format!("decoding schema artifact {}", path.display()))?;
            if cli.verbose > 0 {
                eprintln!("[schema] read {}", path.display());
            }
            schema
        }
        None => FeatureSchema::builtin(),
    };

    println!(
        "schema v{} ({} columns, fingerprint {:#010x})",
        schema.version(),
        schema.len(),
        schema.fingerprint()
    );
    for column in schema.columns() {
        println!("  {column}");
    }
    Ok(())
}
