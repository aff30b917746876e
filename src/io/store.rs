//! Artifact persistence: three files per training run.
//!
//! A run produces `model.cfpt`, `scaler.cfpt`, and `schema.cfpt` in one
//! directory. Loading refuses partial or mixed sets: all three files must
//! be present, agree on feature width, and the schema must carry the
//! fingerprint recorded in the model metadata.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::native::{ArtifactKind, DeserializeError, NativeCodec, SerializeError};
use crate::artifact::{Artifact, ArtifactMeta};
use crate::forest::RandomForest;
use crate::scaler::StandardScaler;
use crate::schema::FeatureSchema;

/// File name of the forest model artifact.
pub const MODEL_FILE: &str = "model.cfpt";
/// File name of the scaler artifact.
pub const SCALER_FILE: &str = "scaler.cfpt";
/// File name of the schema artifact.
pub const SCHEMA_FILE: &str = "schema.cfpt";

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ArtifactError {
    /// One or more artifact files are absent.
    #[error("missing artifact files: {}", join_paths(.paths))]
    Missing { paths: Vec<PathBuf> },

    /// An artifact file could not be read or decoded.
    #[error("failed to read {path}: {source}", path = .path.display())]
    Read {
        path: PathBuf,
        source: DeserializeError,
    },

    /// An artifact file could not be written.
    #[error("failed to write {path}: {source}", path = .path.display())]
    Write {
        path: PathBuf,
        source: SerializeError,
    },

    /// Schema fingerprint does not match the model metadata; the files come
    /// from different training runs.
    #[error(
        "schema fingerprint {schema:#010x} does not match model fingerprint {model:#010x}"
    )]
    FingerprintSkew { schema: u32, model: u32 },

    /// Feature widths disagree between the artifact files.
    #[error(
        "feature width skew: schema has {schema} columns, scaler {scaler}, model {model}"
    )]
    WidthSkew {
        schema: usize,
        scaler: usize,
        model: usize,
    },
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// ArtifactPaths
// ============================================================================

/// Locations of the three files of one artifact set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub schema: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names inside a directory.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
            schema: dir.join(SCHEMA_FILE),
        }
    }

    /// Paths of this set that do not exist on disk.
    pub fn missing(&self) -> Vec<PathBuf> {
        [&self.model, &self.scaler, &self.schema]
            .into_iter()
            .filter(|path| !path.exists())
            .cloned()
            .collect()
    }
}

// ============================================================================
// Save / load
// ============================================================================

/// Model file payload: forest plus metadata. Postcard is positional, so the
/// borrow and owned forms encode identically.
#[derive(Serialize)]
struct ModelPayloadRef<'a> {
    meta: &'a ArtifactMeta,
    forest: &'a RandomForest,
}

#[derive(Deserialize)]
struct ModelPayload {
    meta: ArtifactMeta,
    forest: RandomForest,
}

impl Artifact {
    /// Write the three artifact files.
    pub fn save(&self, paths: &ArtifactPaths) -> Result<(), ArtifactError> {
        let codec = NativeCodec::new();
        let num_columns = self.schema.len() as u32;

        let model_bytes = codec
            .serialize(
                ArtifactKind::Model,
                num_columns,
                &ModelPayloadRef {
                    meta: &self.meta,
                    forest: &self.forest,
                },
            )
            .map_err(|source| ArtifactError::Write {
                path: paths.model.clone(),
                source,
            })?;
        write_file(&paths.model, &model_bytes)?;

        let scaler_bytes = codec
            .serialize(ArtifactKind::Scaler, num_columns, &self.scaler)
            .map_err(|source| ArtifactError::Write {
                path: paths.scaler.clone(),
                source,
            })?;
        write_file(&paths.scaler, &scaler_bytes)?;

        let schema_bytes = codec
            .serialize(ArtifactKind::Schema, num_columns, &self.schema)
            .map_err(|source| ArtifactError::Write {
                path: paths.schema.clone(),
                source,
            })?;
        write_file(&paths.schema, &schema_bytes)?;

        Ok(())
    }

    /// Load and cross-check the three artifact files.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        // Report every absent file at once, not just the first.
        let missing = paths.missing();
        if !missing.is_empty() {
            return Err(ArtifactError::Missing { paths: missing });
        }

        let codec = NativeCodec::new();
        let (_, payload): (_, ModelPayload) =
            read_file(&codec, ArtifactKind::Model, &paths.model)?;
        let (_, scaler): (_, StandardScaler) =
            read_file(&codec, ArtifactKind::Scaler, &paths.scaler)?;
        let (_, schema): (_, FeatureSchema) =
            read_file(&codec, ArtifactKind::Schema, &paths.schema)?;

        let schema_width = schema.len();
        let scaler_width = scaler.num_features().unwrap_or(0);
        let model_width = payload.forest.num_features() as usize;
        if schema_width != scaler_width || schema_width != model_width {
            return Err(ArtifactError::WidthSkew {
                schema: schema_width,
                scaler: scaler_width,
                model: model_width,
            });
        }

        let fingerprint = schema.fingerprint();
        if fingerprint != payload.meta.schema_fingerprint {
            return Err(ArtifactError::FingerprintSkew {
                schema: fingerprint,
                model: payload.meta.schema_fingerprint,
            });
        }

        Ok(Self {
            schema,
            scaler,
            forest: payload.forest,
            meta: payload.meta,
        })
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ArtifactError> {
    fs::write(path, bytes).map_err(|e| ArtifactError::Write {
        path: path.to_path_buf(),
        source: SerializeError::Io(e),
    })
}

fn read_file<T: for<'de> serde::Deserialize<'de>>(
    codec: &NativeCodec,
    kind: ArtifactKind,
    path: &Path,
) -> Result<(super::native::FormatHeader, T), ArtifactError> {
    let bytes = fs::read(path).map_err(|e| ArtifactError::Read {
        path: path.to_path_buf(),
        source: DeserializeError::Io(e),
    })?;
    codec
        .deserialize(kind, &bytes)
        .map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })
}

// ============================================================================
// Tests
// ============================================================================
