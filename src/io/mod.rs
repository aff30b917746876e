//! Artifact storage: binary codec and on-disk layout.

pub mod native;
mod store;

pub use native::{
    ArtifactKind, DeserializeError, FormatHeader, NativeCodec, SerializeError, HEADER_SIZE, MAGIC,
};
pub use store::{ArtifactError, ArtifactPaths, MODEL_FILE, SCALER_FILE, SCHEMA_FILE};
