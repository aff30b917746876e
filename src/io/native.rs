//! Native `.cfpt` container for trained artifacts.
//!
//! Every artifact file is a fixed 24-byte header followed by a Postcard
//! payload. Model, scaler, and schema all share this envelope and are told
//! apart by a kind byte, so a misplaced file is rejected before its payload
//! is decoded. The header also carries a crc32 of the payload; corruption
//! surfaces as a checksum error rather than a garbled model.
//!
//! # Example
//!
//! ```ignore
//! use footprint::io::{ArtifactKind, NativeCodec};
//! use footprint::schema::FeatureSchema;
//!
//! let schema = FeatureSchema::builtin();
//!
//! let codec = NativeCodec::new();
//! let bytes = codec.serialize(ArtifactKind::Schema, schema.len() as u32, &schema)?;
//! let (_, loaded): (_, FeatureSchema) = codec.deserialize(ArtifactKind::Schema, &bytes)?;
//! ```

use std::io::{Read, Write};

use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Magic bytes at the start of every artifact file.
pub const MAGIC: &[u8; 4] = b"CFPT";

/// Format version written by this build (major).
pub const CURRENT_VERSION_MAJOR: u8 = 1;

/// Format version written by this build (minor).
pub const CURRENT_VERSION_MINOR: u8 = 0;

/// Header length in bytes.
pub const HEADER_SIZE: usize = 24;

// ============================================================================
// Artifact Kind
// ============================================================================

/// What an artifact file contains, recorded in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ArtifactKind {
    /// Forest plus training metadata.
    Model = 0,
    /// Fitted feature scaler.
    Scaler = 1,
    /// Feature schema.
    Schema = 2,
}

impl ArtifactKind {
    /// Decode the header byte; unknown values yield `None`.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Model),
            1 => Some(Self::Scaler),
            2 => Some(Self::Schema),
            _ => None,
        }
    }
}

// ============================================================================
// Format Header
// ============================================================================

/// The fixed header of the native container.
///
/// # Layout
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       4     Magic ("CFPT")
/// 4       1     Version major
/// 5       1     Version minor
/// 6       1     Artifact kind
/// 7       1     Reserved
/// 8       4     Payload size (bytes, little-endian)
/// 12      4     CRC32 of the payload
/// 16      4     Number of feature columns
/// 20      4     Reserved
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHeader {
    /// Format version (major).
    pub version_major: u8,
    /// Format version (minor).
    pub version_minor: u8,
    /// Artifact kind.
    pub kind: ArtifactKind,
    /// Size of the payload in bytes.
    pub payload_size: u32,
    /// CRC32 checksum of the payload.
    pub checksum: u32,
    /// Number of feature columns this artifact was fitted on.
    pub num_columns: u32,
}

impl FormatHeader {
    /// Header stamped with the version this build writes.
    pub fn new(kind: ArtifactKind, num_columns: u32) -> Self {
        Self {
            version_major: CURRENT_VERSION_MAJOR,
            version_minor: CURRENT_VERSION_MINOR,
            kind,
            payload_size: 0,
            checksum: 0,
            num_columns,
        }
    }

    /// Encode into the fixed 24-byte layout. Reserved bytes stay zero.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(MAGIC);
        buf[4] = self.version_major;
        buf[5] = self.version_minor;
        buf[6] = self.kind as u8;
        buf[8..12].copy_from_slice(&self.payload_size.to_le_bytes());
        buf[12..16].copy_from_slice(&self.checksum.to_le_bytes());
        buf[16..20].copy_from_slice(&self.num_columns.to_le_bytes());
        buf
    }

    /// Decode and validate a 24-byte header.
    ///
    /// Rejects foreign magic, a major version newer than this build, and
    /// kind bytes outside the known set.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self, DeserializeError> {
        if &buf[0..4] != MAGIC {
            return Err(DeserializeError::NotAnArtifact);
        }

        let (version_major, version_minor) = (buf[4], buf[5]);
        if version_major > CURRENT_VERSION_MAJOR {
            return Err(DeserializeError::UnsupportedVersion {
                major: version_major,
                minor: version_minor,
            });
        }

        let kind = ArtifactKind::from_u8(buf[6])
            .ok_or_else(|| DeserializeError::CorruptPayload("invalid artifact kind".into()))?;

        let le_u32 = |offset: usize| {
            u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
        };
        Ok(Self {
            version_major,
            version_minor,
            kind,
            payload_size: le_u32(8),
            checksum: le_u32(12),
            num_columns: le_u32(16),
        })
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Failures while writing an artifact.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Postcard encoding error.
    #[error("encoding error: {0}")]
    Encoding(#[from] postcard::Error),
}

/// Failures while reading an artifact.
#[derive(Debug, Error)]
pub enum DeserializeError {
    /// The file does not start with the artifact magic.
    #[error("not a footprint artifact file")]
    NotAnArtifact,

    /// The file was written by a newer format revision.
    #[error("artifact requires format {major}.{minor} or later", major = .major, minor = .minor)]
    UnsupportedVersion { major: u8, minor: u8 },

    /// The payload does not hash to the checksum in the header.
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// The file ends before the announced payload does.
    #[error("file truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// The payload is structurally invalid.
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    /// I/O error during reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Postcard decoding error.
    #[error("decoding error: {0}")]
    Decoding(#[from] postcard::Error),

    /// The file holds a different artifact than the caller asked for.
    #[error("artifact kind mismatch: expected {expected:?}, got {actual:?}")]
    KindMismatch {
        expected: ArtifactKind,
        actual: ArtifactKind,
    },
}

// ============================================================================
// CRC32 Helper
// ============================================================================

/// CRC32 of a byte slice.
pub fn compute_checksum(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

// ============================================================================
// Native Codec
// ============================================================================

/// Reads and writes the native container format.
#[derive(Debug, Clone, Default)]
pub struct NativeCodec;

impl NativeCodec {
    pub fn new() -> Self {
        Self
    }

    /// Write a header and payload. The header's size and checksum fields
    /// are filled in from the payload before anything is written.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        header: &mut FormatHeader,
        payload: &[u8],
    ) -> Result<(), SerializeError> {
        header.payload_size = payload.len() as u32;
        header.checksum = compute_checksum(payload);

        writer.write_all(&header.to_bytes())?;
        writer.write_all(payload)?;
        Ok(())
    }

    /// Read a header and its checksum-verified payload.
    pub fn read_from<R: Read>(
        &self,
        reader: &mut R,
    ) -> Result<(FormatHeader, Vec<u8>), DeserializeError> {
        let mut header_buf = [0u8; HEADER_SIZE];
        if let Err(e) = reader.read_exact(&mut header_buf) {
            return Err(match e.kind() {
                std::io::ErrorKind::UnexpectedEof => DeserializeError::Truncated {
                    expected: HEADER_SIZE,
                    actual: 0,
                },
                _ => DeserializeError::Io(e),
            });
        }
        let header = FormatHeader::from_bytes(&header_buf)?;

        let mut payload = vec![0u8; header.payload_size as usize];
        if let Err(e) = reader.read_exact(&mut payload) {
            return Err(match e.kind() {
                std::io::ErrorKind::UnexpectedEof => DeserializeError::Truncated {
                    expected: header.payload_size as usize,
                    actual: payload.len(),
                },
                _ => DeserializeError::Io(e),
            });
        }

        let actual = compute_checksum(&payload);
        if actual != header.checksum {
            return Err(DeserializeError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        Ok((header, payload))
    }

    /// Produce a complete artifact file image for a serde payload.
    pub fn serialize<T: serde::Serialize>(
        &self,
        kind: ArtifactKind,
        num_columns: u32,
        payload: &T,
    ) -> Result<Vec<u8>, SerializeError> {
        let encoded = postcard::to_allocvec(payload)?;
        let mut header = FormatHeader::new(kind, num_columns);

        let mut bytes = Vec::with_capacity(HEADER_SIZE + encoded.len());
        self.write_to(&mut bytes, &mut header, &encoded)?;
        Ok(bytes)
    }

    /// Decode an artifact file image, checking it holds the expected kind.
    pub fn deserialize<T: for<'de> serde::Deserialize<'de>>(
        &self,
        expected: ArtifactKind,
        bytes: &[u8],
    ) -> Result<(FormatHeader, T), DeserializeError> {
        let (header, payload) = self.read_from(&mut std::io::Cursor::new(bytes))?;
        if header.kind != expected {
            return Err(DeserializeError::KindMismatch {
                expected,
                actual: header.kind,
            });
        }
        Ok((header, postcard::from_bytes(&payload)?))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips_every_field() {
        let header = FormatHeader {
            version_major: 1,
            version_minor: 3,
            kind: ArtifactKind::Schema,
            payload_size: 2048,
            checksum: 0x1234_5678,
            num_columns: 55,
        };

        let bytes = header.to_bytes();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(FormatHeader::from_bytes(&bytes).unwrap(), header);
    }

    #[test]
    fn foreign_magic_is_rejected() {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(b"MODL");

        let result = FormatHeader::from_bytes(&buf);
        assert!(matches!(result, Err(DeserializeError::NotAnArtifact)));
    }

    #[test]
    fn future_major_version_is_rejected() {
        let mut header = FormatHeader::new(ArtifactKind::Model, 10);
        header.version_major = CURRENT_VERSION_MAJOR + 1;

        let result = FormatHeader::from_bytes(&header.to_bytes());
        assert!(matches!(
            result,
            Err(DeserializeError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn unknown_kind_byte_is_rejected() {
        let header = FormatHeader::new(ArtifactKind::Model, 1);
        let mut bytes = header.to_bytes();
        bytes[6] = 9;

        let result = FormatHeader::from_bytes(&bytes);
        assert!(matches!(result, Err(DeserializeError::CorruptPayload(_))));
    }

    #[test]
    fn checksum_is_stable_and_sensitive() {
        let checksum = compute_checksum(b"diet=vegan");
        assert_eq!(checksum, compute_checksum(b"diet=vegan"));
        assert_ne!(checksum, compute_checksum(b"diet=vegen"));
        assert_ne!(checksum, 0);
    }

    #[test]
    fn write_then_read_returns_the_payload() {
        let codec = NativeCodec::new();
        let mut header = FormatHeader::new(ArtifactKind::Scaler, 4);
        let payload = postcard::to_allocvec(&vec![0.5f32, 2.0, -1.25, 8.0]).unwrap();

        let mut file_image = Vec::new();
        codec
            .write_to(&mut file_image, &mut header, &payload)
            .unwrap();

        let (read_header, read_payload) = codec.read_from(&mut file_image.as_slice()).unwrap();
        assert_eq!(read_header.kind, ArtifactKind::Scaler);
        assert_eq!(read_header.num_columns, 4);
        assert_eq!(read_payload, payload);
    }

    #[test]
    fn flipped_payload_byte_fails_the_checksum() {
        let codec = NativeCodec::new();
        let mut header = FormatHeader::new(ArtifactKind::Schema, 2);

        let mut file_image = Vec::new();
        codec
            .write_to(&mut file_image, &mut header, b"column bytes")
            .unwrap();
        file_image[HEADER_SIZE + 2] ^= 0xFF;

        let result = codec.read_from(&mut file_image.as_slice());
        assert!(matches!(
            result,
            Err(DeserializeError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn mismatched_kind_is_rejected() {
        let codec = NativeCodec::new();
        let bytes = codec
            .serialize(ArtifactKind::Scaler, 3, &vec![1.0f32, 2.0, 3.0])
            .unwrap();

        let result: Result<(_, Vec<f32>), _> = codec.deserialize(ArtifactKind::Model, &bytes);
        assert!(matches!(
            result,
            Err(DeserializeError::KindMismatch {
                expected: ArtifactKind::Model,
                actual: ArtifactKind::Scaler,
            })
        ));
    }

    #[test]
    fn serialize_deserialize_round_trips() {
        let codec = NativeCodec::new();
        let columns = vec!["diet=vegan".to_string(), "vehicle_monthly_km".to_string()];
        let bytes = codec
            .serialize(ArtifactKind::Schema, columns.len() as u32, &columns)
            .unwrap();

        let (header, loaded): (_, Vec<String>) =
            codec.deserialize(ArtifactKind::Schema, &bytes).unwrap();
        assert_eq!(header.num_columns, 2);
        assert_eq!(loaded, columns);
    }

    #[test]
    fn truncated_payload_is_detected() {
        let codec = NativeCodec::new();
        let bytes = codec
            .serialize(ArtifactKind::Model, 2, &vec![1.0f32, 2.0])
            .unwrap();

        let result: Result<(_, Vec<f32>), _> =
            codec.deserialize(ArtifactKind::Model, &bytes[..bytes.len() - 1]);
        assert!(matches!(result, Err(DeserializeError::Truncated { .. })));
    }

    #[test]
    fn kind_byte_mapping_is_total() {
        for kind in [ArtifactKind::Model, ArtifactKind::Scaler, ArtifactKind::Schema] {
            assert_eq!(ArtifactKind::from_u8(kind as u8), Some(kind));
        }
        assert_eq!(ArtifactKind::from_u8(255), None);
    }
}
