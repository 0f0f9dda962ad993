//! Token encoding: JSON → gzip → base64url.

use std::io::{Read, Write};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ShareError;
use crate::constants::{MAX_SHARE_PAYLOAD_BYTES, SHARE_PAYLOAD_VERSION};
use crate::state::MapInstance;

/// Decoded content of a share token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharePayload {
    /// Payload format version; 0 for unversioned legacy links
    pub version: u32,

    /// Visualization kind the state was exported from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// The map's shareable state
    pub state: Value,
}

impl SharePayload {
    /// Payload for the current state of `map`.
    pub fn from_map<M: MapInstance + ?Sized>(map: &M) -> Self {
        Self {
            version: SHARE_PAYLOAD_VERSION,
            kind: Some(map.kind().to_string()),
            state: map.shareable_state(),
        }
    }

    /// Interpret a decoded JSON document.
    ///
    /// Objects without a `version` key are legacy links whose whole body is
    /// the state.
    pub fn from_value(value: Value) -> Result<Self, ShareError> {
        let Value::Object(mut object) = value else {
            return Err(ShareError::NotAnObject);
        };

        let Some(version) = object.remove("version") else {
            return Ok(Self {
                version: 0,
                kind: None,
                state: Value::Object(object),
            });
        };

        let version: u32 = serde_json::from_value(version)?;
        if version > SHARE_PAYLOAD_VERSION {
            return Err(ShareError::VersionTooNew {
                found: version,
                supported: SHARE_PAYLOAD_VERSION,
            });
        }

        let kind = match object.remove("kind") {
            Some(kind) => serde_json::from_value(kind)?,
            None => None,
        };
        let state = object.remove("state").unwrap_or(Value::Null);
        if !state.is_object() {
            return Err(ShareError::NotAnObject);
        }

        Ok(Self {
            version,
            kind,
            state,
        })
    }

    pub fn is_legacy(&self) -> bool {
        self.version == 0
    }

    /// Apply the state to `map`, refusing payloads exported from another
    /// visualization kind.
    pub fn apply_to<M: MapInstance + ?Sized>(&self, map: &M) -> Result<(), ShareError> {
        if let Some(kind) = &self.kind {
            if kind != map.kind() {
                return Err(ShareError::KindMismatch {
                    expected: map.kind().to_string(),
                    found: kind.clone(),
                });
            }
        }
        map.apply_shared_state(&self.state);
        Ok(())
    }
}

/// Encode a payload into a URL-safe token.
pub fn encode_payload(payload: &SharePayload) -> Result<String, ShareError> {
    let json = serde_json::to_vec(payload)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Encode the current shareable state of `map`.
pub fn encode_state<M: MapInstance + ?Sized>(map: &M) -> Result<String, ShareError> {
    encode_payload(&SharePayload::from_map(map))
}

/// Decode a token produced by [`encode_payload`].
///
/// Standard base64 (`+`, `/`, padding) is accepted as well. A `+` that went
/// through form decoding arrives as a space and is read as `+`.
pub fn decode_token(token: &str) -> Result<SharePayload, ShareError> {
    let normalized: String = token
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' | ' ' => '-',
            '/' => '_',
            c => c,
        })
        .collect();
    let compressed = URL_SAFE_NO_PAD.decode(normalized)?;

    let mut json = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .take(MAX_SHARE_PAYLOAD_BYTES)
        .read_to_end(&mut json)?;

    let value: Value = serde_json::from_slice(&json)?;
    SharePayload::from_value(value)
}
