//! Share links for map state.
//!
//! A map's shareable state is wrapped in a versioned envelope
//! `{ version, kind, state }`, serialized to JSON, gzip-compressed and
//! base64url-encoded into the `config` query parameter. Decoding at startup
//! is best effort: failures are logged and the default state stays.

mod codec;
mod error;
mod link;

pub use codec::{decode_token, encode_payload, encode_state, SharePayload};
pub use error::ShareError;
pub use link::{apply_url, seed_from_url, share_url, token_from_url};
