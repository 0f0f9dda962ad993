//! Share links: a token carried in the `config` query parameter.

use url::Url;

use super::codec::{decode_token, encode_state};
use super::error::ShareError;
use crate::constants::SHARE_QUERY_PARAM;
use crate::state::{MapInstance, MapList};

/// `base` with its `config` parameter set to the state of `map`.
///
/// Other query parameters and the fragment are kept; an existing `config`
/// parameter is replaced.
pub fn share_url<M: MapInstance + ?Sized>(base: &str, map: &M) -> Result<String, ShareError> {
    let token = encode_state(map)?;
    let mut url = Url::parse(base)?;
    set_query_param(&mut url, SHARE_QUERY_PARAM, &token);
    Ok(url.into())
}

fn set_query_param(url: &mut Url, key: &str, value: &str) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(key, value);
}

/// The share token of `url`, if it carries one.
pub fn token_from_url(url: &str) -> Result<Option<String>, ShareError> {
    let url = Url::parse(url)?;
    let token = url
        .query_pairs()
        .find(|(k, _)| k == SHARE_QUERY_PARAM)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty());
    Ok(token)
}

/// Apply the shared state carried by `url` to `map`.
///
/// Returns `Ok(false)` when the URL has no share token.
pub fn apply_url<M: MapInstance + ?Sized>(map: &M, url: &str) -> Result<bool, ShareError> {
    let Some(token) = token_from_url(url)? else {
        return Ok(false);
    };
    let payload = decode_token(&token)?;
    if payload.is_legacy() {
        log::debug!("Applying unversioned share link to map {}", map.id());
    }
    payload.apply_to(map)?;
    Ok(true)
}

/// Seed the first map of `list` from `url` at startup.
///
/// Failures are logged and leave the default state in place. Returns whether
/// shared state was applied.
pub fn seed_from_url<M: MapInstance + ?Sized>(list: &MapList<M>, url: &str) -> bool {
    let Some(map) = list.first_map() else {
        log::debug!("No map to seed from share link");
        return false;
    };

    match apply_url(map.as_ref(), url) {
        Ok(applied) => {
            if applied {
                log::info!("Restored shared state into map {}", map.id());
            }
            applied
        }
        Err(e) => {
            log::warn!("Ignoring share link: {}", e);
            false
        }
    }
}
