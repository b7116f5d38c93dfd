//! Share links: one week's tasks packed into a URL path segment.
//!
//! The encoder always writes the latest wire version. The decoder reads every
//! version that was ever handed out, since old links live on in chats and
//! bookmarks.

pub mod payload;
pub mod short_id;

use chrono::{DateTime, SecondsFormat, Utc};

pub use payload::{LATEST_VERSION, Payload, ShareData};

use crate::model::task::Task;

/// Error type for share slug decoding
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("share slug could not be decompressed")]
    Decompress,
    #[error("share payload is not valid UTF-16: {0}")]
    Utf16(#[from] std::string::FromUtf16Error),
    #[error("share payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode one week's tasks as a share slug (wire version 3)
pub fn encode_share_data(tasks: &[Task], week: &str) -> String {
    pack_json(&payload::encode_v3(tasks, week).to_string())
}

/// Decode a share slug of any wire version. `None` means the slug is not a
/// snapshot at all; an empty week decodes to `Some` with no tasks.
pub fn decode_share_data(slug: &str) -> Option<ShareData> {
    decode_share_data_at(slug, Utc::now())
}

/// Like [`decode_share_data`], using `now` as the creation time of tasks
/// from versions that don't carry one.
pub fn decode_share_data_at(slug: &str, now: DateTime<Utc>) -> Option<ShareData> {
    match try_decode_share_data(slug, now) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::debug!(error = %e, "undecodable share slug");
            None
        }
    }
}

pub fn try_decode_share_data(slug: &str, now: DateTime<Utc>) -> Result<ShareData, ShareError> {
    let json = unpack_json(slug)?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    let created_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    Ok(Payload::detect(value)?.into_share_data(&created_at))
}

/// Compress JSON text into a URL-safe slug. `+` is swapped for `_` on top of
/// the compressor's URI alphabet.
pub fn pack_json(json: &str) -> String {
    lz_str::compress_to_encoded_uri_component(json).replace('+', "_")
}

/// Inverse of [`pack_json`]
pub fn unpack_json(slug: &str) -> Result<String, ShareError> {
    let restored = slug.trim().replace('_', "+");
    let wide =
        lz_str::decompress_from_encoded_uri_component(restored.as_str()).ok_or(ShareError::Decompress)?;
    if wide.is_empty() {
        return Err(ShareError::Decompress);
    }
    Ok(String::from_utf16(&wide)?)
}

/// Join a base URL and a slug with exactly one `/`.
///
/// Slugs use the lz-string URI alphabet: ASCII letters, digits, `-`, `_`
/// and also `$`. Hosts routing share links must accept `$` in the path
/// segment.
pub fn share_url(base: &str, slug: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), slug)
}

/// Accept either a bare slug or a full share URL and return the slug:
/// the last path segment, without query string or fragment.
pub fn extract_slug(input: &str) -> &str {
    let input = input.trim();
    let input = input.split(['?', '#']).next().unwrap_or(input);
    let input = input.trim_end_matches('/');
    input.rsplit('/').next().unwrap_or(input)
}
