//! JWT inspection: decode header and claims, report expiry
//!
//! No signature verification; this inspects tokens, it does not
//! authenticate them.

use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL;
use base64::Engine;
use chrono::{DateTime, Utc};

/// Decoded token contents
#[derive(Debug, Clone)]
pub struct TokenReport {
    pub header: serde_json::Value,
    pub claims: serde_json::Value,
    pub expires_at: Option<DateTime<Utc>>,
    pub expired: bool,
}

/// Decode a compact JWT, with or without a `Bearer ` prefix
pub fn decode_token(raw: &str) -> Result<TokenReport> {
    decode_token_at(raw, Utc::now())
}

/// Decode with an explicit "now" for the expiry comparison
pub fn decode_token_at(raw: &str, now: DateTime<Utc>) -> Result<TokenReport> {
    let compact = raw.trim();
    let compact = compact.strip_prefix("Bearer ").unwrap_or(compact);

    let segments: Vec<&str> = compact.split('.').collect();
    if segments.len() != 3 {
        bail!(
            "expected 3 dot-separated segments, found {}",
            segments.len()
        );
    }

    let header = decode_segment(segments[0]).context("invalid token header")?;
    let claims = decode_segment(segments[1]).context("invalid token claims")?;

    let expires_at = claims
        .get("exp")
        .and_then(|v| v.as_i64())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    let expired = expires_at.map(|at| at <= now).unwrap_or(false);

    Ok(TokenReport {
        header,
        claims,
        expires_at,
        expired,
    })
}

fn decode_segment(segment: &str) -> Result<serde_json::Value> {
    let bytes = BASE64_URL
        .decode(segment)
        .context("segment is not valid base64url")?;
    serde_json::from_slice(&bytes).context("segment is not valid JSON")
}
