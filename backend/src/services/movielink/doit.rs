//! Decoding of the `doit(...)` token embedded in lookup pages
//!
//! Lookup pages never contain the player iframe directly. They carry a
//! script call like `document.write(doit('Vmxab...'))` whose argument is the
//! iframe markup, base64-encoded twice. The iframe's `src` is the page that
//! lists the media files.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use super::MovieLinkError;

/// Standard alphabet, tolerant of stripped padding
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Markup is double-encoded; more rounds than this means we picked up junk
const MAX_DECODE_ROUNDS: usize = 2;

const TOKEN_CALL: &str = "doit(";
const PLAYER_SRC_START: &str = "src=\"";
const PLAYER_SRC_END: &str = "\" webkitAllow";

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// The argument of the last `doit(` call on the page, without quotes
pub fn extract_token(html: &str) -> Option<&str> {
    let start = html.rfind(TOKEN_CALL)? + TOKEN_CALL.len();
    let rest = &html[start..];
    let end = rest.find(')')?;

    let token = rest[..end].trim().trim_matches(is_quote).trim();
    (!token.is_empty()).then_some(token)
}

/// Base64-decode the token until it turns into markup
pub fn decode_token(token: &str) -> Result<String, MovieLinkError> {
    let mut current: String = token.chars().filter(|c| !c.is_whitespace()).collect();

    for round in 1..=MAX_DECODE_ROUNDS {
        let bytes = LENIENT_BASE64
            .decode(current.as_bytes())
            .map_err(|e| MovieLinkError::Decode(format!("round {}: {}", round, e)))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| MovieLinkError::Decode(format!("round {}: {}", round, e)))?;

        if text.contains('<') {
            return Ok(text);
        }
        current = text.chars().filter(|c| !c.is_whitespace()).collect();
    }

    Err(MovieLinkError::Decode(format!(
        "no markup after {} rounds",
        MAX_DECODE_ROUNDS
    )))
}

/// The player iframe's `src` in decoded markup
pub fn player_url(decoded: &str) -> Option<&str> {
    let start = decoded.find(PLAYER_SRC_START)? + PLAYER_SRC_START.len();
    let rest = &decoded[start..];
    let end = rest.find(PLAYER_SRC_END)?;

    let url = rest[..end].trim();
    (!url.is_empty()).then_some(url)
}
