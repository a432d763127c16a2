//! Media source list parsing
//!
//! Player pages configure their video element with a script object such as
//!
//! ```text
//! sources: [{file:"http://cdn.example/v.mp4",label:"720p"},{file:"...",label:"360p"}],
//! ```
//!
//! The list is a script literal, not JSON: keys may be bare and strings may
//! use either quote. It is scanned with regexes, never evaluated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const SOURCES_MARKER: &str = "sources: [";

/// Resolutions we hand out, best first
pub const PREFERRED_LABELS: &[&str] = &["720p", "360p", "240p"];

/// One playable file offered by a player page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaSource {
    pub file: String,
    pub label: Option<String>,
}

static OBJECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("object literal regex is valid"));

static PROPERTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["']?(?P<key>[A-Za-z_]+)["']?\s*:\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#)
        .expect("property regex is valid")
});

/// The bracketed array literal after `sources: [`, brackets included
pub fn extract_sources_literal(html: &str) -> Option<&str> {
    let start = html.find(SOURCES_MARKER)? + SOURCES_MARKER.len() - 1;
    let rest = &html[start..];
    let end = rest.find(']')? + 1;
    Some(&rest[..end])
}

/// Every `{file: ..., label: ...}` entry in an array literal
///
/// Entries without a `file` are skipped. Values are taken verbatim, apart
/// from the `\/` escapes some players emit.
pub fn parse_sources(literal: &str) -> Vec<MediaSource> {
    OBJECT_RE
        .captures_iter(literal)
        .filter_map(|object| {
            let body = object.get(1)?.as_str();
            let mut file = None;
            let mut label = None;

            for property in PROPERTY_RE.captures_iter(body) {
                let value = property
                    .name("dq")
                    .or_else(|| property.name("sq"))
                    .map(|m| m.as_str().replace("\\/", "/"));

                match property.name("key").map(|m| m.as_str()) {
                    Some("file") => file = value,
                    Some("label") => label = value,
                    _ => {}
                }
            }

            file.filter(|f| !f.is_empty())
                .map(|file| MediaSource { file, label })
        })
        .collect()
}

/// The source with the best preferred resolution, if any
pub fn select_preferred(sources: &[MediaSource]) -> Option<&MediaSource> {
    PREFERRED_LABELS.iter().find_map(|wanted| {
        sources
            .iter()
            .find(|source| source.label.as_deref() == Some(*wanted))
    })
}
