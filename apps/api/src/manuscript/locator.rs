//! Metadata Locator: heuristic title/abstract detection on extracted text.
//!
//! Only English section markers are recognized.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use super::Manuscript;

#[derive(Debug, Error, PartialEq)]
pub enum LocateError {
    #[error("document contains no text")]
    NoText,

    #[error("no \"Abstract\" section marker found; submit title and abstract manually")]
    AbstractNotFound,

    #[error("\"Abstract\" section is empty")]
    EmptyAbstract,

    #[error("no title line found before the abstract")]
    TitleNotFound,
}

/// `Abstract` alone on its line, or followed by `:`, `.`, `-` or a dash
/// (`ABSTRACT: text...`, `Abstract— text...`).
static ABSTRACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*abstract[ \t]*(?:[:.\-–—][ \t]*|[ \t\r]*$)").unwrap()
});

/// Any line starting with the word `Abstract`. Only used when no line matches
/// [`ABSTRACT_RE`], since titles such as "Abstract Interpretation of ..." also
/// start this way.
static ABSTRACT_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^[ \t]*abstract\b[ \t]*").unwrap());

/// The section that follows the abstract. Title case or all caps only, so a
/// wrapped line starting with "introduction of ..." stays in the abstract.
/// Numbered headers (`1.`, `I.`) match as-is; unnumbered ones must stand
/// alone or be followed by `:` or a dash.
static SECTION_END_RE: Lazy<Regex> = Lazy::new(|| {
    const HEADER: &str = r"(?:Keywords|KEYWORDS|Key[ \t]+[Ww]ords|KEY[ \t]+WORDS|Index[ \t]+[Tt]erms|INDEX[ \t]+TERMS|Introduction|INTRODUCTION)";
    Regex::new(&format!(
        r"(?m)^[ \t]*(?:(?:\d+|[IVXivx]+)\.?[ \t]+{HEADER}\b|{HEADER}[ \t\r]*(?:[:\-–—]|$))"
    ))
    .unwrap()
});

/// Locates the title (first non-empty line before the abstract marker) and the
/// abstract (text between the marker and the next section marker).
pub fn locate(text: &str) -> Result<Manuscript, LocateError> {
    if text.trim().is_empty() {
        return Err(LocateError::NoText);
    }

    let marker = ABSTRACT_RE
        .find(text)
        .or_else(|| ABSTRACT_PREFIX_RE.find(text))
        .ok_or(LocateError::AbstractNotFound)?;

    let title = text[..marker.start()]
        .lines()
        .map(normalize_whitespace)
        .find(|line| !line.is_empty())
        .ok_or(LocateError::TitleNotFound)?;

    let rest = &text[marker.end()..];
    let end = SECTION_END_RE.find(rest).map(|m| m.start()).unwrap_or(rest.len());
    let abstract_text = normalize_whitespace(&rest[..end]);
    if abstract_text.is_empty() {
        return Err(LocateError::EmptyAbstract);
    }

    Ok(Manuscript::new(title, abstract_text))
}

/// Collapses every whitespace run (newlines included) to a single space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
