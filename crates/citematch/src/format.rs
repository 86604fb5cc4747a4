//! In-text citation formatting.
//!
//! Renders a chosen paper's authors and year into an in-text citation for a
//! closed set of styles. Style strings are validated at the parse boundary;
//! an unknown style is a hard error for that call only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Supported citation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CitationStyle {
    /// American Psychological Association.
    #[serde(rename = "APA")]
    Apa,
    /// Modern Language Association.
    #[serde(rename = "MLA")]
    Mla,
    /// Chicago author-date.
    #[serde(rename = "Chicago")]
    Chicago,
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Apa => "APA",
            Self::Mla => "MLA",
            Self::Chicago => "Chicago",
        })
    }
}

impl FromStr for CitationStyle {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "apa" => Ok(Self::Apa),
            "mla" => Ok(Self::Mla),
            "chicago" => Ok(Self::Chicago),
            _ => Err(EngineError::UnsupportedStyle(value.to_string())),
        }
    }
}

/// Lead name used in the citation: the first whitespace token of the first
/// non-blank author name.
fn lead_name(authors: &[String]) -> Option<&str> {
    authors
        .iter()
        .find(|a| !a.trim().is_empty())
        .and_then(|a| a.split_whitespace().next())
}

/// Render an in-text citation.
///
/// Missing year renders as `n.d.`; missing authors as `Unknown`. A single
/// author uses the style's single-author form, more than one the `et al.`
/// form.
#[must_use]
pub fn format_citation(authors: &[String], year: Option<i32>, style: CitationStyle) -> String {
    let year_label = year.map_or_else(|| "n.d.".to_string(), |y| y.to_string());

    let Some(name) = lead_name(authors) else {
        return match style {
            CitationStyle::Apa => format!("(Unknown, {year_label})"),
            CitationStyle::Mla | CitationStyle::Chicago => format!("(Unknown {year_label})"),
        };
    };

    let multiple = authors.iter().filter(|a| !a.trim().is_empty()).count() > 1;

    match (style, multiple) {
        (CitationStyle::Apa, false) => format!("({name}, {year_label})"),
        (CitationStyle::Apa, true) => format!("({name} et al., {year_label})"),
        (CitationStyle::Mla, false) => format!("({name} {year_label})"),
        (CitationStyle::Mla, true) => format!("({name} et al. {year_label})"),
        (CitationStyle::Chicago, false) => format!("({name} {year_label})"),
        (CitationStyle::Chicago, true) => format!("({name} et al., {year_label})"),
    }
}
