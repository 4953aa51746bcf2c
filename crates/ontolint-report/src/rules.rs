//! Declarative rule definitions
//!
//! A rule file is a header envelope followed by an opaque query body. The
//! header lines look like:
//!
//! ```text
//! ## title: missing label
//! ## severity: 2
//! ## see: https://example.org/docs/missing-label
//! ## ---
//! SELECT ?entity ?property ?value WHERE { ... }
//! ```
//!
//! Title and severity are mandatory; construction fails without them. The
//! body's grammar is not interpreted here, it is handed verbatim to the
//! Graph Access Facade.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

use crate::violation::Severity;

/// Marker ending the header block.
const HEADER_DIVIDER: &str = "## ---";
/// Prefix of every header line.
const HEADER_PREFIX: &str = "## ";

#[derive(Debug, Error)]
pub enum RuleParseError {
    #[error("rule is missing the '## ---' header divider:\n{0}")]
    MissingDivider(String),
    #[error("rule is missing a '## title:' header:\n{0}")]
    MissingTitle(String),
    #[error("rule is missing a '## severity:' header:\n{0}")]
    MissingSeverity(String),
    #[error("rule severity '{value}' is not valid: {reason}")]
    InvalidSeverity { value: String, reason: String },
    #[error("cannot read rule file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A loaded rule: envelope fields plus the opaque query body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub title: String,
    pub severity: Severity,
    pub see_also: Option<String>,
    pub body: String,
}

impl Rule {
    pub fn parse(text: &str) -> Result<Rule, RuleParseError> {
        let Some((header, body)) = text.split_once(HEADER_DIVIDER) else {
            return Err(RuleParseError::MissingDivider(text.to_string()));
        };

        let mut title = None;
        let mut severity = None;
        let mut see_also = None;
        for line in header.lines() {
            let Some(field) = line.trim_start().strip_prefix(HEADER_PREFIX) else {
                continue;
            };
            if let Some(value) = field.strip_prefix("title:") {
                title = Some(value.trim().to_string());
            } else if let Some(value) = field.strip_prefix("severity:") {
                severity = Some(value.trim().to_string());
            } else if let Some(value) = field.strip_prefix("see:") {
                see_also = Some(value.trim().to_string());
            }
        }

        let title = title
            .filter(|t| !t.is_empty())
            .ok_or_else(|| RuleParseError::MissingTitle(text.to_string()))?;
        let severity = severity.ok_or_else(|| RuleParseError::MissingSeverity(text.to_string()))?;
        let severity = severity
            .parse::<u8>()
            .map_err(|e| RuleParseError::InvalidSeverity {
                value: severity.clone(),
                reason: e.to_string(),
            })
            .and_then(|level| {
                Severity::new(level).map_err(|e| RuleParseError::InvalidSeverity {
                    value: severity.clone(),
                    reason: e.to_string(),
                })
            })?;

        Ok(Rule {
            title,
            severity,
            see_also,
            body: body.trim_start_matches('\n').to_string(),
        })
    }
}

impl std::str::FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::parse(s)
    }
}

/// Load every rule file under `dir` (recursively). A malformed rule fails
/// its own load and is reported in the error list without aborting the
/// others.
pub fn load_rules_from_dir(dir: &Path) -> (Vec<Rule>, Vec<RuleParseError>) {
    let mut rules = Vec::new();
    let mut errors = Vec::new();
    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        match fs::read_to_string(entry.path()) {
            Ok(text) => match Rule::parse(&text) {
                Ok(rule) => rules.push(rule),
                Err(e) => errors.push(e),
            },
            Err(source) => errors.push(RuleParseError::Io {
                path: entry.path().display().to_string(),
                source,
            }),
        }
    }
    (rules, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = "\
## title: missing label
## severity: 2
## see: https://example.org/docs/missing-label
## ---
SELECT ?entity WHERE { }";

    #[test]
    fn parses_full_envelope() {
        let rule = Rule::parse(GOOD).unwrap();
        assert_eq!(rule.title, "missing label");
        assert_eq!(rule.severity.get(), 2);
        assert_eq!(
            rule.see_also.as_deref(),
            Some("https://example.org/docs/missing-label")
        );
        assert_eq!(rule.body, "SELECT ?entity WHERE { }");
    }

    #[test]
    fn missing_title_fails() {
        let err = Rule::parse("## severity: 2\n## ---\nbody").unwrap_err();
        assert!(matches!(err, RuleParseError::MissingTitle(_)));
    }

    #[test]
    fn missing_severity_fails() {
        let err = Rule::parse("## title: x\n## ---\nbody").unwrap_err();
        assert!(matches!(err, RuleParseError::MissingSeverity(_)));
    }

    #[test]
    fn out_of_range_severity_fails() {
        let err = Rule::parse("## title: x\n## severity: 9\n## ---\nbody").unwrap_err();
        assert!(matches!(err, RuleParseError::InvalidSeverity { .. }));
    }

    #[test]
    fn missing_divider_fails() {
        let err = Rule::parse("## title: x\n## severity: 1\nbody").unwrap_err();
        assert!(matches!(err, RuleParseError::MissingDivider(_)));
    }

    #[test]
    fn directory_loading_keeps_good_rules_and_collects_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_good.rq"), GOOD).unwrap();
        fs::write(dir.path().join("b_bad.rq"), "no header at all").unwrap();
        let (rules, errors) = load_rules_from_dir(dir.path());
        assert_eq!(rules.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(rules[0].title, "missing label");
    }
}
