//! Violation model
//!
//! Every detected problem is a value of `Violation`, never an error: checkers
//! return collections of them and the report buckets them by severity.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use ontolint_graph::{AnnotationValue, Iri};

// ============================================================================
// Severity
// ============================================================================

/// Validated severity in `1..=5`. Lower numbers are higher priority by the
/// downstream convention; callers choose their own ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Severity(u8);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("severity must be in 1..=5, got {0}")]
pub struct SeverityError(pub u8);

impl Severity {
    pub const MIN: Severity = Severity(1);
    pub const MAX: Severity = Severity(5);

    pub fn new(level: u8) -> Result<Self, SeverityError> {
        if (1..=5).contains(&level) {
            Ok(Severity(level))
        } else {
            Err(SeverityError(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// All five levels in priority order.
    pub fn all() -> impl Iterator<Item = Severity> {
        (1..=5).map(Severity)
    }
}

impl TryFrom<u8> for Severity {
    type Error = SeverityError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Severity::new(level)
    }
}

impl From<Severity> for u8 {
    fn from(s: Severity) -> u8 {
        s.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Violations
// ============================================================================

/// What family of check produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Curie,
    ClassMetadata,
    OntologyMetadata,
    InvalidReference,
    RuleQuery,
}

/// One property with the values bound for it. The property is `None` when a
/// rule query left the variable unbound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub property: Option<Iri>,
    pub values: Vec<AnnotationValue>,
}

/// One detected problem: severity, category, a human-readable description,
/// the subject it concerns (when known) and any bound statements about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub severity: Severity,
    pub category: Category,
    pub description: String,
    pub subject: Option<Iri>,
    pub statements: Vec<Statement>,
}

impl Violation {
    pub fn new(severity: Severity, category: Category, description: impl Into<String>) -> Self {
        Violation {
            severity,
            category,
            description: description.into(),
            subject: None,
            statements: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: Iri) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn add_statement(&mut self, property: Option<Iri>, value: Option<AnnotationValue>) {
        if let Some(existing) = self
            .statements
            .iter_mut()
            .find(|s| s.property == property)
        {
            if let Some(v) = value {
                existing.values.push(v);
            }
            return;
        }
        self.statements.push(Statement {
            property,
            values: value.into_iter().collect(),
        });
    }
}

// ============================================================================
// Cardinality results
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardinalityOp {
    LessThan,
    MoreThan,
}

impl fmt::Display for CardinalityOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardinalityOp::LessThan => f.write_str("LESS_THAN"),
            CardinalityOp::MoreThan => f.write_str("MORE_THAN"),
        }
    }
}

/// Outcome of a failed cardinality check: how many values were observed and
/// which bound they crossed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardinalityIssue {
    pub property: Iri,
    pub observed: usize,
    pub op: CardinalityOp,
    pub expected: usize,
}

impl fmt::Display for CardinalityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "|{}|={} {} {}",
            self.property, self.observed, self.op, self.expected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_bounds_are_enforced() {
        assert!(Severity::new(1).is_ok());
        assert!(Severity::new(5).is_ok());
        assert_eq!(Severity::new(0), Err(SeverityError(0)));
        assert_eq!(Severity::new(6), Err(SeverityError(6)));
    }

    #[test]
    fn statements_merge_values_per_property() {
        let mut v = Violation::new(
            Severity::new(3).unwrap(),
            Category::RuleQuery,
            "duplicate label",
        );
        let p = Iri::new("ex:p");
        v.add_statement(Some(p.clone()), Some(AnnotationValue::string("a")));
        v.add_statement(Some(p.clone()), Some(AnnotationValue::string("b")));
        assert_eq!(v.statements.len(), 1);
        assert_eq!(v.statements[0].values.len(), 2);
    }

    #[test]
    fn cardinality_issue_renders_like_a_bound() {
        let issue = CardinalityIssue {
            property: Iri::new("dc:title"),
            observed: 0,
            op: CardinalityOp::LessThan,
            expected: 1,
        };
        assert_eq!(issue.to_string(), "|dc:title|=0 LESS_THAN 1");
    }
}
