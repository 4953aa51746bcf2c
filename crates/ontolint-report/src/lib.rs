//! Ontology validation: severity-graded quality reports over a graph facade
//!
//! The pipeline in one sentence: structural checkers and declarative rule
//! queries produce [`Violation`]s, the concurrent engine fans rule queries
//! out and back in, and everything aggregates into a [`Report`] rendered as
//! YAML-compatible text or JSON.
//!
//! The crate never talks to a concrete triple store; everything goes through
//! the [`GraphStore`](ontolint_graph::GraphStore) facade, so backends and
//! test doubles plug in freely.

pub mod checker;
pub mod curie;
pub mod cycles;
pub mod driver;
pub mod engine;
pub mod metadata;
pub mod refs;
pub mod report;
pub mod rules;
pub mod violation;

pub use checker::{CheckerSet, StructuralChecker};
pub use curie::CurieChecker;
pub use driver::{validate, ValidationOptions, ValidationOutcome};
pub use engine::{execute_rules, EngineOptions, RuleOutcome, RuleRun, RuleStatus};
pub use metadata::{MetadataChecker, Profile};
pub use report::Report;
pub use rules::{load_rules_from_dir, Rule, RuleParseError};
pub use violation::{
    CardinalityIssue, CardinalityOp, Category, Severity, SeverityError, Statement, Violation,
};
