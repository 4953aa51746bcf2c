//! The Graph Access Facade
//!
//! `GraphStore` is the narrow seam between ontolint and whatever engine holds
//! the graph: checkers only ever read through it, and the rule engine shares
//! one store across concurrent tasks, so implementations must tolerate
//! concurrent reads (`Send + Sync`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Annotation, AnnotationAssertion, AnnotationValue, Axiom, Entity, Iri};

/// Whether a lookup sees only the graph itself or its whole import closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportScope {
    Local,
    Closure,
}

/// One result row from a declarative rule query. Unbound variables surface
/// as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRow {
    pub entity: Option<Iri>,
    pub property: Option<Iri>,
    pub value: Option<AnnotationValue>,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query backend does not support this query: {0}")]
    Unsupported(String),
    #[error("query execution failed: {0}")]
    Backend(String),
}

/// Read-only facade over an ontology graph.
pub trait GraphStore: Send + Sync {
    /// Identifier of the ontology itself, when one is set.
    fn ontology_iri(&self) -> Option<&Iri>;

    /// Ontology-level (header) annotations.
    fn header_annotations(&self) -> &[Annotation];

    /// All axioms visible in `scope`.
    fn axioms(&self, scope: ImportScope) -> Vec<&Axiom>;

    /// Annotation assertions about `subject` visible in `scope`.
    fn annotation_assertions(&self, subject: &Iri, scope: ImportScope)
        -> Vec<&AnnotationAssertion>;

    /// Distinct class IRIs mentioned by axioms in `scope`.
    fn declared_classes(&self, scope: ImportScope) -> Vec<Iri>;

    /// True iff a declaration axiom for `entity` exists in the closure.
    fn is_declared(&self, entity: &Entity) -> bool;

    /// Execute an opaque declarative query body, yielding bound triples.
    fn execute_query(&self, body: &str) -> Result<Vec<QueryRow>, QueryError>;

    /// Best-effort short label for an identifier, when one is known.
    fn label(&self, iri: &Iri) -> Option<String>;
}
