//! Ontology graph model and access facade
//!
//! This crate defines the typed model for ontology graphs (entities, axioms,
//! annotations) and the narrow `GraphStore` facade through which all ontolint
//! checkers read a graph. Storage engines, parsers and query backends live
//! behind the facade; this crate ships a reference in-memory implementation
//! (`MemoryGraph`) suitable for tests and small embedded graphs.

pub mod memory;
pub mod model;
pub mod store;
pub mod vocab;

pub use memory::MemoryGraph;
pub use model::{
    Annotation, AnnotationAssertion, AnnotationValue, Axiom, AxiomKind, Entity, EntityKind, Iri,
    Literal,
};
pub use store::{GraphStore, ImportScope, QueryError, QueryRow};
