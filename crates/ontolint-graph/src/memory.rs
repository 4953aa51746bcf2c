//! Reference in-memory graph store
//!
//! `MemoryGraph` backs tests and small embedded graphs. It keeps axioms in
//! insertion order, maintains a subject index for annotation lookups, and
//! holds imported graphs by value so closure-scoped reads need no external
//! resolver. It has no query engine of its own: embedders register result
//! rows per query body, which is enough to drive the rule engine end to end.

use ahash::AHashMap;

use crate::model::{
    Annotation, AnnotationAssertion, AnnotationValue, Axiom, AxiomKind, Entity, EntityKind, Iri,
};
use crate::store::{GraphStore, ImportScope, QueryError, QueryRow};
use crate::vocab;

#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    ontology_iri: Option<Iri>,
    header: Vec<Annotation>,
    axioms: Vec<Axiom>,
    imports: Vec<MemoryGraph>,
    by_subject: AHashMap<Iri, Vec<usize>>,
    query_results: AHashMap<String, Vec<QueryRow>>,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iri(iri: impl Into<Iri>) -> Self {
        MemoryGraph { ontology_iri: Some(iri.into()), ..Self::default() }
    }

    pub fn add_axiom(&mut self, axiom: Axiom) {
        if let AxiomKind::AnnotationAssertion(aa) = &axiom.kind {
            self.by_subject
                .entry(aa.subject.clone())
                .or_default()
                .push(self.axioms.len());
        }
        self.axioms.push(axiom);
    }

    pub fn add_header_annotation(&mut self, annotation: Annotation) {
        self.header.push(annotation);
    }

    pub fn add_import(&mut self, imported: MemoryGraph) {
        self.imports.push(imported);
    }

    /// Register the rows a query body should yield from `execute_query`.
    pub fn register_query_result(&mut self, body: impl Into<String>, rows: Vec<QueryRow>) {
        self.query_results.insert(body.into(), rows);
    }

    fn closure(&self) -> Vec<&MemoryGraph> {
        let mut graphs = vec![self];
        for import in &self.imports {
            graphs.extend(import.closure());
        }
        graphs
    }

    fn graphs_in(&self, scope: ImportScope) -> Vec<&MemoryGraph> {
        match scope {
            ImportScope::Local => vec![self],
            ImportScope::Closure => self.closure(),
        }
    }
}

impl GraphStore for MemoryGraph {
    fn ontology_iri(&self) -> Option<&Iri> {
        self.ontology_iri.as_ref()
    }

    fn header_annotations(&self) -> &[Annotation] {
        &self.header
    }

    fn axioms(&self, scope: ImportScope) -> Vec<&Axiom> {
        self.graphs_in(scope)
            .into_iter()
            .flat_map(|g| g.axioms.iter())
            .collect()
    }

    fn annotation_assertions(
        &self,
        subject: &Iri,
        scope: ImportScope,
    ) -> Vec<&AnnotationAssertion> {
        let mut out = Vec::new();
        for graph in self.graphs_in(scope) {
            if let Some(indexes) = graph.by_subject.get(subject) {
                for &i in indexes {
                    if let Some(aa) = graph.axioms[i].as_annotation_assertion() {
                        out.push(aa);
                    }
                }
            }
        }
        out
    }

    fn declared_classes(&self, scope: ImportScope) -> Vec<Iri> {
        let mut seen = AHashMap::new();
        let mut out = Vec::new();
        for axiom in self.axioms(scope) {
            for entity in axiom.signature() {
                if entity.kind == EntityKind::Class && seen.insert(entity.iri.clone(), ()).is_none()
                {
                    out.push(entity.iri.clone());
                }
            }
        }
        out
    }

    fn is_declared(&self, entity: &Entity) -> bool {
        self.closure()
            .into_iter()
            .flat_map(|g| g.axioms.iter())
            .any(|ax| matches!(&ax.kind, AxiomKind::Declaration(e) if e == entity))
    }

    fn execute_query(&self, body: &str) -> Result<Vec<QueryRow>, QueryError> {
        self.query_results
            .get(body)
            .cloned()
            .ok_or_else(|| QueryError::Unsupported(body.to_string()))
    }

    fn label(&self, iri: &Iri) -> Option<String> {
        for aa in self.annotation_assertions(iri, ImportScope::Closure) {
            if aa.property.as_str() == vocab::RDFS_LABEL {
                if let AnnotationValue::Literal(lit) = &aa.value {
                    return Some(lit.lexical.clone());
                }
            }
        }
        None
    }
}
