//! Structural checker registry
//!
//! The set of structural checks is closed: each is a variant of
//! [`StructuralChecker`] and dispatch is a match, so adding a check means
//! adding a variant and the compiler points at every site that must learn
//! about it. A [`CheckerSet`] holds the configured instances and can look
//! them up by name for selective runs.

use crate::curie::CurieChecker;
use crate::metadata::{MetadataChecker, Profile};
use crate::refs;
use crate::violation::Violation;

use ontolint_graph::{GraphStore, ImportScope};

/// One structural check over the whole graph.
pub enum StructuralChecker {
    /// Compact-identifier syntax on CURIE-valued annotations.
    Curie(CurieChecker),
    /// Dangling and deprecated entity references.
    InvalidReference {
        /// Suppress dangling reports (useful when the graph is a module
        /// extracted from a larger one and stubs are expected).
        ignore_dangling: bool,
    },
    /// Header-level cardinality constraints.
    OntologyMetadata(Profile),
    /// Per-class annotation cardinality constraints.
    ClassMetadata(Profile),
}

impl StructuralChecker {
    /// Stable name, usable as a CLI/selector token.
    pub fn name(&self) -> &'static str {
        match self {
            StructuralChecker::Curie(_) => "curie",
            StructuralChecker::InvalidReference { .. } => "invalid-reference",
            StructuralChecker::OntologyMetadata(_) => "ontology-metadata",
            StructuralChecker::ClassMetadata(_) => "class-metadata",
        }
    }

    pub fn check(&self, graph: &dyn GraphStore) -> Vec<Violation> {
        match self {
            StructuralChecker::Curie(checker) => checker.check(graph),
            StructuralChecker::InvalidReference { ignore_dangling } => {
                refs::invalid_references_in(graph, ImportScope::Closure, *ignore_dangling)
            }
            StructuralChecker::OntologyMetadata(profile) => {
                MetadataChecker::new(*profile).check_header(graph)
            }
            StructuralChecker::ClassMetadata(profile) => {
                MetadataChecker::new(*profile).check_classes(graph)
            }
        }
    }
}

/// An ordered collection of structural checkers.
pub struct CheckerSet {
    checkers: Vec<StructuralChecker>,
}

impl CheckerSet {
    pub fn new(checkers: Vec<StructuralChecker>) -> Self {
        CheckerSet { checkers }
    }

    /// The default lineup for a profile: every structural check, dangling
    /// references included.
    pub fn standard(profile: Profile) -> Self {
        CheckerSet::new(vec![
            StructuralChecker::Curie(CurieChecker::new()),
            StructuralChecker::InvalidReference {
                ignore_dangling: false,
            },
            StructuralChecker::OntologyMetadata(profile),
            StructuralChecker::ClassMetadata(profile),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&StructuralChecker> {
        self.checkers.iter().find(|c| c.name() == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.checkers.iter().map(StructuralChecker::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StructuralChecker> {
        self.checkers.iter()
    }

    /// Run every checker in order, concatenating violations.
    pub fn check_all(&self, graph: &dyn GraphStore) -> Vec<Violation> {
        let mut violations = Vec::new();
        for checker in &self.checkers {
            let found = checker.check(graph);
            tracing::debug!(checker = checker.name(), count = found.len(), "structural check done");
            violations.extend(found);
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontolint_graph::{vocab, Annotation, AnnotationValue, Axiom, MemoryGraph};

    #[test]
    fn standard_set_exposes_all_names() {
        let set = CheckerSet::standard(Profile::Lax);
        assert_eq!(
            set.names(),
            vec![
                "curie",
                "invalid-reference",
                "ontology-metadata",
                "class-metadata"
            ]
        );
        assert!(set.get("curie").is_some());
        assert!(set.get("no-such-check").is_none());
    }

    #[test]
    fn check_all_concatenates_results() {
        let mut g = MemoryGraph::with_iri("http://example.org/onto");
        for p in [
            vocab::DC_DESCRIPTION,
            vocab::DC_TITLE,
            vocab::DC_LICENSE,
            vocab::DC_CREATOR,
        ] {
            g.add_header_annotation(Annotation::new(p, AnnotationValue::string("x")));
        }
        // one bad CURIE, one dangling superclass
        g.add_axiom(Axiom::annotation(
            "ex:A",
            vocab::HAS_DBXREF,
            AnnotationValue::string("no_separator"),
        ));
        g.add_axiom(Axiom::sub_class_of("ex:A", "ex:Missing"));

        let violations = CheckerSet::standard(Profile::Lax).check_all(&g);
        assert!(violations
            .iter()
            .any(|v| v.description.contains("separator")));
        assert!(violations
            .iter()
            .any(|v| v.description.contains("DANGLING")));
    }

    #[test]
    fn ignore_dangling_flag_is_honored() {
        let mut g = MemoryGraph::new();
        g.add_axiom(Axiom::sub_class_of("ex:A", "ex:Missing"));
        let checker = StructuralChecker::InvalidReference {
            ignore_dangling: true,
        };
        assert!(checker.check(&g).is_empty());
    }
}
