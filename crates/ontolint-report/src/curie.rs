//! CURIE syntax checks
//!
//! Many graphs denote external entities with a compact `prefix:fragment`
//! identifier inside a string literal rather than a resolvable IRI. This
//! checker scans every annotation assertion (and every axiom-level
//! annotation) whose property is CURIE-valued and validates the literal:
//! whitespace, separator count, blank prefix, and numeric-only namespaces.
//!
//! Pure function of the graph; no state is kept between runs.

use ontolint_graph::{vocab, Axiom, GraphStore, ImportScope, Iri};

use crate::violation::{Category, Severity, Violation};

/// Which properties carry CURIE literals and which prefixes only admit
/// numeric fragments (literature identifiers and the like).
#[derive(Debug, Clone)]
pub struct CurieChecker {
    curie_valued: Vec<Iri>,
    numeric_namespaces: Vec<String>,
}

impl Default for CurieChecker {
    fn default() -> Self {
        CurieChecker {
            curie_valued: vec![Iri::new(vocab::HAS_DBXREF)],
            numeric_namespaces: vec!["PMID".to_string()],
        }
    }
}

impl CurieChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_curie_valued_property(&mut self, property: Iri) {
        self.curie_valued.push(property);
    }

    pub fn add_numeric_namespace(&mut self, prefix: impl Into<String>) {
        self.numeric_namespaces.push(prefix.into());
    }

    fn is_curie_valued(&self, property: &Iri) -> bool {
        self.curie_valued.contains(property)
    }

    /// Scan the whole graph for invalid CURIE literals.
    pub fn check(&self, graph: &dyn GraphStore) -> Vec<Violation> {
        let mut violations = Vec::new();
        for axiom in graph.axioms(ImportScope::Local) {
            if let Some(aa) = axiom.as_annotation_assertion() {
                if self.is_curie_valued(&aa.property) {
                    if let Some(lit) = aa.value.as_literal() {
                        self.check_id(&lit.lexical, axiom, &mut violations);
                    }
                }
            }
            for ann in &axiom.annotations {
                if self.is_curie_valued(&ann.property) {
                    if let Some(lit) = ann.value.as_literal() {
                        self.check_id(&lit.lexical, axiom, &mut violations);
                    }
                }
            }
        }
        violations
    }

    /// Validate a single identifier. The whitespace check always fires when
    /// it applies; the separator checks are mutually exclusive branches.
    pub fn check_id(&self, id: &str, axiom: &Axiom, out: &mut Vec<Violation>) {
        let subject = axiom
            .signature()
            .first()
            .map(|e| e.iri.clone());
        let push = |out: &mut Vec<Violation>, level: u8, message: String| {
            let mut v = Violation::new(
                Severity::new(level).unwrap_or(Severity::MAX),
                Category::Curie,
                message,
            );
            if let Some(s) = &subject {
                v = v.with_subject(s.clone());
            }
            out.push(v);
        };

        if id.chars().any(char::is_whitespace) {
            push(out, 4, format!("id/curie contains whitespace: '{id}'"));
        }

        match id.matches(':').count() {
            0 => push(
                out,
                3,
                format!("id/curie does not contain ':' separator - '{id}'"),
            ),
            1 => {
                let (prefix, fragment) = id.split_once(':').unwrap_or((id, ""));
                if prefix.is_empty() {
                    push(out, 4, format!("blank prefix in '{id}'"));
                }
                if self.numeric_namespaces.iter().any(|ns| ns == prefix)
                    && fragment.chars().any(|c| !c.is_ascii_digit())
                {
                    push(out, 4, format!("local id must be numeric '{id}'"));
                }
            }
            _ => push(
                out,
                3,
                format!("id/curie should contain exactly one ':' separator - '{id}'"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontolint_graph::AnnotationValue;

    fn xref_axiom(id: &str) -> Axiom {
        Axiom::annotation("ex:A", vocab::HAS_DBXREF, AnnotationValue::string(id))
    }

    fn check_one(id: &str) -> Vec<Violation> {
        let checker = CurieChecker::new();
        let axiom = xref_axiom(id);
        let mut out = Vec::new();
        checker.check_id(id, &axiom, &mut out);
        out
    }

    #[test]
    fn missing_separator_is_one_severity_3() {
        let out = check_one("GO_12345");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity.get(), 3);
    }

    #[test]
    fn well_formed_curie_passes() {
        assert!(check_one("GO:12345").is_empty());
        assert!(check_one("PMID:12345").is_empty());
    }

    #[test]
    fn non_numeric_pmid_fragment_is_one_severity_4() {
        let out = check_one("PMID:12a");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity.get(), 4);
    }

    #[test]
    fn whitespace_fires_regardless_of_separator_validity() {
        for id in ["GO: 123", "GO 123", "a b:c:d"] {
            let out = check_one(id);
            assert!(
                out.iter().any(|v| v.severity.get() == 4
                    && v.description.contains("whitespace")),
                "no whitespace violation for {id:?}"
            );
        }
    }

    #[test]
    fn blank_prefix_is_severity_4() {
        let out = check_one(":12345");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity.get(), 4);
        assert!(out[0].description.contains("blank prefix"));
    }

    #[test]
    fn two_separators_is_severity_3() {
        let out = check_one("GO:12:34");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity.get(), 3);
        assert!(out[0].description.contains("exactly one"));
    }

    proptest::proptest! {
        #[test]
        fn check_id_never_panics_and_stays_in_range(id in ".*") {
            let out = check_one(&id);
            for v in &out {
                proptest::prop_assert!((3..=4).contains(&v.severity.get()));
            }
        }

        #[test]
        fn single_colon_all_digit_pmids_pass(n in 0u64..=u64::MAX) {
            let id = format!("PMID:{n}");
            proptest::prop_assert!(check_one(&id).is_empty());
        }
    }

    #[test]
    fn scan_covers_axiom_level_annotations() {
        use ontolint_graph::{Annotation, MemoryGraph};
        let mut graph = MemoryGraph::new();
        graph.add_axiom(Axiom::sub_class_of("ex:A", "ex:B").with_annotations(vec![
            Annotation::new(vocab::HAS_DBXREF, AnnotationValue::string("bad id")),
        ]));
        let out = CurieChecker::new().check(&graph);
        assert_eq!(out.len(), 2); // whitespace + missing separator
    }
}
