//! Profile-driven metadata cardinality checks
//!
//! Two passes: the ontology header (title, description, license, creator)
//! and every declared class (label, definition and its provenance, namespace
//! tag, audit annotations). The profile is fixed at construction and selects
//! which class-level rules apply and their thresholds.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use ontolint_graph::{vocab, AnnotationValue, GraphStore, ImportScope, Iri};

use crate::refs;
use crate::violation::{CardinalityIssue, CardinalityOp, Category, Severity, Violation};

/// Validation stringency for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Profile {
    /// Generic lax style: definitions optional.
    #[default]
    Lax,
    /// Curated style: every live class needs a definition with provenance.
    Strict,
    /// Strictest style: additionally requires a namespace tag per class.
    Foundry,
}

type AnnotationMap = AHashMap<Iri, Vec<AnnotationValue>>;

/// Collect distinct values per property. The map has value-set semantics: a
/// property asserted twice with the same value counts once for cardinality.
fn collect_by_property<'a>(
    pairs: impl Iterator<Item = (&'a Iri, &'a AnnotationValue)>,
) -> AnnotationMap {
    let mut map = AnnotationMap::new();
    for (property, value) in pairs {
        let values = map.entry(property.clone()).or_default();
        if !values.contains(value) {
            values.push(value.clone());
        }
    }
    map
}

/// Check that `property` occurs within `[min, max]` times in `amap`.
/// Returns `None` when satisfied.
pub fn check_cardinality(
    property: &Iri,
    min: usize,
    max: Option<usize>,
    amap: &AnnotationMap,
) -> Option<CardinalityIssue> {
    let observed = amap.get(property).map_or(0, Vec::len);
    if observed < min {
        return Some(CardinalityIssue {
            property: property.clone(),
            observed,
            op: CardinalityOp::LessThan,
            expected: min,
        });
    }
    if let Some(max) = max {
        if observed > max {
            return Some(CardinalityIssue {
                property: property.clone(),
                observed,
                op: CardinalityOp::MoreThan,
                expected: max,
            });
        }
    }
    None
}

pub struct MetadataChecker {
    profile: Profile,
}

impl MetadataChecker {
    pub fn new(profile: Profile) -> Self {
        MetadataChecker { profile }
    }

    /// Fixed cardinality constraints on the ontology header.
    pub fn check_header(&self, graph: &dyn GraphStore) -> Vec<Violation> {
        let amap = collect_by_property(
            graph
                .header_annotations()
                .iter()
                .map(|a| (&a.property, &a.value)),
        );

        let mut violations = Vec::new();
        let mut check = |property: &str, min: usize, max: Option<usize>, severity: u8| {
            let property = Iri::new(property);
            if let Some(issue) = check_cardinality(&property, min, max, &amap) {
                let mut v = Violation::new(
                    Severity::new(severity).unwrap_or(Severity::MIN),
                    Category::OntologyMetadata,
                    format!("cardinality of {property}: {issue}"),
                );
                if let Some(iri) = graph.ontology_iri() {
                    v = v.with_subject(iri.clone());
                }
                violations.push(v);
            }
        };

        check(vocab::DC_DESCRIPTION, 1, Some(1), 1);
        check(vocab::DC_TITLE, 1, Some(1), 1);
        check(vocab::DC_LICENSE, 1, Some(1), 5);
        check(vocab::DC_CREATOR, 1, None, 1);
        violations
    }

    /// Per-class annotation checks for every declared class in the graph
    /// itself (imports are not re-checked here).
    pub fn check_classes(&self, graph: &dyn GraphStore) -> Vec<Violation> {
        let mut violations = Vec::new();
        for class in graph.declared_classes(ImportScope::Local) {
            // stub declarations referencing the import chain are skipped,
            // as are identifiers merged into another term
            if refs::is_dangling(graph, &ontolint_graph::Entity::class(class.clone())) {
                continue;
            }
            if refs::is_merged(graph, &class) {
                continue;
            }

            let assertions = graph.annotation_assertions(&class, ImportScope::Local);
            let amap = collect_by_property(
                assertions.iter().map(|aa| (&aa.property, &aa.value)),
            );

            let check = |property: &str, min: usize, max: Option<usize>, out: &mut Vec<_>| {
                let property = Iri::new(property);
                if let Some(issue) = check_cardinality(&property, min, max, &amap) {
                    let label = graph
                        .label(&class)
                        .unwrap_or_else(|| class.to_string());
                    out.push(
                        Violation::new(
                            Severity::MIN,
                            Category::ClassMetadata,
                            format!("'{label}': {issue}"),
                        )
                        .with_subject(class.clone()),
                    );
                }
            };

            // every class, live or deprecated, must have exactly one label
            check(vocab::RDFS_LABEL, 1, Some(1), &mut violations);

            if refs::is_deprecated(graph, &class) {
                continue;
            }

            match self.profile {
                Profile::Lax => {
                    check(vocab::DEFINITION, 0, Some(1), &mut violations);
                }
                Profile::Strict | Profile::Foundry => {
                    check(vocab::DEFINITION, 1, Some(1), &mut violations);

                    // a definition is expected to carry provenance, either as
                    // axiom-level annotations on the definition assertion or
                    // as a separate editor-provenance annotation
                    let definition = Iri::new(vocab::DEFINITION);
                    let has_axiom_provenance = graph
                        .axioms(ImportScope::Local)
                        .iter()
                        .filter_map(|ax| {
                            ax.as_annotation_assertion()
                                .filter(|aa| aa.subject == class && aa.property == definition)
                                .map(|_| ax)
                        })
                        .any(|ax| !ax.annotations.is_empty());
                    if !has_axiom_provenance {
                        check(vocab::DEFINITION_EDITOR, 1, None, &mut violations);
                    }
                }
            }

            let min_namespace = match self.profile {
                Profile::Foundry => 1,
                _ => 0,
            };
            check(vocab::NAMESPACE_TAG, min_namespace, Some(1), &mut violations);
            check(vocab::CREATED_BY, 0, Some(1), &mut violations);
            check(vocab::CREATION_DATE, 0, Some(1), &mut violations);
        }
        violations
    }

    /// Header pass followed by the class pass.
    pub fn check(&self, graph: &dyn GraphStore) -> Vec<Violation> {
        let mut violations = self.check_header(graph);
        violations.extend(self.check_classes(graph));
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontolint_graph::{Annotation, Axiom, Entity, Literal, MemoryGraph};

    fn graph_with_header() -> MemoryGraph {
        let mut g = MemoryGraph::with_iri("http://example.org/onto");
        for p in [vocab::DC_DESCRIPTION, vocab::DC_TITLE, vocab::DC_LICENSE, vocab::DC_CREATOR] {
            g.add_header_annotation(Annotation::new(p, AnnotationValue::string("x")));
        }
        g
    }

    fn add_class(g: &mut MemoryGraph, iri: &str, label: Option<&str>) {
        g.add_axiom(Axiom::declaration(Entity::class(iri)));
        // keep the class non-dangling even when unlabelled
        g.add_axiom(Axiom::sub_class_of(iri, "ex:Root"));
        if let Some(label) = label {
            g.add_axiom(Axiom::annotation(
                iri,
                vocab::RDFS_LABEL,
                AnnotationValue::string(label),
            ));
        }
    }

    #[test]
    fn complete_header_passes() {
        let checker = MetadataChecker::new(Profile::Lax);
        assert!(checker.check_header(&graph_with_header()).is_empty());
    }

    #[test]
    fn missing_license_is_severity_5() {
        let mut g = MemoryGraph::with_iri("http://example.org/onto");
        for p in [vocab::DC_DESCRIPTION, vocab::DC_TITLE, vocab::DC_CREATOR] {
            g.add_header_annotation(Annotation::new(p, AnnotationValue::string("x")));
        }
        let violations = MetadataChecker::new(Profile::Lax).check_header(&g);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity.get(), 5);
    }

    #[test]
    fn duplicate_title_violates_max() {
        let mut g = graph_with_header();
        g.add_header_annotation(Annotation::new(
            vocab::DC_TITLE,
            AnnotationValue::string("again"),
        ));
        let violations = MetadataChecker::new(Profile::Lax).check_header(&g);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].description.contains("MORE_THAN"));
    }

    #[test]
    fn repeated_identical_title_counts_once() {
        // value-set semantics: re-asserting the same title is not a
        // cardinality violation
        let mut g = graph_with_header();
        g.add_header_annotation(Annotation::new(
            vocab::DC_TITLE,
            AnnotationValue::string("x"),
        ));
        let violations = MetadataChecker::new(Profile::Lax).check_header(&g);
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }

    #[test]
    fn labelled_class_without_definition_passes_lax_fails_strict() {
        let mut g = graph_with_header();
        add_class(&mut g, "ex:A", Some("a thing"));

        let lax = MetadataChecker::new(Profile::Lax).check_classes(&g);
        let lax: Vec<_> = lax
            .iter()
            .filter(|v| v.subject.as_ref().map(Iri::as_str) == Some("ex:A"))
            .collect();
        assert!(lax.is_empty(), "unexpected: {lax:?}");

        let strict = MetadataChecker::new(Profile::Strict).check_classes(&g);
        let strict: Vec<_> = strict
            .iter()
            .filter(|v| {
                v.subject.as_ref().map(Iri::as_str) == Some("ex:A")
                    && v.description.contains("IAO_0000115")
            })
            .collect();
        assert_eq!(strict.len(), 1);
        assert!(strict[0].description.contains("LESS_THAN"));
    }

    #[test]
    fn missing_label_is_severity_1() {
        let mut g = graph_with_header();
        add_class(&mut g, "ex:A", None);
        let violations = MetadataChecker::new(Profile::Lax).check_classes(&g);
        assert!(violations.iter().any(|v| {
            v.severity == Severity::MIN
                && v.subject.as_ref().map(Iri::as_str) == Some("ex:A")
                && v.description.contains("rdf-schema#label")
        }));
    }

    #[test]
    fn deprecated_class_skips_definition_checks() {
        let mut g = graph_with_header();
        add_class(&mut g, "ex:Old", Some("old"));
        g.add_axiom(Axiom::annotation(
            "ex:Old",
            vocab::OWL_DEPRECATED,
            AnnotationValue::Literal(Literal::boolean(true)),
        ));
        let violations = MetadataChecker::new(Profile::Strict).check_classes(&g);
        assert!(
            violations
                .iter()
                .all(|v| v.subject.as_ref().map(Iri::as_str) != Some("ex:Old")),
            "deprecated class should be exempt: {violations:?}"
        );
    }

    #[test]
    fn definition_axiom_provenance_satisfies_strict_profile() {
        let mut g = graph_with_header();
        add_class(&mut g, "ex:A", Some("a"));
        g.add_axiom(
            Axiom::annotation(
                "ex:A",
                vocab::DEFINITION,
                AnnotationValue::string("a thing that is a"),
            )
            .with_annotations(vec![Annotation::new(
                vocab::DEFINITION_EDITOR,
                AnnotationValue::string("editor"),
            )]),
        );
        let violations = MetadataChecker::new(Profile::Strict).check_classes(&g);
        let about_a: Vec<_> = violations
            .iter()
            .filter(|v| v.subject.as_ref().map(Iri::as_str) == Some("ex:A"))
            .collect();
        assert!(about_a.is_empty(), "unexpected: {about_a:?}");
    }

    #[test]
    fn foundry_profile_requires_namespace_tag() {
        let mut g = graph_with_header();
        add_class(&mut g, "ex:A", Some("a"));
        g.add_axiom(Axiom::annotation(
            "ex:A",
            vocab::DEFINITION,
            AnnotationValue::string("def"),
        ));
        g.add_axiom(Axiom::annotation(
            "ex:A",
            vocab::DEFINITION_EDITOR,
            AnnotationValue::string("editor"),
        ));

        let strict = MetadataChecker::new(Profile::Strict).check_classes(&g);
        assert!(!strict
            .iter()
            .any(|v| v.description.contains("hasOBONamespace")));

        let foundry = MetadataChecker::new(Profile::Foundry).check_classes(&g);
        assert!(foundry
            .iter()
            .any(|v| v.description.contains("hasOBONamespace")));
    }

    #[test]
    fn merged_classes_are_skipped() {
        let mut g = graph_with_header();
        add_class(&mut g, "ex:Merged", None);
        g.add_axiom(Axiom::annotation(
            "ex:Merged",
            vocab::TERM_REPLACED_BY,
            AnnotationValue::Iri(Iri::new("ex:Target")),
        ));
        let violations = MetadataChecker::new(Profile::Lax).check_classes(&g);
        assert!(violations
            .iter()
            .all(|v| v.subject.as_ref().map(Iri::as_str) != Some("ex:Merged")));
    }
}
