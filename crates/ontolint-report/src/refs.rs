//! Invalid-reference checks
//!
//! Two entity predicates drive this module: `is_dangling` (no axioms about
//! the entity in scope) and `is_deprecated` (explicitly marked obsolete
//! anywhere in the import closure). Scanning a set of axioms against those
//! predicates yields DANGLING and DEPRECATED violations.

use ontolint_graph::{
    vocab, AnnotationValue, Axiom, Entity, EntityKind, GraphStore, ImportScope, Iri,
};

use crate::violation::{Category, Severity, Violation};

const DANGLING_SEVERITY: u8 = 1;
const DEPRECATED_SEVERITY: u8 = 2;

fn sev(level: u8) -> Severity {
    Severity::new(level).unwrap_or(Severity::MAX)
}

/// True iff `entity` has no axioms about it and no annotation assertions in
/// the closure. Only classes and object properties can dangle: other kinds
/// (annotation properties in particular) routinely live outside the graph.
pub fn is_dangling(graph: &dyn GraphStore, entity: &Entity) -> bool {
    if !matches!(
        entity.kind,
        EntityKind::Class | EntityKind::ObjectProperty
    ) {
        return false;
    }
    if graph
        .axioms(ImportScope::Closure)
        .iter()
        .any(|ax| ax.is_about(&entity.iri))
    {
        return false;
    }
    graph
        .annotation_assertions(&entity.iri, ImportScope::Closure)
        .is_empty()
}

/// True iff some annotation assertion in the import closure marks the
/// entity's identifier as deprecated with a true boolean value.
pub fn is_deprecated(graph: &dyn GraphStore, iri: &Iri) -> bool {
    graph
        .annotation_assertions(iri, ImportScope::Closure)
        .iter()
        .any(|aa| {
            aa.property.as_str() == vocab::OWL_DEPRECATED
                && matches!(
                    &aa.value,
                    AnnotationValue::Literal(lit) if lit.as_bool() == Some(true)
                )
        })
}

/// True iff the identifier has been merged into another term (a replacement
/// assertion is present), meaning references to it are redirected.
pub fn is_merged(graph: &dyn GraphStore, iri: &Iri) -> bool {
    graph
        .annotation_assertions(iri, ImportScope::Closure)
        .iter()
        .any(|aa| aa.property.as_str() == vocab::TERM_REPLACED_BY)
}

/// Scan `axioms` for references to dangling or deprecated entities. A pure
/// declaration of a deprecated entity is exempt from the deprecation check.
pub fn invalid_references(
    graph: &dyn GraphStore,
    axioms: &[&Axiom],
    ignore_dangling: bool,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for axiom in axioms {
        for entity in axiom.signature() {
            if !ignore_dangling && is_dangling(graph, entity) {
                violations.push(
                    Violation::new(
                        sev(DANGLING_SEVERITY),
                        Category::InvalidReference,
                        format!("DANGLING reference to {}", entity.iri),
                    )
                    .with_subject(entity.iri.clone()),
                );
            }
            if is_deprecated(graph, &entity.iri) && !axiom.is_declaration_of(&entity.iri) {
                violations.push(
                    Violation::new(
                        sev(DEPRECATED_SEVERITY),
                        Category::InvalidReference,
                        format!("DEPRECATED reference to {}", entity.iri),
                    )
                    .with_subject(entity.iri.clone()),
                );
            }
        }
    }
    violations
}

/// Scan every axiom visible in `scope`.
pub fn invalid_references_in(
    graph: &dyn GraphStore,
    scope: ImportScope,
    ignore_dangling: bool,
) -> Vec<Violation> {
    let axioms = graph.axioms(scope);
    invalid_references(graph, &axioms, ignore_dangling)
}

/// Module-consistency check: the base graph's axioms are checked for
/// references into the import module. Only deprecation matters across the
/// module boundary, so dangling is suppressed.
pub fn check_import_module(
    import_module: &dyn GraphStore,
    base: &dyn GraphStore,
) -> Vec<Violation> {
    let axioms = base.axioms(ImportScope::Closure);
    invalid_references(import_module, &axioms, true)
}
