//! Class-definition cycle detection
//!
//! Sound but possibly incomplete: a reported cycle is real, but some cycles
//! through constructs the traversal does not expand may be missed. For each
//! class the search walks its "definition" breadth-first (direct
//! superclasses plus equivalence co-members) and reports a cycle as soon as
//! the root class shows up in a visited definition.

use std::collections::VecDeque;

use ahash::AHashSet;

use ontolint_graph::{AxiomKind, GraphStore, ImportScope, Iri};

/// Direct definition of `class`: superclasses from subclass axioms plus
/// co-members of any equivalence axiom it belongs to (excluding itself).
fn definition_of(graph: &dyn GraphStore, class: &Iri, scope: ImportScope) -> Vec<Iri> {
    let mut out = Vec::new();
    for axiom in graph.axioms(scope) {
        match &axiom.kind {
            AxiomKind::SubClassOf { sub, sup } if sub == class => out.push(sup.clone()),
            AxiomKind::EquivalentClasses(classes) if classes.contains(class) => {
                out.extend(classes.iter().filter(|c| *c != class).cloned());
            }
            _ => {}
        }
    }
    out
}

/// True iff `root` can reach itself through subclass/equivalence definitions.
pub fn class_has_cycle(graph: &dyn GraphStore, root: &Iri, scope: ImportScope) -> bool {
    let mut queue: VecDeque<Iri> = VecDeque::new();
    let mut visited: AHashSet<Iri> = AHashSet::new();
    queue.push_back(root.clone());

    while let Some(current) = queue.pop_front() {
        if &current == root && !queue.is_empty() {
            tracing::warn!(
                class = %root,
                "cycle detector re-entered its root mid-traversal; results may be unreliable"
            );
        }
        if !visited.insert(current.clone()) {
            continue;
        }

        let definition = definition_of(graph, &current, scope);
        if definition.iter().any(|c| c == root) {
            return true;
        }
        for class in definition {
            if class != current {
                queue.push_back(class);
            }
        }
    }
    false
}

/// First class (in declaration order) whose definition reaches back to
/// itself, if any.
pub fn find_cycle(graph: &dyn GraphStore, scope: ImportScope) -> Option<Iri> {
    graph
        .declared_classes(scope)
        .into_iter()
        .find(|class| class_has_cycle(graph, class, scope))
}

/// True iff any class in scope participates in a definition cycle.
pub fn contains_cycle(graph: &dyn GraphStore, scope: ImportScope) -> bool {
    find_cycle(graph, scope).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontolint_graph::{Axiom, MemoryGraph};

    #[test]
    fn three_class_loop_is_a_cycle() {
        let mut g = MemoryGraph::new();
        g.add_axiom(Axiom::sub_class_of("ex:A", "ex:B"));
        g.add_axiom(Axiom::sub_class_of("ex:B", "ex:C"));
        g.add_axiom(Axiom::sub_class_of("ex:C", "ex:A"));
        assert!(contains_cycle(&g, ImportScope::Local));
    }

    #[test]
    fn open_chain_is_not_a_cycle() {
        let mut g = MemoryGraph::new();
        g.add_axiom(Axiom::sub_class_of("ex:A", "ex:B"));
        g.add_axiom(Axiom::sub_class_of("ex:B", "ex:C"));
        assert!(!contains_cycle(&g, ImportScope::Local));
    }

    #[test]
    fn equivalence_closes_a_cycle() {
        let mut g = MemoryGraph::new();
        g.add_axiom(Axiom::sub_class_of("ex:A", "ex:B"));
        g.add_axiom(Axiom::equivalent_classes(vec![
            Iri::new("ex:B"),
            Iri::new("ex:A"),
        ]));
        assert!(contains_cycle(&g, ImportScope::Local));
    }

    #[test]
    fn self_equivalence_alone_is_ignored() {
        // the class itself is excluded from its own equivalence definition
        let mut g = MemoryGraph::new();
        g.add_axiom(Axiom::equivalent_classes(vec![Iri::new("ex:A")]));
        g.add_axiom(Axiom::sub_class_of("ex:A", "ex:B"));
        assert!(!contains_cycle(&g, ImportScope::Local));
    }

    #[test]
    fn find_cycle_names_a_root() {
        let mut g = MemoryGraph::new();
        g.add_axiom(Axiom::sub_class_of("ex:X", "ex:Y"));
        g.add_axiom(Axiom::sub_class_of("ex:A", "ex:B"));
        g.add_axiom(Axiom::sub_class_of("ex:B", "ex:A"));
        let root = find_cycle(&g, ImportScope::Local).expect("cycle");
        assert!(root.as_str() == "ex:A" || root.as_str() == "ex:B");
    }
}
