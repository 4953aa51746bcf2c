//! Typed ontology model
//!
//! Axioms are read-only snapshots: checkers look at them, never mutate them.
//! Each axiom carries its entity signature precomputed at construction, the
//! way query backends expose it, so signature scans stay allocation-free.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vocab;

// ============================================================================
// Identifiers and entities
// ============================================================================

/// An IRI-like identifier for a graph subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Iri(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Iri(s.to_string())
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Iri(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Class,
    ObjectProperty,
    DataProperty,
    AnnotationProperty,
    NamedIndividual,
    Datatype,
}

/// An identifiable graph subject. Entities are referenced by checkers, never
/// owned by them; the facade is the source of truth for declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    pub iri: Iri,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(iri: impl Into<Iri>, kind: EntityKind) -> Self {
        Entity { iri: iri.into(), kind }
    }

    pub fn class(iri: impl Into<Iri>) -> Self {
        Entity::new(iri, EntityKind::Class)
    }

    pub fn object_property(iri: impl Into<Iri>) -> Self {
        Entity::new(iri, EntityKind::ObjectProperty)
    }

    pub fn annotation_property(iri: impl Into<Iri>) -> Self {
        Entity::new(iri, EntityKind::AnnotationProperty)
    }

    pub fn named_individual(iri: impl Into<Iri>) -> Self {
        Entity::new(iri, EntityKind::NamedIndividual)
    }
}

// ============================================================================
// Annotation values
// ============================================================================

/// A literal value with optional language tag and datatype.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub lexical: String,
    pub lang: Option<String>,
    pub datatype: Option<Iri>,
}

impl Literal {
    pub fn string(lexical: impl Into<String>) -> Self {
        Literal { lexical: lexical.into(), lang: None, datatype: None }
    }

    pub fn lang_tagged(lexical: impl Into<String>, lang: impl Into<String>) -> Self {
        Literal { lexical: lexical.into(), lang: Some(lang.into()), datatype: None }
    }

    pub fn typed(lexical: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Literal { lexical: lexical.into(), lang: None, datatype: Some(datatype.into()) }
    }

    pub fn boolean(value: bool) -> Self {
        Literal::typed(if value { "true" } else { "false" }, vocab::XSD_BOOLEAN)
    }

    /// Parse the lexical form as a boolean, case-insensitively.
    pub fn as_bool(&self) -> Option<bool> {
        match self.lexical.to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }
}

/// Value of an annotation: either a literal or a reference to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationValue {
    Literal(Literal),
    Iri(Iri),
}

impl AnnotationValue {
    pub fn string(lexical: impl Into<String>) -> Self {
        AnnotationValue::Literal(Literal::string(lexical))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            AnnotationValue::Literal(lit) => Some(lit),
            AnnotationValue::Iri(_) => None,
        }
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            AnnotationValue::Iri(iri) => Some(iri),
            AnnotationValue::Literal(_) => None,
        }
    }
}

/// An annotation attached to an axiom or to the ontology header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub property: Iri,
    pub value: AnnotationValue,
}

impl Annotation {
    pub fn new(property: impl Into<Iri>, value: AnnotationValue) -> Self {
        Annotation { property: property.into(), value }
    }
}

/// A `(subject, property, value)` annotation triple about a named subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationAssertion {
    pub subject: Iri,
    pub property: Iri,
    pub value: AnnotationValue,
}

// ============================================================================
// Axioms
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxiomKind {
    Declaration(Entity),
    SubClassOf { sub: Iri, sup: Iri },
    EquivalentClasses(Vec<Iri>),
    DisjointClasses(Vec<Iri>),
    SubPropertyOf { sub: Iri, sup: Iri },
    ClassAssertion { individual: Iri, class: Iri },
    AnnotationAssertion(AnnotationAssertion),
}

/// One statement in the graph: a typed kind, axiom-level annotations, and the
/// set of entities the statement mentions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axiom {
    pub kind: AxiomKind,
    pub annotations: Vec<Annotation>,
    signature: Vec<Entity>,
}

impl Axiom {
    pub fn new(kind: AxiomKind) -> Self {
        let signature = compute_signature(&kind);
        Axiom { kind, annotations: Vec::new(), signature }
    }

    pub fn declaration(entity: Entity) -> Self {
        Axiom::new(AxiomKind::Declaration(entity))
    }

    pub fn sub_class_of(sub: impl Into<Iri>, sup: impl Into<Iri>) -> Self {
        Axiom::new(AxiomKind::SubClassOf { sub: sub.into(), sup: sup.into() })
    }

    pub fn equivalent_classes(classes: Vec<Iri>) -> Self {
        Axiom::new(AxiomKind::EquivalentClasses(classes))
    }

    pub fn disjoint_classes(classes: Vec<Iri>) -> Self {
        Axiom::new(AxiomKind::DisjointClasses(classes))
    }

    pub fn annotation(
        subject: impl Into<Iri>,
        property: impl Into<Iri>,
        value: AnnotationValue,
    ) -> Self {
        Axiom::new(AxiomKind::AnnotationAssertion(AnnotationAssertion {
            subject: subject.into(),
            property: property.into(),
            value,
        }))
    }

    /// Attach axiom-level annotations (provenance and the like).
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }

    /// Entities this axiom mentions.
    pub fn signature(&self) -> &[Entity] {
        &self.signature
    }

    pub fn as_annotation_assertion(&self) -> Option<&AnnotationAssertion> {
        match &self.kind {
            AxiomKind::AnnotationAssertion(aa) => Some(aa),
            _ => None,
        }
    }

    /// True iff this axiom is exactly the declaration of `iri`.
    pub fn is_declaration_of(&self, iri: &Iri) -> bool {
        matches!(&self.kind, AxiomKind::Declaration(e) if &e.iri == iri)
    }

    /// True iff this axiom defines or describes `iri`: `iri` sits in subject
    /// position (subclass subject, equivalence or disjointness member,
    /// sub-property subject, assertion individual, annotation subject).
    /// Declarations do not count as being "about" their entity.
    pub fn is_about(&self, iri: &Iri) -> bool {
        match &self.kind {
            AxiomKind::Declaration(_) => false,
            AxiomKind::SubClassOf { sub, .. } => sub == iri,
            AxiomKind::EquivalentClasses(classes) | AxiomKind::DisjointClasses(classes) => {
                classes.contains(iri)
            }
            AxiomKind::SubPropertyOf { sub, .. } => sub == iri,
            AxiomKind::ClassAssertion { individual, .. } => individual == iri,
            AxiomKind::AnnotationAssertion(aa) => &aa.subject == iri,
        }
    }
}

/// Annotation-assertion subjects are typed as classes: the subject's real
/// kind is not recoverable from the triple alone, and the checks that look
/// at signatures only distinguish classes and object properties.
fn compute_signature(kind: &AxiomKind) -> Vec<Entity> {
    match kind {
        AxiomKind::Declaration(e) => vec![e.clone()],
        AxiomKind::SubClassOf { sub, sup } => {
            vec![Entity::class(sub.clone()), Entity::class(sup.clone())]
        }
        AxiomKind::EquivalentClasses(classes) | AxiomKind::DisjointClasses(classes) => {
            classes.iter().map(|c| Entity::class(c.clone())).collect()
        }
        AxiomKind::SubPropertyOf { sub, sup } => vec![
            Entity::object_property(sub.clone()),
            Entity::object_property(sup.clone()),
        ],
        AxiomKind::ClassAssertion { individual, class } => vec![
            Entity::named_individual(individual.clone()),
            Entity::class(class.clone()),
        ],
        AxiomKind::AnnotationAssertion(aa) => vec![
            Entity::class(aa.subject.clone()),
            Entity::annotation_property(aa.property.clone()),
        ],
    }
}
