//! Severity-graded report aggregation and rendering
//!
//! Violations arrive in labeled batches (severity, rule title, violations)
//! and land in exactly one severity bucket each. The report is built once
//! per validation run, is immutable after aggregation, and renders on
//! demand: a line-oriented, 2-space-indented, YAML-compatible text with
//! best-effort label substitution and literal-type-aware quoting, plus a
//! JSON export of the same structure.

use std::collections::BTreeMap;

use serde::Serialize;

use ontolint_graph::{vocab, AnnotationValue, GraphStore, Iri};

use crate::violation::{Severity, Violation};

#[derive(Debug, Clone, Default)]
pub struct Report {
    buckets: BTreeMap<Severity, BTreeMap<String, Vec<Violation>>>,
    counts: BTreeMap<Severity, usize>,
    total: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a batch of violations for one rule into the single bucket for
    /// `severity`. Counts are maintained incrementally.
    pub fn add_batch(
        &mut self,
        severity: Severity,
        rule_title: impl Into<String>,
        violations: Vec<Violation>,
    ) {
        if violations.is_empty() {
            return;
        }
        let count = violations.len();
        self.buckets
            .entry(severity)
            .or_default()
            .entry(rule_title.into())
            .or_default()
            .extend(violations);
        *self.counts.entry(severity).or_insert(0) += count;
        self.total += count;
    }

    pub fn total_violations(&self) -> usize {
        self.total
    }

    pub fn violations_at(&self, severity: Severity) -> usize {
        self.counts.get(&severity).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Violation count for one rule, across all severities. `None` when the
    /// rule contributed nothing to this report.
    pub fn violation_count(&self, rule_title: &str) -> Option<usize> {
        let mut found = false;
        let mut count = 0;
        for rules in self.buckets.values() {
            if let Some(violations) = rules.get(rule_title) {
                found = true;
                count += violations.len();
            }
        }
        found.then_some(count)
    }

    /// Severities with at least one violation, in priority order.
    pub fn nonempty_severities(&self) -> Vec<Severity> {
        self.buckets
            .iter()
            .filter(|(_, rules)| rules.values().any(|v| !v.is_empty()))
            .map(|(s, _)| *s)
            .collect()
    }

    /// All distinct identifiers mentioned by violations: subjects, bound
    /// properties and identifier-typed values.
    pub fn subject_iris(&self) -> Vec<Iri> {
        let mut out: Vec<Iri> = Vec::new();
        let mut push = |iri: &Iri| {
            if !out.contains(iri) {
                out.push(iri.clone());
            }
        };
        for rules in self.buckets.values() {
            for violations in rules.values() {
                for v in violations {
                    if let Some(subject) = &v.subject {
                        push(subject);
                    }
                    for statement in &v.statements {
                        if let Some(property) = &statement.property {
                            push(property);
                        }
                        for value in &statement.values {
                            if let AnnotationValue::Iri(iri) = value {
                                push(iri);
                            }
                        }
                    }
                }
            }
        }
        out
    }

    /// Render the report as YAML-compatible text. Only non-empty severity
    /// buckets are emitted; rules appear sorted by title. When `labels` is
    /// given, subjects and identifier values carry a label line where one
    /// resolves; unresolvable identifiers are silently left bare.
    pub fn render(&self, labels: Option<&dyn GraphStore>) -> String {
        let mut out = String::new();
        for (severity, rules) in &self.buckets {
            if rules.values().all(|v| v.is_empty()) {
                continue;
            }
            out.push_str(&format!("- severity: {severity}\n"));
            out.push_str("  violations:\n");
            for (rule, violations) in rules {
                if violations.is_empty() {
                    continue;
                }
                out.push_str(&format!("  - rule: {}\n", quote(rule)));
                out.push_str("    entities:\n");
                for v in violations {
                    self.render_violation(&mut out, rule, v, labels);
                }
            }
        }
        out
    }

    fn render_violation(
        &self,
        out: &mut String,
        rule: &str,
        v: &Violation,
        labels: Option<&dyn GraphStore>,
    ) {
        let subject = match &v.subject {
            // the ontology's own IRI is kept in full, everything else is
            // shortened to a compact form
            Some(iri) if Some(iri) == labels.and_then(|g| g.ontology_iri()) => iri.to_string(),
            Some(iri) => short_form(iri),
            None => String::new(),
        };
        out.push_str(&format!("    - subject: {}\n", quote(&subject)));
        if let (Some(graph), Some(iri)) = (labels, &v.subject) {
            if let Some(label) = graph.label(iri) {
                out.push_str(&format!("      label: {}\n", quote(&label)));
            }
        }
        if v.description != rule {
            out.push_str(&format!("      message: {}\n", quote(&v.description)));
        }
        if v.statements.is_empty() {
            return;
        }
        out.push_str("      properties:\n");
        for statement in &v.statements {
            let property = statement
                .property
                .as_ref()
                .map(|p| short_form(p))
                .unwrap_or_default();
            out.push_str(&format!("      - property: {}\n", quote(&property)));
            if statement.values.is_empty() {
                continue;
            }
            out.push_str("        values:\n");
            for value in &statement.values {
                render_value(out, value, labels);
            }
        }
    }

    /// The same structure as `render`, as pretty-printed JSON.
    pub fn to_json(&self, labels: Option<&dyn GraphStore>) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct ValueDoc {
            value: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            label: Option<String>,
        }
        #[derive(Serialize)]
        struct StatementDoc {
            property: String,
            values: Vec<ValueDoc>,
        }
        #[derive(Serialize)]
        struct EntityDoc {
            subject: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            label: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            message: Option<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            properties: Vec<StatementDoc>,
        }
        #[derive(Serialize)]
        struct RuleDoc {
            rule: String,
            entities: Vec<EntityDoc>,
        }
        #[derive(Serialize)]
        struct SeverityDoc {
            severity: u8,
            violations: Vec<RuleDoc>,
        }

        let mut doc: Vec<SeverityDoc> = Vec::new();
        for (severity, rules) in &self.buckets {
            let violations: Vec<RuleDoc> = rules
                .iter()
                .filter(|(_, vs)| !vs.is_empty())
                .map(|(rule, vs)| RuleDoc {
                    rule: rule.clone(),
                    entities: vs
                        .iter()
                        .map(|v| EntityDoc {
                            subject: v.subject.as_ref().map(|s| short_form(s)).unwrap_or_default(),
                            label: v
                                .subject
                                .as_ref()
                                .and_then(|s| labels.and_then(|g| g.label(s))),
                            message: (v.description != *rule).then(|| v.description.clone()),
                            properties: v
                                .statements
                                .iter()
                                .map(|st| StatementDoc {
                                    property: st
                                        .property
                                        .as_ref()
                                        .map(|p| short_form(p))
                                        .unwrap_or_default(),
                                    values: st
                                        .values
                                        .iter()
                                        .map(|value| {
                                            let (text, _) = value_text(value);
                                            ValueDoc {
                                                label: value
                                                    .as_iri()
                                                    .and_then(|i| labels.and_then(|g| g.label(i))),
                                                value: text,
                                            }
                                        })
                                        .collect(),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect();
            if !violations.is_empty() {
                doc.push(SeverityDoc { severity: severity.get(), violations });
            }
        }
        serde_json::to_string_pretty(&doc)
    }
}

// ============================================================================
// Rendering helpers
// ============================================================================

/// Single-quote a scalar, doubling embedded quotes per YAML.
fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Shorten a full identifier to `prefix:fragment` using the default prefix
/// table; OBO-style `NS_12345` fragments compact further to `NS:12345`.
pub fn short_form(iri: &Iri) -> String {
    for (prefix, expansion) in vocab::DEFAULT_PREFIXES {
        if let Some(rest) = iri.as_str().strip_prefix(expansion) {
            if *prefix == "obo" {
                if let Some((ns, frag)) = rest.split_once('_') {
                    if !frag.is_empty() && frag.chars().all(|c| c.is_ascii_digit()) {
                        return format!("{ns}:{frag}");
                    }
                }
            }
            return format!("{prefix}:{rest}");
        }
    }
    iri.to_string()
}

/// Text for one value and whether quoting is required: plain strings and
/// language-tagged literals are quoted; typed numeric, boolean and date
/// literals and identifiers are bare.
fn value_text(value: &AnnotationValue) -> (String, bool) {
    match value {
        AnnotationValue::Iri(iri) => (short_form(iri), false),
        AnnotationValue::Literal(lit) => {
            let bare = lit.lang.is_none()
                && lit
                    .datatype
                    .as_ref()
                    .is_some_and(|dt| vocab::UNQUOTED_DATATYPES.contains(&dt.as_str()));
            (lit.lexical.clone(), !bare)
        }
    }
}

fn render_value(out: &mut String, value: &AnnotationValue, labels: Option<&dyn GraphStore>) {
    let (text, quoted) = value_text(value);
    let label = value
        .as_iri()
        .and_then(|iri| labels.and_then(|g| g.label(iri)));
    let rendered = if quoted { quote(&text) } else { text };
    match label {
        Some(label) => {
            out.push_str(&format!("        - value: {rendered}\n"));
            out.push_str(&format!("          label: {}\n", quote(&label)));
        }
        None => out.push_str(&format!("        - {rendered}\n")),
    }
}
