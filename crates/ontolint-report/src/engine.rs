//! Concurrent rule evaluation
//!
//! Each rule is dispatched as its own worker thread against the shared
//! read-only facade; results come back over a channel and are merged only
//! after the fan-in barrier, so aggregation never needs a lock. Workers are
//! detached: with a timeout configured, a rule whose query hangs is reported
//! as timed out and the run continues with partial results instead of
//! blocking forever.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ahash::AHashMap;
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use ontolint_graph::{GraphStore, Iri, QueryRow};

use crate::rules::Rule;
use crate::violation::{Category, Severity, Violation};

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Bound on how long the fan-in waits for rule results. `None` waits
    /// indefinitely.
    pub rule_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleStatus {
    Completed(Vec<Violation>),
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule: Rule,
    pub status: RuleStatus,
}

/// Result of one engine run over a rule set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleRun {
    pub outcomes: Vec<RuleOutcome>,
}

impl RuleRun {
    pub fn total_violations(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match &o.status {
                RuleStatus::Completed(v) => v.len(),
                RuleStatus::TimedOut => 0,
            })
            .sum()
    }

    pub fn violations_at(&self, severity: Severity) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.rule.severity == severity)
            .map(|o| match &o.status {
                RuleStatus::Completed(v) => v.len(),
                RuleStatus::TimedOut => 0,
            })
            .sum()
    }

    /// Nonzero violations mark the rule-query phase as failed.
    pub fn failed(&self) -> bool {
        self.total_violations() != 0
    }

    pub fn timed_out_titles(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.status == RuleStatus::TimedOut)
            .map(|o| o.rule.title.as_str())
            .collect()
    }
}

/// Identifiers from the base vocabularies are not reportable subjects.
fn is_builtin_subject(iri: &Iri) -> bool {
    iri.as_str().contains("/rdf-schema#") || iri.as_str().contains("/owl#")
}

/// Merge query rows into violations, one per bound entity, accumulating
/// property/value statements.
fn rows_to_violations(rule: &Rule, rows: Vec<QueryRow>) -> Vec<Violation> {
    let mut violations: Vec<Violation> = Vec::new();
    let mut index: AHashMap<Option<Iri>, usize> = AHashMap::new();

    for row in rows {
        if let Some(entity) = &row.entity {
            if is_builtin_subject(entity) {
                continue;
            }
        }
        let slot = *index.entry(row.entity.clone()).or_insert_with(|| {
            let mut v = Violation::new(rule.severity, Category::RuleQuery, rule.title.clone());
            v.subject = row.entity.clone();
            violations.push(v);
            violations.len() - 1
        });
        if row.property.is_some() || row.value.is_some() {
            violations[slot].add_statement(row.property, row.value);
        }
    }
    violations
}

/// Evaluate every rule concurrently against the shared facade, join all
/// results, and log per-severity counts. A query failure fails the whole
/// run; a timeout yields partial results.
pub fn execute_rules(
    graph: Arc<dyn GraphStore>,
    rules: Vec<Rule>,
    options: EngineOptions,
) -> anyhow::Result<RuleRun> {
    let (tx, rx) = mpsc::channel();
    for (idx, rule) in rules.iter().enumerate() {
        let tx = tx.clone();
        let graph = Arc::clone(&graph);
        let body = rule.body.clone();
        let title = rule.title.clone();
        thread::Builder::new()
            .name(format!("ontolint-rule-{idx}"))
            .spawn(move || {
                tracing::debug!(rule = %title, "evaluating rule query");
                let result = graph.execute_query(&body);
                // the receiver may have given up on us after a timeout
                let _ = tx.send((idx, result));
            })
            .with_context(|| format!("failed to spawn worker for rule '{}'", rule.title))?;
    }
    drop(tx);

    let deadline = options.rule_timeout.map(|t| Instant::now() + t);
    let mut results: Vec<Option<Vec<QueryRow>>> = vec![None; rules.len()];
    let mut received = 0usize;
    while received < rules.len() {
        let message = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(remaining) {
                    Ok(message) => message,
                    Err(mpsc::RecvTimeoutError::Timeout) => break,
                    Err(mpsc::RecvTimeoutError::Disconnected) => {
                        return Err(anyhow!("a rule worker terminated abnormally"));
                    }
                }
            }
            None => rx
                .recv()
                .map_err(|_| anyhow!("a rule worker terminated abnormally"))?,
        };
        let (idx, result) = message;
        let rows = result.with_context(|| {
            format!("query execution failed for rule '{}'", rules[idx].title)
        })?;
        results[idx] = Some(rows);
        received += 1;
    }

    // fan-in barrier passed: everything below is single-threaded
    let outcomes: Vec<RuleOutcome> = rules
        .into_iter()
        .zip(results)
        .map(|(rule, rows)| {
            let status = match rows {
                Some(rows) => RuleStatus::Completed(rows_to_violations(&rule, rows)),
                None => {
                    tracing::warn!(rule = %rule.title, "rule query timed out; reporting partial results");
                    RuleStatus::TimedOut
                }
            };
            RuleOutcome { rule, status }
        })
        .collect();

    let run = RuleRun { outcomes };
    let total = run.total_violations();
    if total != 0 {
        tracing::error!(total, "rule report failed");
        for severity in Severity::all() {
            tracing::error!(severity = %severity, count = run.violations_at(severity), "violations");
        }
    } else {
        tracing::info!("no rule violations found");
    }
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontolint_graph::{
        Annotation, AnnotationAssertion, AnnotationValue, Axiom, Entity, ImportScope, MemoryGraph,
        QueryError,
    };

    fn rule(title: &str, severity: u8, body: &str) -> Rule {
        Rule {
            title: title.to_string(),
            severity: Severity::new(severity).unwrap(),
            see_also: None,
            body: body.to_string(),
        }
    }

    fn row(entity: &str, property: Option<&str>, value: Option<&str>) -> QueryRow {
        QueryRow {
            entity: Some(Iri::new(entity)),
            property: property.map(Iri::new),
            value: value.map(AnnotationValue::string),
        }
    }

    #[test]
    fn rows_merge_by_entity() {
        let r = rule("dup labels", 2, "q");
        let violations = rows_to_violations(
            &r,
            vec![
                row("ex:A", Some("ex:p"), Some("x")),
                row("ex:A", Some("ex:p"), Some("y")),
                row("ex:B", Some("ex:p"), Some("z")),
            ],
        );
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].statements[0].values.len(), 2);
    }

    #[test]
    fn builtin_subjects_are_skipped() {
        let r = rule("r", 1, "q");
        let violations = rows_to_violations(
            &r,
            vec![
                row("http://www.w3.org/2002/07/owl#Thing", None, None),
                row("http://www.w3.org/2000/01/rdf-schema#comment", None, None),
                row("ex:A", None, None),
            ],
        );
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn run_passes_with_zero_violations() {
        let mut graph = MemoryGraph::new();
        graph.register_query_result("q1", vec![]);
        let run = execute_rules(
            Arc::new(graph),
            vec![rule("clean", 1, "q1")],
            EngineOptions::default(),
        )
        .unwrap();
        assert!(!run.failed());
        assert_eq!(run.total_violations(), 0);
    }

    #[test]
    fn run_fails_with_any_violation() {
        let mut graph = MemoryGraph::new();
        graph.register_query_result("q1", vec![row("ex:A", None, None)]);
        graph.register_query_result("q2", vec![]);
        let run = execute_rules(
            Arc::new(graph),
            vec![rule("dirty", 3, "q1"), rule("clean", 1, "q2")],
            EngineOptions::default(),
        )
        .unwrap();
        assert!(run.failed());
        assert_eq!(run.total_violations(), 1);
        assert_eq!(run.violations_at(Severity::new(3).unwrap()), 1);
        assert_eq!(run.violations_at(Severity::new(1).unwrap()), 0);
    }

    #[test]
    fn query_failure_fails_the_run() {
        let graph = MemoryGraph::new(); // nothing registered: queries error
        let err = execute_rules(
            Arc::new(graph),
            vec![rule("broken", 1, "unregistered")],
            EngineOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    struct HangingGraph {
        inner: MemoryGraph,
    }

    impl GraphStore for HangingGraph {
        fn ontology_iri(&self) -> Option<&Iri> {
            self.inner.ontology_iri()
        }
        fn header_annotations(&self) -> &[Annotation] {
            self.inner.header_annotations()
        }
        fn axioms(&self, scope: ImportScope) -> Vec<&Axiom> {
            self.inner.axioms(scope)
        }
        fn annotation_assertions(
            &self,
            subject: &Iri,
            scope: ImportScope,
        ) -> Vec<&AnnotationAssertion> {
            self.inner.annotation_assertions(subject, scope)
        }
        fn declared_classes(&self, scope: ImportScope) -> Vec<Iri> {
            self.inner.declared_classes(scope)
        }
        fn is_declared(&self, entity: &Entity) -> bool {
            self.inner.is_declared(entity)
        }
        fn execute_query(&self, body: &str) -> Result<Vec<QueryRow>, QueryError> {
            if body == "hang" {
                thread::sleep(Duration::from_secs(30));
            }
            self.inner.execute_query(body)
        }
        fn label(&self, iri: &Iri) -> Option<String> {
            self.inner.label(iri)
        }
    }

    #[test]
    fn hung_rule_times_out_with_partial_results() {
        let mut inner = MemoryGraph::new();
        inner.register_query_result("fast", vec![row("ex:A", None, None)]);
        inner.register_query_result("hang", vec![]);
        let graph = HangingGraph { inner };

        let run = execute_rules(
            Arc::new(graph),
            vec![rule("fast rule", 1, "fast"), rule("slow rule", 2, "hang")],
            EngineOptions {
                rule_timeout: Some(Duration::from_millis(250)),
            },
        )
        .unwrap();

        assert_eq!(run.timed_out_titles(), vec!["slow rule"]);
        assert_eq!(run.total_violations(), 1);
        assert!(run.failed());
    }
}
