//! Whole-graph validation runs
//!
//! A run has three phases: structural checks (synchronous, in registry
//! order), rule queries (concurrent, via the engine), and an optional
//! cycle scan. All three fold into one [`Report`]; the outcome also
//! carries what the report cannot express, namely a detected cycle root
//! and any rules that timed out.

use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;

use ontolint_graph::{GraphStore, ImportScope, Iri};

use crate::checker::CheckerSet;
use crate::cycles;
use crate::engine::{self, EngineOptions, RuleStatus};
use crate::report::Report;
use crate::rules::Rule;
use crate::violation::{Severity, Violation};

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions {
    /// Bound on how long the rule phase waits for each outstanding query.
    pub rule_timeout: Option<Duration>,
    /// Also scan declared classes for definition cycles.
    pub detect_cycles: bool,
}

/// Everything a run produces.
#[derive(Debug)]
pub struct ValidationOutcome {
    pub report: Report,
    /// First class found on a definition cycle, when cycle scanning is on.
    pub cycle_root: Option<Iri>,
    /// Titles of rules whose queries did not finish in time.
    pub timed_out_rules: Vec<String>,
}

impl ValidationOutcome {
    /// A run fails on any violation or any cycle. Timed-out rules alone do
    /// not fail it, they mean "unknown", not "violated".
    pub fn failed(&self) -> bool {
        !self.report.is_empty() || self.cycle_root.is_some()
    }
}

/// Group a checker's violations by severity so each group lands in exactly
/// one report bucket under the checker's name.
fn add_grouped(report: &mut Report, name: &str, violations: Vec<Violation>) {
    let mut by_severity: AHashMap<Severity, Vec<Violation>> = AHashMap::new();
    for v in violations {
        by_severity.entry(v.severity).or_default().push(v);
    }
    for (severity, group) in by_severity {
        report.add_batch(severity, name, group);
    }
}

/// Run structural checks, then the rule engine, then the cycle scan, and
/// aggregate everything into one outcome.
pub fn validate(
    graph: Arc<dyn GraphStore>,
    checkers: &CheckerSet,
    rules: Vec<Rule>,
    options: ValidationOptions,
) -> anyhow::Result<ValidationOutcome> {
    let mut report = Report::new();

    for checker in checkers.iter() {
        add_grouped(&mut report, checker.name(), checker.check(graph.as_ref()));
    }

    let mut timed_out_rules = Vec::new();
    if !rules.is_empty() {
        let run = engine::execute_rules(
            Arc::clone(&graph),
            rules,
            EngineOptions {
                rule_timeout: options.rule_timeout,
            },
        )?;
        for outcome in run.outcomes {
            match outcome.status {
                RuleStatus::Completed(violations) => {
                    report.add_batch(outcome.rule.severity, outcome.rule.title, violations);
                }
                RuleStatus::TimedOut => timed_out_rules.push(outcome.rule.title),
            }
        }
    }

    let cycle_root = if options.detect_cycles {
        let root = cycles::find_cycle(graph.as_ref(), ImportScope::Closure);
        if let Some(root) = &root {
            tracing::error!(class = %root, "definition cycle detected");
        }
        root
    } else {
        None
    };

    let outcome = ValidationOutcome {
        report,
        cycle_root,
        timed_out_rules,
    };
    if outcome.failed() {
        tracing::error!(
            violations = outcome.report.total_violations(),
            "validation failed"
        );
    } else {
        tracing::info!("validation passed");
    }
    Ok(outcome)
}
