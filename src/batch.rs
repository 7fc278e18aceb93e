//! Batch command execution
//!
//! Runs one operation per target, strictly in order, and folds the per-item
//! results into a single terminal outcome. A failing target never stops the
//! loop.

use crate::error::{ApiError, Result};
use std::future::Future;

/// One failed target and why
#[derive(Debug)]
pub struct ItemFailure {
    pub target: String,
    pub error: ApiError,
}

/// Per-target results of a batch
#[derive(Debug, Default)]
pub struct BatchOutcome {
    total: usize,
    failures: Vec<ItemFailure>,
}

impl BatchOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, target: &str, result: Result<()>) {
        self.total += 1;
        if let Err(error) = result {
            self.failures.push(ItemFailure {
                target: target.to_string(),
                error,
            });
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[ItemFailure] {
        &self.failures
    }

    /// Terminal result: `"<k> of <n> <noun> failed to <verb>."` when any item failed
    pub fn into_result(self, noun: &str, verb: &str) -> Result<()> {
        if self.failures.is_empty() {
            return Ok(());
        }
        Err(ApiError::command(format!(
            "{} of {} {} failed to {}.",
            self.failures.len(),
            self.total,
            noun,
            verb
        )))
    }
}

/// Apply `op` to every target in order, logging and counting failures.
///
/// `action` names the operation in log lines, e.g. "delete snapshot".
pub async fn run_batch<F, Fut>(action: &str, targets: &[String], mut op: F) -> BatchOutcome
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut outcome = BatchOutcome::new();

    for target in targets {
        let result = op(target.clone()).await;
        if let Err(e) = &result {
            tracing::error!(
                "Failed to {} with name or ID '{}': {}",
                action,
                target,
                e
            );
        }
        outcome.record(target, result);
    }

    outcome
}

/// Independent sub-operations applied to one target, as in `set`
#[derive(Debug, Default)]
pub struct CompoundOutcome {
    failures: usize,
}

impl CompoundOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sub-operation; `what` describes it for the log
    pub fn record<T>(&mut self, what: &str, result: Result<T>) {
        if let Err(e) = result {
            self.failures += 1;
            tracing::error!("Failed to {}: {}", what, e);
        }
    }

    pub fn failed(&self) -> usize {
        self.failures
    }

    pub fn into_result(self) -> Result<()> {
        if self.failures > 0 {
            return Err(ApiError::command("One or more of the set operations failed"));
        }
        Ok(())
    }
}
