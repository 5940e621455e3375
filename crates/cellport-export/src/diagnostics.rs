//! Diagnostic sink
//!
//! The assembler reports recoverable conditions (skipped tasks, optional
//! metadata an environment cannot provide) to a sink supplied by the caller
//! instead of writing to process-wide logger state.

use std::cell::RefCell;
use std::fmt;
use tracing::{debug, info};

/// A recoverable condition observed during an export pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No processor is registered for the task
    TaskSkipped { task: String },
    /// A processor handled the task
    TaskProcessed { task: String, rows: usize },
    /// An optional metadata block could not be read
    FeatureUnsupported { feature: String, reason: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::TaskSkipped { task } => write!(f, "no processor for task {}", task),
            Diagnostic::TaskProcessed { task, rows } => {
                write!(f, "processed task {} ({} rows)", task, rows)
            }
            Diagnostic::FeatureUnsupported { feature, reason } => {
                write!(f, "skipping {}: {}", feature, reason)
            }
        }
    }
}

pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::FeatureUnsupported { .. } => info!("{}", diagnostic),
            Diagnostic::TaskSkipped { .. } | Diagnostic::TaskProcessed { .. } => {
                debug!("{}", diagnostic);
            }
        }
    }
}

/// Keeps diagnostics in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        self.entries.take()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }
}
