//! Reconciliation layer.
//!
//! Keeps per-target membership and last-known member state so that group-level output
//! can be recomputed whenever membership or member values change, independent of the
//! order in which the two kinds of update arrive.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) mod cache;
pub(crate) mod policy;
pub(crate) mod state;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// A batch panicked while holding this target's lock.
    LockPoisoned { target: String },
    CounterOverflow { group: String, field: String },
    NonCounterValue {
        member: String,
        field: String,
        kind: &'static str,
    },
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileError::LockPoisoned { target } => {
                write!(f, "state for target '{target}' is poisoned")
            }
            ReconcileError::CounterOverflow { group, field } => {
                write!(f, "sum of '{field}' overflows for group '{group}'")
            }
            ReconcileError::NonCounterValue {
                member,
                field,
                kind,
            } => write!(
                f,
                "field '{field}' of member '{member}' is {kind}, expected an unsigned counter"
            ),
        }
    }
}

impl Error for ReconcileError {}
