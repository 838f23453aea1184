//! Structured logging vocabulary shared by the dispatch and reconciliation layers.

pub mod events;
pub mod fields;
