//! Wire-compatible data model: paths, typed values and notifications.
//!
//! Mirrors the OpenConfig gNMI notification schema so captures round-trip through
//! the runtime without loss.

pub(crate) mod notification;
pub(crate) mod path;
pub(crate) mod typed_value;
