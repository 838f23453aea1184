//! Canonical structured event names used across `telemetry-translator`.

// Registry and dispatch events.
pub const TRANSLATOR_REGISTERED: &str = "translator_registered";
pub const SESSION_CREATED: &str = "session_created";
pub const TRANSLATE_FAILED: &str = "translate_failed";
pub const TRANSLATION_EMITTED: &str = "translation_emitted";

// Reconciliation cache events.
pub const TARGET_STATE_CREATED: &str = "target_state_created";
pub const TARGET_STATE_RESET: &str = "target_state_reset";
pub const MEMBER_ASSIGNED: &str = "member_assigned";
pub const MEMBER_DETACHED: &str = "member_detached";
pub const MEMBER_REMOVED: &str = "member_removed";
pub const MEMBER_REMOVE_UNKNOWN: &str = "member_remove_unknown";
pub const MEMBER_UNASSIGNED: &str = "member_unassigned";
pub const HELD_STATE_PROMOTED: &str = "held_state_promoted";
pub const GROUP_RECOMPUTED: &str = "group_recomputed";
pub const GROUP_EVICTED: &str = "group_evicted";
pub const UPDATE_DROPPED: &str = "update_dropped";

// Decode events.
pub const DECODE_FAILED: &str = "decode_failed";
