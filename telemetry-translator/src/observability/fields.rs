/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Canonical structured field keys and value-format helpers.

pub const EVENT: &str = "event";
pub const COMPONENT: &str = "component";
pub const TARGET: &str = "target";
pub const GROUP: &str = "group";
pub const MEMBER: &str = "member";
pub const FIELD: &str = "field";
pub const PATH: &str = "path";
pub const TRANSLATOR_ID: &str = "translator_id";
pub const REASON: &str = "reason";
pub const ERR: &str = "err";

pub const NONE: &str = "none";
pub const REASON_EMPTY_MEMBER_KEY: &str = "empty_member_key";
pub const REASON_EMPTY_GROUP_NAME: &str = "empty_group_name";
pub const REASON_UNKNOWN_MEMBER: &str = "unknown_member";

/// Targets are optional on the wire; an absent one is logged as [`NONE`].
pub fn format_target(target: &str) -> &str {
    if target.is_empty() {
        NONE
    } else {
        target
    }
}
