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

use telemetry_translator::{Notification, Path, PathElem, TypedValue, Update};

pub const NATIVE_TIMESTAMP: i64 = 1_700_000_000_000_000_000;

/// `/interfaces/interface[name=<interface>]/<leaf...>`
pub fn interface_path(interface: &str, leaf: &[&str]) -> Path {
    let mut elem = vec![
        PathElem::new("interfaces"),
        PathElem::new("interface").with_key("name", interface),
    ];
    elem.extend(leaf.iter().copied().map(PathElem::new));
    Path::new(elem)
}

/// Fluent builder for native notifications addressed to one target.
#[derive(Debug)]
pub struct NotificationBuilder {
    notification: Notification,
}

impl NotificationBuilder {
    pub fn new(target: &str) -> Self {
        Self {
            notification: Notification::new(NATIVE_TIMESTAMP, Path::default().with_target(target)),
        }
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.notification.timestamp = timestamp;
        self
    }

    pub fn update(mut self, path: Path, value: impl Into<TypedValue>) -> Self {
        self.notification.updates.push(Update::new(path, value));
        self
    }

    /// Adds an update from a textual path. Panics on a malformed path.
    pub fn update_str(self, path: &str, value: impl Into<TypedValue>) -> Self {
        let path: Path = path
            .parse()
            .unwrap_or_else(|err| panic!("test path '{path}' should parse: {err}"));
        self.update(path, value)
    }

    pub fn delete(mut self, path: Path) -> Self {
        self.notification.deletes.push(path);
        self
    }

    pub fn build(self) -> Notification {
        self.notification
    }
}

/// Membership of `member` in aggregate `group`; an empty group unassigns.
pub fn aggregate_id(target: &str, member: &str, group: &str) -> Notification {
    NotificationBuilder::new(target)
        .update(
            interface_path(member, &["ethernet", "state", "aggregate-id"]),
            group,
        )
        .build()
}

/// Aggregate-side member list of `group`.
pub fn aggregate_members(target: &str, group: &str, members: &[&str]) -> Notification {
    let members = members
        .iter()
        .map(|member| TypedValue::from(*member))
        .collect();
    NotificationBuilder::new(target)
        .update(
            interface_path(group, &["aggregation", "state", "member"]),
            TypedValue::LeafList(members),
        )
        .build()
}

pub fn counter(target: &str, member: &str, name: &str, value: u64) -> Notification {
    NotificationBuilder::new(target)
        .update(interface_path(member, &["state", "counters", name]), value)
        .build()
}

pub fn lacp_field(target: &str, member: &str, field: &str, value: impl Into<TypedValue>) -> Notification {
    NotificationBuilder::new(target)
        .update(interface_path(member, &["lacp", "state", field]), value)
        .build()
}

/// Deletion of the member interface's membership leaf.
pub fn member_delete(target: &str, member: &str) -> Notification {
    NotificationBuilder::new(target)
        .delete(interface_path(
            member,
            &["ethernet", "state", "aggregate-id"],
        ))
        .build()
}
