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

//! Per-target nested state: groups, their members, and the holding area.
//!
//! Invariant: a member lives in at most one of {one group, the holding area}, and
//! `owner` maps exactly the members that live in a group to that group.

use crate::model::typed_value::TypedValue;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Last known sub-keyed values of one member.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemberState {
    fields: BTreeMap<String, TypedValue>,
    /// Fields written since the member was last reset by a field delete.
    observed: BTreeSet<String>,
}

impl MemberState {
    pub fn get(&self, field: &str) -> Option<&TypedValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// `true` when `field` has been written since the last reset.
    pub fn observed_since_reset(&self, field: &str) -> bool {
        self.observed.contains(field)
    }

    pub fn fields(&self) -> &BTreeMap<String, TypedValue> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn set(&mut self, field: &str, value: TypedValue) {
        self.observed.insert(field.to_string());
        self.fields.insert(field.to_string(), value);
    }

    /// Removes `field` and resets the member: every field counts as unobserved until
    /// written again. Returns `true` if the field was present.
    pub(crate) fn clear(&mut self, field: &str) -> bool {
        self.observed.clear();
        self.fields.remove(field).is_some()
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct GroupState {
    pub(crate) members: BTreeMap<String, MemberState>,
    /// Every field name any member has contributed since the group was created.
    pub(crate) observed_fields: BTreeSet<String>,
}

impl GroupState {
    fn attach(&mut self, member: &str, state: MemberState) {
        self.observed_fields
            .extend(state.fields().keys().cloned());
        self.members.insert(member.to_string(), state);
    }
}

/// What happened to a member's placement.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Placement {
    Unchanged,
    Moved {
        from: Option<String>,
        to: Option<String>,
        promoted_from_holding: bool,
    },
}

/// What a membership removal found.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Removal {
    DiscardedHeld,
    Detached { group: String },
    Unknown,
}

/// Where a field write or clear landed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FieldTarget {
    Group(String),
    Holding,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct TargetState {
    groups: BTreeMap<String, GroupState>,
    holding: BTreeMap<String, MemberState>,
    owner: HashMap<String, String>,
}

impl TargetState {
    /// Moves `member` into `group`.
    ///
    /// State detached from a previous group is discarded. The member starts under
    /// `group` with whatever the holding area kept for it, or with empty state. An empty
    /// `group` only detaches the member.
    pub(crate) fn assign(&mut self, member: &str, group: &str) -> Placement {
        let previous = self.owner.get(member).cloned();
        if previous.as_deref() == Some(group) {
            return Placement::Unchanged;
        }

        if let Some(old_group) = &previous {
            self.owner.remove(member);
            if let Some(state) = self.groups.get_mut(old_group) {
                state.members.remove(member);
            }
        }

        if group.is_empty() {
            if previous.is_none() {
                return Placement::Unchanged;
            }
            return Placement::Moved {
                from: previous,
                to: None,
                promoted_from_holding: false,
            };
        }

        let (state, promoted_from_holding) = match self.holding.remove(member) {
            Some(state) => (state, true),
            None => (MemberState::default(), false),
        };

        self.groups
            .entry(group.to_string())
            .or_default()
            .attach(member, state);
        self.owner.insert(member.to_string(), group.to_string());

        Placement::Moved {
            from: previous,
            to: Some(group.to_string()),
            promoted_from_holding,
        }
    }

    /// Forgets `member` wherever it lives.
    pub(crate) fn remove(&mut self, member: &str) -> Removal {
        if self.holding.remove(member).is_some() {
            return Removal::DiscardedHeld;
        }
        match self.owner.remove(member) {
            Some(group) => {
                if let Some(state) = self.groups.get_mut(&group) {
                    state.members.remove(member);
                }
                Removal::Detached { group }
            }
            None => Removal::Unknown,
        }
    }

    pub(crate) fn set_field(&mut self, member: &str, field: &str, value: TypedValue) -> FieldTarget {
        match self.owner.get(member) {
            Some(group) => {
                let group_state = self.groups.entry(group.clone()).or_default();
                group_state.observed_fields.insert(field.to_string());
                group_state
                    .members
                    .entry(member.to_string())
                    .or_default()
                    .set(field, value);
                FieldTarget::Group(group.clone())
            }
            None => {
                self.holding
                    .entry(member.to_string())
                    .or_default()
                    .set(field, value);
                FieldTarget::Holding
            }
        }
    }

    /// Clears one field. Returns where the member lives if the field was present.
    pub(crate) fn clear_field(&mut self, member: &str, field: &str) -> Option<FieldTarget> {
        match self.owner.get(member) {
            Some(group) => {
                let state = self.groups.get_mut(group)?.members.get_mut(member)?;
                state
                    .clear(field)
                    .then(|| FieldTarget::Group(group.clone()))
            }
            None => {
                let state = self.holding.get_mut(member)?;
                state.clear(field).then_some(FieldTarget::Holding)
            }
        }
    }

    pub(crate) fn group(&self, group: &str) -> Option<&GroupState> {
        self.groups.get(group)
    }

    pub(crate) fn group_of(&self, member: &str) -> Option<&str> {
        self.owner.get(member).map(String::as_str)
    }

    pub(crate) fn members(&self, group: &str) -> Vec<String> {
        self.groups
            .get(group)
            .map(|state| state.members.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn held(&self, member: &str) -> Option<&MemberState> {
        self.holding.get(member)
    }

    pub(crate) fn held_members(&self) -> Vec<String> {
        self.holding.keys().cloned().collect()
    }

    pub(crate) fn group_names(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    /// Drops `group` if it has no members left. Returns `true` when dropped.
    pub(crate) fn evict_if_empty(&mut self, group: &str) -> bool {
        let empty = self
            .groups
            .get(group)
            .map_or(false, |state| state.members.is_empty());
        if empty {
            self.groups.remove(group);
        }
        empty
    }
}
