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

//! Concurrency-safe reconciliation cache.
//!
//! Locking discipline: the target table is an [`ArcSwap`] snapshot, so lookups take no
//! lock and new targets are published with `rcu`. Each target owns one [`Mutex`] that
//! is held for a whole batch: every membership change, field write and the per-group
//! snapshot taken at batch completion happen under that single lock. A batch that
//! locks a target entry already replaced by a reset retries against the live entry.

use crate::model::typed_value::TypedValue;
use crate::observability::{events, fields};
use crate::reconcile::policy::{GroupAggregate, GroupView, MergePolicy};
use crate::reconcile::state::{FieldTarget, MemberState, Placement, Removal, TargetState};
use crate::reconcile::ReconcileError;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

const COMPONENT: &str = "reconciliation_cache";

type TargetTable = HashMap<String, Arc<Mutex<TargetState>>>;

/// What happens to a group once its last member leaves.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Keep emptied groups so membership flaps do not churn state.
    #[default]
    Retain,
    /// Drop a group after the batch in which it became empty.
    DropEmptyGroups,
}

/// One cache mutation, as parsed out of a notification by a translator.
#[derive(Clone, Debug, PartialEq)]
pub enum MemberOp {
    /// Assign `member` to `group`; an empty `group` detaches it and drops its state.
    Assign { member: String, group: String },
    /// Replace the full member list of `group`.
    ReplaceMembers { group: String, members: Vec<String> },
    /// Forget `member` and its state.
    Remove { member: String },
    SetField {
        member: String,
        field: String,
        value: TypedValue,
    },
    ClearField { member: String, field: String },
}

#[derive(Debug, Default)]
struct BatchImpact {
    impacted: BTreeSet<String>,
    detached: BTreeMap<String, BTreeSet<String>>,
    reset: BTreeMap<String, BTreeSet<String>>,
}

impl BatchImpact {
    fn detach(&mut self, group: &str, member: &str) {
        self.impacted.insert(group.to_string());
        self.detached
            .entry(group.to_string())
            .or_default()
            .insert(member.to_string());
    }

    fn attach(&mut self, group: &str, member: &str) {
        self.impacted.insert(group.to_string());
        if let Some(detached) = self.detached.get_mut(group) {
            detached.remove(member);
        }
    }
}

/// Mutations applied to one target while its lock is held.
pub struct ReconcileBatch<'a, P: MergePolicy> {
    target: &'a str,
    policy: &'a P,
    state: &'a mut TargetState,
    impact: BatchImpact,
}

impl<'a, P: MergePolicy> ReconcileBatch<'a, P> {
    fn dropped(&self, member: &str, reason: &str) -> bool {
        if member.is_empty() {
            warn!(
                event = events::UPDATE_DROPPED,
                component = COMPONENT,
                target = fields::format_target(self.target),
                reason,
                "dropping cache update without member identity"
            );
            return true;
        }
        false
    }

    /// Assigns `member` to `group`, starting it from held or empty state. An empty
    /// `group` detaches the member and drops its state.
    pub fn assign(&mut self, member: &str, group: &str) {
        if self.dropped(member, fields::REASON_EMPTY_MEMBER_KEY) {
            return;
        }

        match self.state.assign(member, group) {
            Placement::Unchanged => {}
            Placement::Moved {
                from,
                to,
                promoted_from_holding,
            } => {
                if let Some(from) = &from {
                    self.impact.detach(from, member);
                    debug!(
                        event = events::MEMBER_DETACHED,
                        component = COMPONENT,
                        target = fields::format_target(self.target),
                        group = %from,
                        member,
                        "detached member from group"
                    );
                }
                match &to {
                    Some(to) => {
                        self.impact.attach(to, member);
                        let event = if promoted_from_holding {
                            events::HELD_STATE_PROMOTED
                        } else {
                            events::MEMBER_ASSIGNED
                        };
                        debug!(
                            event,
                            component = COMPONENT,
                            target = fields::format_target(self.target),
                            group = %to,
                            member,
                            "assigned member to group"
                        );
                    }
                    None => debug!(
                        event = events::MEMBER_UNASSIGNED,
                        component = COMPONENT,
                        target = fields::format_target(self.target),
                        member,
                        "member unassigned, state dropped"
                    ),
                }
            }
        }
    }

    /// Makes `members` the exact member set of `group`. Members no longer listed are
    /// unassigned and lose their state; listed members are assigned.
    pub fn replace_members(&mut self, group: &str, members: &[String]) {
        if group.is_empty() {
            warn!(
                event = events::UPDATE_DROPPED,
                component = COMPONENT,
                target = fields::format_target(self.target),
                reason = fields::REASON_EMPTY_GROUP_NAME,
                "dropping member list without group identity"
            );
            return;
        }

        let wanted: BTreeSet<&str> = members.iter().map(String::as_str).collect();
        for current in self.state.members(group) {
            if !wanted.contains(current.as_str()) {
                self.assign(&current, "");
            }
        }
        for member in wanted {
            self.assign(member, group);
        }
    }

    /// Forgets `member` and its state. Unknown members are ignored.
    pub fn remove(&mut self, member: &str) {
        match self.state.remove(member) {
            Removal::DiscardedHeld => debug!(
                event = events::MEMBER_REMOVED,
                component = COMPONENT,
                target = fields::format_target(self.target),
                member,
                "discarded held member state"
            ),
            Removal::Detached { group } => {
                self.impact.detach(&group, member);
                debug!(
                    event = events::MEMBER_REMOVED,
                    component = COMPONENT,
                    target = fields::format_target(self.target),
                    group = %group,
                    member,
                    "removed member from group"
                );
            }
            Removal::Unknown => debug!(
                event = events::MEMBER_REMOVE_UNKNOWN,
                component = COMPONENT,
                target = fields::format_target(self.target),
                member,
                reason = fields::REASON_UNKNOWN_MEMBER,
                "remove for unknown member ignored"
            ),
        }
    }

    /// Records the latest value of one member field.
    pub fn set_field(
        &mut self,
        member: &str,
        field: &str,
        value: TypedValue,
    ) -> Result<(), ReconcileError> {
        if self.dropped(member, fields::REASON_EMPTY_MEMBER_KEY) {
            return Ok(());
        }
        self.policy.check_value(member, field, &value)?;

        if let FieldTarget::Group(group) = self.state.set_field(member, field, value) {
            self.impact.impacted.insert(group);
        }
        Ok(())
    }

    /// Clears one member field, resetting the member's completeness.
    pub fn clear_field(&mut self, member: &str, field: &str) {
        if let Some(FieldTarget::Group(group)) = self.state.clear_field(member, field) {
            self.impact.impacted.insert(group.clone());
            self.impact
                .reset
                .entry(group)
                .or_default()
                .insert(member.to_string());
        }
    }

    pub fn apply(&mut self, op: &MemberOp) -> Result<(), ReconcileError> {
        match op {
            MemberOp::Assign { member, group } => self.assign(member, group),
            MemberOp::ReplaceMembers { group, members } => self.replace_members(group, members),
            MemberOp::Remove { member } => self.remove(member),
            MemberOp::SetField {
                member,
                field,
                value,
            } => self.set_field(member, field, value.clone())?,
            MemberOp::ClearField { member, field } => self.clear_field(member, field),
        }
        Ok(())
    }

    pub fn group_of(&self, member: &str) -> Option<&str> {
        self.state.group_of(member)
    }

    pub fn members(&self, group: &str) -> Vec<String> {
        self.state.members(group)
    }

    /// Recomputes every impacted group in name order.
    fn finish(self, eviction: EvictionPolicy) -> Result<Vec<GroupAggregate>, ReconcileError> {
        let ReconcileBatch {
            target,
            policy,
            state,
            impact,
        } = self;
        let empty = BTreeSet::new();
        let mut aggregates = Vec::with_capacity(impact.impacted.len());

        for group in &impact.impacted {
            let Some(group_state) = state.group(group) else {
                continue;
            };
            let view = GroupView {
                name: group,
                members: group_state
                    .members
                    .iter()
                    .map(|(member, member_state)| (member.as_str(), member_state))
                    .collect(),
                observed_fields: &group_state.observed_fields,
                detached: impact.detached.get(group).unwrap_or(&empty),
                reset: impact.reset.get(group).unwrap_or(&empty),
            };
            let aggregate = policy.aggregate(&view)?;
            debug!(
                event = events::GROUP_RECOMPUTED,
                component = COMPONENT,
                target = fields::format_target(target),
                group = %group,
                policy = policy.name(),
                members = view.members.len(),
                entries = aggregate.entries.len(),
                retracted = aggregate.retracted.len(),
                "recomputed group aggregate"
            );
            aggregates.push(aggregate);
        }

        if eviction == EvictionPolicy::DropEmptyGroups {
            for group in &impact.impacted {
                if state.evict_if_empty(group) {
                    debug!(
                        event = events::GROUP_EVICTED,
                        component = COMPONENT,
                        target = fields::format_target(target),
                        group = %group,
                        "evicted empty group"
                    );
                }
            }
        }

        Ok(aggregates)
    }
}

/// Explicitly owned reconciliation state for every target, shared by handle with the
/// translators that need it.
///
/// ```
/// use telemetry_translator::{MemberOp, ReconciliationCache, SumPolicy, TypedValue};
///
/// let cache = ReconciliationCache::new(SumPolicy::new());
/// let aggregates = cache
///     .apply(
///         "dut1",
///         &[
///             MemberOp::Assign { member: "Ethernet1".into(), group: "PC1".into() },
///             MemberOp::SetField {
///                 member: "Ethernet1".into(),
///                 field: "tx".into(),
///                 value: TypedValue::Uint(100),
///             },
///         ],
///     )
///     .unwrap();
/// assert_eq!(aggregates[0].total("tx"), Some(&TypedValue::Uint(100)));
/// ```
pub struct ReconciliationCache<P: MergePolicy> {
    policy: P,
    eviction: EvictionPolicy,
    targets: ArcSwap<TargetTable>,
}

impl<P: MergePolicy> ReconciliationCache<P> {
    pub fn new(policy: P) -> Self {
        Self::with_eviction(policy, EvictionPolicy::default())
    }

    pub fn with_eviction(policy: P, eviction: EvictionPolicy) -> Self {
        Self {
            policy,
            eviction,
            targets: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn eviction(&self) -> EvictionPolicy {
        self.eviction
    }

    fn target_entry(&self, target: &str) -> Arc<Mutex<TargetState>> {
        loop {
            if let Some(entry) = self.targets.load().get(target) {
                return entry.clone();
            }
            self.targets.rcu(|current| {
                let mut next = TargetTable::clone(current);
                next.entry(target.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(TargetState::default())));
                next
            });
            debug!(
                event = events::TARGET_STATE_CREATED,
                component = COMPONENT,
                target = fields::format_target(target),
                "created target state"
            );
        }
    }

    /// Locks the live entry for `target`. An entry removed by a reset while this call
    /// waited for its lock is abandoned and the lookup repeats.
    fn lock_target<R>(
        &self,
        target: &str,
        locked: impl FnOnce(&mut TargetState) -> R,
    ) -> Result<R, ReconcileError> {
        let entry = self.target_entry(target);
        let mut guard = entry.lock().map_err(|_| ReconcileError::LockPoisoned {
            target: target.to_string(),
        })?;
        let live = self
            .targets
            .load()
            .get(target)
            .map_or(false, |current| Arc::ptr_eq(current, &entry));
        if !live {
            drop(guard);
            return self.lock_target(target, locked);
        }
        Ok(locked(&mut guard))
    }

    /// Runs `mutate` against one target under its lock, then recomputes every group the
    /// batch impacted. The lock is held from the first mutation through the last
    /// aggregate snapshot.
    pub fn reconcile<F, E>(&self, target: &str, mutate: F) -> Result<Vec<GroupAggregate>, E>
    where
        F: FnOnce(&mut ReconcileBatch<'_, P>) -> Result<(), E>,
        E: From<ReconcileError>,
    {
        self.lock_target(target, |state| {
            let mut batch = ReconcileBatch {
                target,
                policy: &self.policy,
                state,
                impact: BatchImpact::default(),
            };
            mutate(&mut batch)?;
            Ok(batch.finish(self.eviction)?)
        })?
    }

    /// Applies parsed operations to one target as a single batch.
    ///
    /// Every field value is checked against the policy before the first mutation, so a
    /// rejected value leaves the target untouched.
    pub fn apply(&self, target: &str, ops: &[MemberOp]) -> Result<Vec<GroupAggregate>, ReconcileError> {
        for op in ops {
            if let MemberOp::SetField {
                member,
                field,
                value,
            } = op
            {
                self.policy.check_value(member, field, value)?;
            }
        }
        self.reconcile(target, |batch| {
            ops.iter().try_for_each(|op| batch.apply(op))
        })
    }

    /// Clears all targets. A batch in flight completes against the state it locked and
    /// is discarded with it.
    pub fn reset(&self) {
        self.targets.store(Arc::new(HashMap::new()));
        debug!(
            event = events::TARGET_STATE_RESET,
            component = COMPONENT,
            target = fields::NONE,
            "reset all target state"
        );
    }

    /// Clears one target.
    pub fn reset_target(&self, target: &str) {
        self.targets.rcu(|current| {
            let mut next = TargetTable::clone(current);
            next.remove(target);
            next
        });
        debug!(
            event = events::TARGET_STATE_RESET,
            component = COMPONENT,
            target = fields::format_target(target),
            "reset target state"
        );
    }

    pub fn target_count(&self) -> usize {
        self.targets.load().len()
    }

    fn inspect<R>(
        &self,
        target: &str,
        read: impl FnOnce(&TargetState) -> R,
    ) -> Result<Option<R>, ReconcileError> {
        let Some(entry) = self.targets.load().get(target).cloned() else {
            return Ok(None);
        };
        let guard = entry.lock().map_err(|_| ReconcileError::LockPoisoned {
            target: target.to_string(),
        })?;
        Ok(Some(read(&guard)))
    }

    /// Current members of `group`, sorted.
    pub fn group_members(&self, target: &str, group: &str) -> Result<Vec<String>, ReconcileError> {
        Ok(self
            .inspect(target, |state| state.members(group))?
            .unwrap_or_default())
    }

    /// Known group names, including emptied groups that are retained.
    pub fn groups(&self, target: &str) -> Result<Vec<String>, ReconcileError> {
        Ok(self
            .inspect(target, TargetState::group_names)?
            .unwrap_or_default())
    }

    /// Members whose group is not yet known, sorted.
    pub fn held_members(&self, target: &str) -> Result<Vec<String>, ReconcileError> {
        Ok(self
            .inspect(target, TargetState::held_members)?
            .unwrap_or_default())
    }

    /// Copy of a held member's state.
    pub fn held_state(&self, target: &str, member: &str) -> Result<Option<MemberState>, ReconcileError> {
        Ok(self
            .inspect(target, |state| state.held(member).cloned())?
            .flatten())
    }
}
