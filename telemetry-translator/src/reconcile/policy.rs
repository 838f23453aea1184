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

//! Merge policies applied to impacted groups at batch completion.

use crate::model::typed_value::TypedValue;
use crate::reconcile::state::MemberState;
use crate::reconcile::ReconcileError;
use std::collections::BTreeSet;

/// Read-only view of one impacted group, taken under the target lock.
#[derive(Debug)]
pub struct GroupView<'a> {
    pub name: &'a str,
    /// Snapshot of the current member set, sorted by member name.
    pub members: Vec<(&'a str, &'a MemberState)>,
    pub observed_fields: &'a BTreeSet<String>,
    /// Members that left this group during the batch.
    pub detached: &'a BTreeSet<String>,
    /// Members that had a field cleared during the batch.
    pub reset: &'a BTreeSet<String>,
}

/// One emitted value. `member` is `None` for group-level aggregates.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateEntry {
    pub member: Option<String>,
    pub field: String,
    pub value: TypedValue,
}

/// Recomputed output for one group, in deterministic member/field order.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupAggregate {
    pub group: String,
    pub entries: Vec<AggregateEntry>,
    /// Members whose previously emitted per-member output must be withdrawn.
    pub retracted: Vec<String>,
}

impl GroupAggregate {
    /// Group-level value of `field`, if the policy emitted one.
    pub fn total(&self, field: &str) -> Option<&TypedValue> {
        self.entries
            .iter()
            .find(|entry| entry.member.is_none() && entry.field == field)
            .map(|entry| &entry.value)
    }

    /// Members with at least one emitted entry.
    pub fn emitted_members(&self) -> Vec<&str> {
        let members: BTreeSet<&str> = self
            .entries
            .iter()
            .filter_map(|entry| entry.member.as_deref())
            .collect();
        members.into_iter().collect()
    }
}

/// How member state is merged into group output.
pub trait MergePolicy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Rejects values the policy cannot merge before they reach the cache.
    fn check_value(&self, member: &str, field: &str, value: &TypedValue) -> Result<(), ReconcileError>;

    fn aggregate(&self, view: &GroupView<'_>) -> Result<GroupAggregate, ReconcileError>;
}

/// Additive aggregation of unsigned counters across a group's members.
///
/// Every counter ever observed in the group is emitted, so a counter drops to zero
/// rather than disappearing when its last contributing member leaves.
#[derive(Clone, Debug, Default)]
pub struct SumPolicy {
    counters: Option<BTreeSet<String>>,
}

impl SumPolicy {
    /// Sums every field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sums only the named fields; any other field is carried but not emitted.
    pub fn counters<I, S>(counters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            counters: Some(counters.into_iter().map(Into::into).collect()),
        }
    }

    fn is_counter(&self, field: &str) -> bool {
        self.counters
            .as_ref()
            .map_or(true, |counters| counters.contains(field))
    }
}

impl MergePolicy for SumPolicy {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn check_value(&self, member: &str, field: &str, value: &TypedValue) -> Result<(), ReconcileError> {
        if self.is_counter(field) && value.as_u64().is_none() {
            return Err(ReconcileError::NonCounterValue {
                member: member.to_string(),
                field: field.to_string(),
                kind: value.kind(),
            });
        }
        Ok(())
    }

    fn aggregate(&self, view: &GroupView<'_>) -> Result<GroupAggregate, ReconcileError> {
        let mut entries = Vec::new();

        for field in view.observed_fields.iter().filter(|f| self.is_counter(f)) {
            let mut total: u64 = 0;
            for (member, state) in &view.members {
                let Some(value) = state.get(field) else {
                    continue;
                };
                let counter = value.as_u64().ok_or_else(|| ReconcileError::NonCounterValue {
                    member: member.to_string(),
                    field: field.clone(),
                    kind: value.kind(),
                })?;
                total = total
                    .checked_add(counter)
                    .ok_or_else(|| ReconcileError::CounterOverflow {
                        group: view.name.to_string(),
                        field: field.clone(),
                    })?;
            }
            entries.push(AggregateEntry {
                member: None,
                field: field.clone(),
                value: TypedValue::Uint(total),
            });
        }

        Ok(GroupAggregate {
            group: view.name.to_string(),
            entries,
            retracted: Vec::new(),
        })
    }
}

/// Emits a member's fields only once every required field has been seen since the
/// member's last reset. Partial records are suppressed, never defaulted.
#[derive(Clone, Debug)]
pub struct CompletenessPolicy {
    required: BTreeSet<String>,
}

impl CompletenessPolicy {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    pub fn required(&self) -> &BTreeSet<String> {
        &self.required
    }

    pub fn is_complete(&self, state: &MemberState) -> bool {
        self.required
            .iter()
            .all(|field| state.observed_since_reset(field))
    }
}

impl MergePolicy for CompletenessPolicy {
    fn name(&self) -> &'static str {
        "completeness_gate"
    }

    fn check_value(&self, _member: &str, _field: &str, _value: &TypedValue) -> Result<(), ReconcileError> {
        Ok(())
    }

    fn aggregate(&self, view: &GroupView<'_>) -> Result<GroupAggregate, ReconcileError> {
        let mut entries = Vec::new();
        let mut retracted: BTreeSet<String> = view.detached.clone();

        for (member, state) in &view.members {
            if self.is_complete(state) {
                entries.extend(state.fields().iter().map(|(field, value)| AggregateEntry {
                    member: Some(member.to_string()),
                    field: field.clone(),
                    value: value.clone(),
                }));
            } else if view.reset.contains(*member) {
                retracted.insert(member.to_string());
            }
        }

        Ok(GroupAggregate {
            group: view.name.to_string(),
            entries,
            retracted: retracted.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CompletenessPolicy, GroupView, MergePolicy, SumPolicy};
    use crate::model::typed_value::TypedValue;
    use crate::reconcile::state::MemberState;
    use crate::reconcile::ReconcileError;
    use std::collections::BTreeSet;

    fn member(fields: &[(&str, TypedValue)]) -> MemberState {
        let mut state = MemberState::default();
        for (field, value) in fields {
            state.set(field, value.clone());
        }
        state
    }

    fn observed(fields: &[&str]) -> BTreeSet<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn sum_adds_counters_and_zeroes_observed_fields_without_contributors() {
        let e1 = member(&[("tx", TypedValue::Uint(100))]);
        let e2 = member(&[("tx", TypedValue::Uint(50)), ("rx", TypedValue::Uint(7))]);
        let fields = observed(&["rx", "tx", "drops"]);
        let empty = BTreeSet::new();
        let view = GroupView {
            name: "PC1",
            members: vec![("Ethernet1", &e1), ("Ethernet2", &e2)],
            observed_fields: &fields,
            detached: &empty,
            reset: &empty,
        };

        let aggregate = SumPolicy::new().aggregate(&view).unwrap();

        assert_eq!(aggregate.total("tx"), Some(&TypedValue::Uint(150)));
        assert_eq!(aggregate.total("rx"), Some(&TypedValue::Uint(7)));
        assert_eq!(aggregate.total("drops"), Some(&TypedValue::Uint(0)));
        let order: Vec<&str> = aggregate.entries.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(order, vec!["drops", "rx", "tx"]);
    }

    #[test]
    fn sum_reports_overflow_instead_of_wrapping() {
        let e1 = member(&[("tx", TypedValue::Uint(u64::MAX))]);
        let e2 = member(&[("tx", TypedValue::Uint(1))]);
        let fields = observed(&["tx"]);
        let empty = BTreeSet::new();
        let view = GroupView {
            name: "PC1",
            members: vec![("Ethernet1", &e1), ("Ethernet2", &e2)],
            observed_fields: &fields,
            detached: &empty,
            reset: &empty,
        };

        assert!(matches!(
            SumPolicy::new().aggregate(&view),
            Err(ReconcileError::CounterOverflow { .. })
        ));
    }

    #[test]
    fn sum_rejects_non_counter_values_for_counted_fields() {
        let policy = SumPolicy::counters(["tx"]);
        assert!(policy
            .check_value("Ethernet1", "tx", &TypedValue::from("100"))
            .is_err());
        assert!(policy
            .check_value("Ethernet1", "description", &TypedValue::from("uplink"))
            .is_ok());
    }

    #[test]
    fn completeness_suppresses_partial_members() {
        let policy = CompletenessPolicy::new(["collecting", "distributing"]);
        let complete = member(&[
            ("collecting", TypedValue::Bool(true)),
            ("distributing", TypedValue::Bool(false)),
        ]);
        let partial = member(&[("collecting", TypedValue::Bool(true))]);
        let fields = observed(&["collecting", "distributing"]);
        let empty = BTreeSet::new();
        let view = GroupView {
            name: "PC1",
            members: vec![("Ethernet1", &complete), ("Ethernet2", &partial)],
            observed_fields: &fields,
            detached: &empty,
            reset: &empty,
        };

        let aggregate = policy.aggregate(&view).unwrap();

        assert_eq!(aggregate.emitted_members(), vec!["Ethernet1"]);
        assert_eq!(aggregate.entries.len(), 2);
        assert!(aggregate.retracted.is_empty());
    }

    #[test]
    fn completeness_retracts_detached_and_reset_members() {
        let policy = CompletenessPolicy::new(["collecting", "distributing"]);
        let partial = member(&[("collecting", TypedValue::Bool(true))]);
        let fields = observed(&["collecting", "distributing"]);
        let detached = observed(&["Ethernet9"]);
        let reset = observed(&["Ethernet2"]);
        let view = GroupView {
            name: "PC1",
            members: vec![("Ethernet2", &partial)],
            observed_fields: &fields,
            detached: &detached,
            reset: &reset,
        };

        let aggregate = policy.aggregate(&view).unwrap();

        assert!(aggregate.entries.is_empty());
        assert_eq!(aggregate.retracted, vec!["Ethernet2", "Ethernet9"]);
    }

    #[test]
    fn completeness_requires_every_field_again_after_a_reset() {
        let policy = CompletenessPolicy::new(["collecting", "distributing"]);
        let mut state = member(&[
            ("collecting", TypedValue::Bool(true)),
            ("distributing", TypedValue::Bool(true)),
        ]);
        assert!(policy.is_complete(&state));

        state.clear("collecting");
        state.set("collecting", TypedValue::Bool(true));
        assert!(!policy.is_complete(&state));

        state.set("distributing", TypedValue::Bool(true));
        assert!(policy.is_complete(&state));
    }
}
