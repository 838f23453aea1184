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

//! Link-aggregation counters summed from member interface counters.

use crate::native::{
    aggregate_interface, NativeLeaf, AGGREGATE_ID_INPUT, AGGREGATE_MEMBERS_INPUT,
};
use std::sync::Arc;
use telemetry_translator::observability::{events, fields};
use telemetry_translator::{
    GroupAggregate, MemberOp, Notification, Path, PlatformConstraint, ReconciliationCache,
    RegistryError, RuntimeConfig, SumPolicy, Translate, TranslateError, Translator, Update,
    VersionRange,
};
use tracing::debug;

const COMPONENT: &str = "lag_counters";

pub const LAG_COUNTERS_ID: &str = "lag-counters";

/// Interface counters that are aggregated across members.
pub const LAG_COUNTERS: [&str; 12] = [
    "in-broadcast-pkts",
    "in-discards",
    "in-errors",
    "in-multicast-pkts",
    "in-octets",
    "in-unicast-pkts",
    "out-broadcast-pkts",
    "out-discards",
    "out-errors",
    "out-multicast-pkts",
    "out-octets",
    "out-unicast-pkts",
];

/// Sums member counters into per-aggregate counters.
///
/// Membership comes from each member's `aggregate-id` leaf or from the aggregate's
/// own member leaf-list, and may arrive before or after the counters it governs.
pub struct LagCounterTranslator {
    cache: Arc<ReconciliationCache<SumPolicy>>,
    origin: String,
}

impl LagCounterTranslator {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self::with_cache(
            Arc::new(ReconciliationCache::with_eviction(
                SumPolicy::counters(LAG_COUNTERS),
                config.eviction,
            )),
            &config.default_origin,
        )
    }

    /// Shares an existing cache, e.g. between several sessions.
    pub fn with_cache(cache: Arc<ReconciliationCache<SumPolicy>>, origin: &str) -> Self {
        Self {
            cache,
            origin: origin.to_string(),
        }
    }

    pub fn cache(&self) -> &Arc<ReconciliationCache<SumPolicy>> {
        &self.cache
    }

    /// Wraps this translator in a registry descriptor for Arista EOS `[4.34, 4.35)`.
    pub fn into_descriptor(self) -> Result<Translator, RegistryError> {
        let origin = self.origin.clone();
        let mut builder = Translator::builder(LAG_COUNTERS_ID, Arc::new(self));
        for counter in LAG_COUNTERS {
            builder = builder.output(
                format!("{origin}:/interfaces/interface/state/counters/{counter}"),
                [
                    format!("/interfaces/interface/state/counters/{counter}"),
                    AGGREGATE_ID_INPUT.to_string(),
                    AGGREGATE_MEMBERS_INPUT.to_string(),
                ],
            );
        }
        builder
            .applies_to(
                PlatformConstraint::vendor("Arista")
                    .with_software_version_range(VersionRange::new("4.34", "4.35")),
            )
            .build()
    }

    fn parse_ops(notification: &Notification) -> Result<Vec<MemberOp>, TranslateError> {
        let mut ops = Vec::new();

        for (path, value) in notification.absolute_updates() {
            let leaf = NativeLeaf::classify(&path)?;
            if let Some(op) = leaf.membership_update(&path, value)? {
                ops.push(op);
            } else if let NativeLeaf::Counter { member, name } = leaf {
                if LAG_COUNTERS.contains(&name) {
                    ops.push(MemberOp::SetField {
                        member: member.to_string(),
                        field: name.to_string(),
                        value: value.clone(),
                    });
                }
            }
        }

        for path in notification.absolute_deletes() {
            let leaf = NativeLeaf::classify(&path)?;
            if let Some(op) = leaf.membership_delete() {
                ops.push(op);
            } else if let NativeLeaf::Counter { member, name } = leaf {
                ops.push(MemberOp::ClearField {
                    member: member.to_string(),
                    field: name.to_string(),
                });
            }
        }

        Ok(ops)
    }

    fn render(&self, notification: &Notification, aggregates: &[GroupAggregate]) -> Notification {
        let prefix = Path::default()
            .with_origin(self.origin.as_str())
            .with_target(notification.target());
        let mut output = Notification::new(notification.timestamp, prefix);

        for aggregate in aggregates {
            for entry in aggregate.entries.iter().filter(|entry| entry.member.is_none()) {
                output.updates.push(Update::new(
                    aggregate_interface(&aggregate.group, &["state", "counters", entry.field.as_str()]),
                    entry.value.clone(),
                ));
            }
        }
        output
    }
}

impl Translate for LagCounterTranslator {
    fn translate(&self, notification: &Notification) -> Result<Option<Notification>, TranslateError> {
        let ops = Self::parse_ops(notification)?;
        if ops.is_empty() {
            return Ok(None);
        }

        let aggregates = self.cache.apply(notification.target(), &ops)?;
        let output = self.render(notification, &aggregates);
        if output.is_empty() {
            return Ok(None);
        }

        debug!(
            event = events::TRANSLATION_EMITTED,
            component = COMPONENT,
            translator_id = LAG_COUNTERS_ID,
            target = fields::format_target(notification.target()),
            groups = aggregates.len(),
            updates = output.updates.len(),
            "emitted aggregate counters"
        );
        Ok(Some(output))
    }
}
