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

use crate::native::{NativeLeaf, AGGREGATE_ID_INPUT, AGGREGATE_MEMBERS_INPUT};
use std::sync::Arc;
use telemetry_translator::observability::{events, fields};
use telemetry_translator::{
    CompletenessPolicy, GroupAggregate, MemberOp, Notification, Path, PathElem,
    PlatformConstraint, ReconciliationCache, RegistryError, RuntimeConfig, Translate,
    TranslateError, Translator, Update,
};
use tracing::debug;

const COMPONENT: &str = "lacp_member_state";

pub const LACP_MEMBER_STATE_ID: &str = "lacp-member-state";

/// Fields that must all be present before a member record is published.
pub const LACP_REQUIRED_FIELDS: [&str; 3] = ["synchronization", "collecting", "distributing"];
pub const LACP_OPTIONAL_FIELDS: [&str; 1] = ["oper-key"];

fn is_lacp_field(field: &str) -> bool {
    LACP_REQUIRED_FIELDS.contains(&field) || LACP_OPTIONAL_FIELDS.contains(&field)
}

/// `/lacp/interfaces/interface[name=<group>]/members/member[interface=<member>]`
fn member_subtree(group: &str, member: &str) -> Path {
    Path::new(vec![
        PathElem::new("lacp"),
        PathElem::new("interfaces"),
        PathElem::new("interface").with_key("name", group),
        PathElem::new("members"),
        PathElem::new("member").with_key("interface", member),
    ])
}

/// Publishes per-member LACP state under its aggregate once the member record is
/// complete, and withdraws it when the member leaves or loses a required field.
pub struct LacpMemberTranslator {
    cache: Arc<ReconciliationCache<CompletenessPolicy>>,
    origin: String,
}

impl LacpMemberTranslator {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            cache: Arc::new(ReconciliationCache::with_eviction(
                CompletenessPolicy::new(LACP_REQUIRED_FIELDS),
                config.eviction,
            )),
            origin: config.default_origin.clone(),
        }
    }

    pub fn cache(&self) -> &Arc<ReconciliationCache<CompletenessPolicy>> {
        &self.cache
    }

    /// Wraps this translator in a registry descriptor for any Arista EOS release.
    pub fn into_descriptor(self) -> Result<Translator, RegistryError> {
        let origin = self.origin.clone();
        let mut builder = Translator::builder(LACP_MEMBER_STATE_ID, Arc::new(self));
        for field in LACP_REQUIRED_FIELDS.iter().chain(LACP_OPTIONAL_FIELDS.iter()) {
            let mut inputs = vec![
                format!("/interfaces/interface/lacp/state/{field}"),
                AGGREGATE_ID_INPUT.to_string(),
                AGGREGATE_MEMBERS_INPUT.to_string(),
            ];
            // Any missing required field holds back every output of the member.
            inputs.extend(
                LACP_REQUIRED_FIELDS
                    .iter()
                    .map(|required| format!("/interfaces/interface/lacp/state/{required}")),
            );
            builder = builder.output(
                format!(
                    "{origin}:/lacp/interfaces/interface/members/member/state/{field}"
                ),
                inputs,
            );
        }
        builder
            .applies_to(PlatformConstraint::vendor("Arista"))
            .build()
    }

    fn parse_ops(notification: &Notification) -> Result<Vec<MemberOp>, TranslateError> {
        let mut ops = Vec::new();

        for (path, value) in notification.absolute_updates() {
            let leaf = NativeLeaf::classify(&path)?;
            if let Some(op) = leaf.membership_update(&path, value)? {
                ops.push(op);
            } else if let NativeLeaf::Lacp { member, field } = leaf {
                if is_lacp_field(field) {
                    ops.push(MemberOp::SetField {
                        member: member.to_string(),
                        field: field.to_string(),
                        value: value.clone(),
                    });
                }
            }
        }

        for path in notification.absolute_deletes() {
            let leaf = NativeLeaf::classify(&path)?;
            if let Some(op) = leaf.membership_delete() {
                ops.push(op);
            } else if let NativeLeaf::Lacp { member, field } = leaf {
                if is_lacp_field(field) {
                    ops.push(MemberOp::ClearField {
                        member: member.to_string(),
                        field: field.to_string(),
                    });
                }
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
            for member in &aggregate.retracted {
                output.deletes.push(member_subtree(&aggregate.group, member));
            }
            for entry in &aggregate.entries {
                let Some(member) = entry.member.as_deref() else {
                    continue;
                };
                let mut path = member_subtree(&aggregate.group, member);
                path.elem.push(PathElem::new("state"));
                path.elem.push(PathElem::new(entry.field.as_str()));
                output.updates.push(Update::new(path, entry.value.clone()));
            }
        }
        output
    }
}

impl Translate for LacpMemberTranslator {
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
            translator_id = LACP_MEMBER_STATE_ID,
            target = fields::format_target(notification.target()),
            updates = output.updates.len(),
            deletes = output.deletes.len(),
            "emitted lacp member state"
        );
        Ok(Some(output))
    }
}

#[cfg(test)]
mod tests {
    use super::{LacpMemberTranslator, LACP_MEMBER_STATE_ID};
    use telemetry_translator::{
        DeviceMetadata, Notification, Path, RuntimeConfig, Translate, TypedValue, Update,
    };

    const MEMBER_PREFIX: &str =
        "/lacp/interfaces/interface[name=Port-Channel1]/members/member[interface=Ethernet1]";

    fn native(path: &str, value: TypedValue) -> Notification {
        let mut notification = Notification::new(9, Path::default().with_target("dut1"));
        notification
            .updates
            .push(Update::new(path.parse().unwrap(), value));
        notification
    }

    fn lacp(field: &str, value: impl Into<TypedValue>) -> Notification {
        native(
            &format!("/interfaces/interface[name=Ethernet1]/lacp/state/{field}"),
            value.into(),
        )
    }

    #[test]
    fn member_record_is_published_only_when_complete() {
        let translator = LacpMemberTranslator::new(&RuntimeConfig::default());

        translator
            .translate(&native(
                "/interfaces/interface[name=Ethernet1]/ethernet/state/aggregate-id",
                "Port-Channel1".into(),
            ))
            .unwrap();
        assert_eq!(translator.translate(&lacp("synchronization", "IN_SYNC")).unwrap(), None);
        assert_eq!(translator.translate(&lacp("collecting", true)).unwrap(), None);
        assert_eq!(translator.translate(&lacp("oper-key", 7u64)).unwrap(), None);

        let output = translator
            .translate(&lacp("distributing", true))
            .unwrap()
            .unwrap();

        let paths: Vec<String> = output.updates.iter().map(|u| u.path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                format!("{MEMBER_PREFIX}/state/collecting"),
                format!("{MEMBER_PREFIX}/state/distributing"),
                format!("{MEMBER_PREFIX}/state/oper-key"),
                format!("{MEMBER_PREFIX}/state/synchronization"),
            ]
        );
        assert!(output.deletes.is_empty());
    }

    #[test]
    fn unknown_lacp_leaves_are_ignored() {
        let translator = LacpMemberTranslator::new(&RuntimeConfig::default());
        assert_eq!(translator.translate(&lacp("system-id", "00:1c:73")).unwrap(), None);
        assert_eq!(translator.cache().target_count(), 0);
    }

    #[test]
    fn descriptor_covers_every_arista_release() {
        let descriptor = LacpMemberTranslator::new(&RuntimeConfig::default())
            .into_descriptor()
            .unwrap();
        assert_eq!(descriptor.id(), LACP_MEMBER_STATE_ID);
        assert!(descriptor.applies_to(&DeviceMetadata::new("Arista", "", "4.20.1F")));
        assert!(descriptor.applies_to(&DeviceMetadata::new("ARISTA", "DCS-7280", "4.36.0F")));
        assert_eq!(descriptor.output_to_input_map().len(), 4);
    }
}
