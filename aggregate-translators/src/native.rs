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

//! Classification of native interface paths into cache operations.

use telemetry_translator::{MemberOp, Path, PathElem, TranslateError, TypedValue};

pub(crate) const INTERFACE_KEY: &str = "name";

pub(crate) const AGGREGATE_ID_INPUT: &str = "/interfaces/interface/ethernet/state/aggregate-id";
pub(crate) const AGGREGATE_MEMBERS_INPUT: &str = "/interfaces/interface/aggregation/state/member";

/// The native leaves the aggregate translators understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NativeLeaf<'a> {
    /// `/interfaces/interface[name=M]`
    Interface { name: &'a str },
    /// `.../ethernet/state/aggregate-id` of member `M`.
    AggregateId { member: &'a str },
    /// `.../aggregation/state/member` of aggregate `G`.
    AggregateMembers { group: &'a str },
    Counter { member: &'a str, name: &'a str },
    Lacp { member: &'a str, field: &'a str },
    Unrelated,
}

impl<'a> NativeLeaf<'a> {
    pub(crate) fn classify(path: &'a Path) -> Result<Self, TranslateError> {
        let names: Vec<&str> = path.elem.iter().map(|elem| elem.name.as_str()).collect();
        let ["interfaces", "interface", rest @ ..] = names.as_slice() else {
            return Ok(NativeLeaf::Unrelated);
        };
        // Only the leaves consumed here must name their interface.
        let consumed = matches!(
            rest,
            []
                | ["ethernet", "state", "aggregate-id"]
                | ["aggregation", "state", "member"]
                | ["state", "counters", _]
                | ["lacp", "state", _]
        );
        if !consumed {
            return Ok(NativeLeaf::Unrelated);
        }
        let name = path
            .key_at(1, INTERFACE_KEY)
            .ok_or_else(|| TranslateError::MissingKey {
                path: path.to_string(),
                key: INTERFACE_KEY.to_string(),
            })?;

        Ok(match rest {
            [] => NativeLeaf::Interface { name },
            ["ethernet", "state", "aggregate-id"] => NativeLeaf::AggregateId { member: name },
            ["aggregation", "state", "member"] => NativeLeaf::AggregateMembers { group: name },
            ["state", "counters", counter] => NativeLeaf::Counter {
                member: name,
                name: *counter,
            },
            ["lacp", "state", field] => NativeLeaf::Lacp {
                member: name,
                field: *field,
            },
            _ => NativeLeaf::Unrelated,
        })
    }

    /// Membership operation carried by an update, if this leaf is a membership leaf.
    pub(crate) fn membership_update(
        &self,
        path: &Path,
        value: &TypedValue,
    ) -> Result<Option<MemberOp>, TranslateError> {
        Ok(match *self {
            NativeLeaf::AggregateId { member } => {
                let group = value
                    .as_str()
                    .ok_or_else(|| unexpected(path, "string_val aggregate name"))?;
                Some(MemberOp::Assign {
                    member: member.to_string(),
                    group: group.to_string(),
                })
            }
            NativeLeaf::AggregateMembers { group } => Some(MemberOp::ReplaceMembers {
                group: group.to_string(),
                members: member_list(path, value)?,
            }),
            _ => None,
        })
    }

    /// Membership operation carried by a delete, if any.
    pub(crate) fn membership_delete(&self) -> Option<MemberOp> {
        match *self {
            NativeLeaf::Interface { name: member } | NativeLeaf::AggregateId { member } => {
                Some(MemberOp::Remove {
                    member: member.to_string(),
                })
            }
            NativeLeaf::AggregateMembers { group } => Some(MemberOp::ReplaceMembers {
                group: group.to_string(),
                members: Vec::new(),
            }),
            _ => None,
        }
    }
}

fn member_list(path: &Path, value: &TypedValue) -> Result<Vec<String>, TranslateError> {
    let expected = "leaflist_val of member names";
    let values = value
        .as_leaf_list()
        .ok_or_else(|| unexpected(path, expected))?;
    values
        .iter()
        .map(|member| {
            member
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| unexpected(path, expected))
        })
        .collect()
}

pub(crate) fn unexpected(path: &Path, expected: &str) -> TranslateError {
    TranslateError::UnexpectedValue {
        path: path.to_string(),
        expected: expected.to_string(),
    }
}

/// `/interfaces/interface[name=<group>]` followed by `leaf`.
pub(crate) fn aggregate_interface(group: &str, leaf: &[&str]) -> Path {
    let mut elem = vec![
        PathElem::new("interfaces"),
        PathElem::new("interface").with_key(INTERFACE_KEY, group),
    ];
    elem.extend(leaf.iter().copied().map(PathElem::new));
    Path::new(elem)
}
