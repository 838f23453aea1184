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

//! # telemetry-translator
//!
//! `telemetry-translator` is the runtime that turns vendor-native streaming telemetry
//! into a vendor-neutral canonical schema.
//!
//! It is centered on [`TranslatorRegistry`], which selects the translators that apply
//! to a device and plans the native paths a collector must subscribe to, and on
//! [`ReconciliationCache`], which rebuilds group-level values from per-member updates
//! that arrive in any order.
//!
//! ## Reconciling a link aggregation
//!
//! ```
//! use telemetry_translator::{MemberOp, ReconciliationCache, SumPolicy, TypedValue};
//!
//! let cache = ReconciliationCache::new(SumPolicy::new());
//! let set = |member: &str, value: u64| MemberOp::SetField {
//!     member: member.to_string(),
//!     field: "out-octets".to_string(),
//!     value: TypedValue::Uint(value),
//! };
//!
//! // A counter for a member whose group is not yet known is held.
//! assert!(cache.apply("dut1", &[set("Ethernet3", 70)]).unwrap().is_empty());
//!
//! // Learning the membership later promotes the held counter.
//! let out = cache
//!     .apply(
//!         "dut1",
//!         &[MemberOp::Assign { member: "Ethernet3".into(), group: "Port-Channel2".into() }],
//!     )
//!     .unwrap();
//! assert_eq!(out[0].group, "Port-Channel2");
//! assert_eq!(out[0].total("out-octets"), Some(&TypedValue::Uint(70)));
//! ```
//!
//! ## Internal architecture map
//!
//! - Model: paths, typed values and notifications in the gNMI wire shape
//! - Dispatch: version comparison, device matching, translator registry and planning
//! - Reconcile: per-target membership state, merge policies and the shared cache
//! - Decode: raw capture bytes to notifications
//!
//! ## Observability model
//!
//! The workspace uses `tracing` for logs/events.
//! Library code emits events and does not initialize a global subscriber. Binaries and
//! tests are responsible for one-time `tracing_subscriber` initialization at process
//! boundaries.

mod config;
pub use config::{RuntimeConfig, DEFAULT_ORIGIN};

mod decode;
pub use decode::{DecodeError, JsonNotificationDecoder, NotificationDecoder, GNMI_JSON_MODEL};

mod dispatch;
pub use dispatch::metadata::{metadata_match, DeviceMetadata, PlatformConstraint};
pub use dispatch::registry::{RegistryError, TranslationSession, TranslatorRegistry};
pub use dispatch::translator::{
    MatchedPaths, OutputSuperset, Translate, TranslateError, Translator, TranslatorBuilder,
};
pub use dispatch::version::{compare_versions, tokenize, VersionRange};

mod model;
pub use model::notification::{Notification, Update};
pub use model::path::{Path, PathElem, PathParseError, WILDCARD};
pub use model::typed_value::TypedValue;

#[doc(hidden)]
pub mod observability;

mod reconcile;
pub use reconcile::cache::{EvictionPolicy, MemberOp, ReconcileBatch, ReconciliationCache};
pub use reconcile::policy::{
    AggregateEntry, CompletenessPolicy, GroupAggregate, GroupView, MergePolicy, SumPolicy,
};
pub use reconcile::state::MemberState;
pub use reconcile::ReconcileError;
