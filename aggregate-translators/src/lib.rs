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

//! # aggregate-translators
//!
//! Stateful translators built on the `telemetry-translator` reconciliation cache.
//!
//! - [`LagCounterTranslator`] sums member interface counters into link-aggregation
//!   counters.
//! - [`LacpMemberTranslator`] publishes per-member LACP records only once every
//!   required field is known.
//!
//! ```
//! use aggregate_translators::builtin_registry;
//! use telemetry_translator::{DeviceMetadata, RuntimeConfig};
//!
//! let registry = builtin_registry(&RuntimeConfig::default()).unwrap();
//! let session = registry.session(&DeviceMetadata::new("Arista", "DCS-7050", "4.34.2F"));
//! assert_eq!(session.translator_ids(), vec!["lacp-member-state", "lag-counters"]);
//! ```

mod lacp_members;
mod lag_counters;
mod native;

pub use lacp_members::{
    LacpMemberTranslator, LACP_MEMBER_STATE_ID, LACP_OPTIONAL_FIELDS, LACP_REQUIRED_FIELDS,
};
pub use lag_counters::{LagCounterTranslator, LAG_COUNTERS, LAG_COUNTERS_ID};

use telemetry_translator::{RegistryError, RuntimeConfig, TranslatorRegistry};

/// Registry holding every built-in translator, each with its own cache.
pub fn builtin_registry(config: &RuntimeConfig) -> Result<TranslatorRegistry, RegistryError> {
    let mut registry = TranslatorRegistry::new();
    registry.register(LagCounterTranslator::new(config).into_descriptor()?)?;
    registry.register(LacpMemberTranslator::new(config).into_descriptor()?)?;
    Ok(registry)
}
