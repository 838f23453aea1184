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

//! Device metadata and the applicability descriptors matched against it.

use crate::dispatch::version::VersionRange;
use serde::{Deserialize, Serialize};

/// What a device reports about itself.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceMetadata {
    pub vendor: String,
    #[serde(default)]
    pub hardware_model: String,
    #[serde(default)]
    pub software_version: String,
}

impl DeviceMetadata {
    pub fn new(
        vendor: impl Into<String>,
        hardware_model: impl Into<String>,
        software_version: impl Into<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            hardware_model: hardware_model.into(),
            software_version: software_version.into(),
        }
    }
}

/// One applicability descriptor. Empty fields are wildcards; at most one of
/// `software_version` and `software_version_range` may be set.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConstraint {
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub hardware_model: String,
    #[serde(default)]
    pub software_version: String,
    #[serde(default)]
    pub software_version_range: Option<VersionRange>,
}

impl PlatformConstraint {
    pub fn vendor(vendor: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            ..Default::default()
        }
    }

    pub fn with_hardware_model(mut self, hardware_model: impl Into<String>) -> Self {
        self.hardware_model = hardware_model.into();
        self
    }

    pub fn with_software_version(mut self, software_version: impl Into<String>) -> Self {
        self.software_version = software_version.into();
        self
    }

    pub fn with_software_version_range(mut self, range: VersionRange) -> Self {
        self.software_version_range = Some(range);
        self
    }

    /// `true` when both an exact version and a version range are set.
    pub(crate) fn is_ambiguous(&self) -> bool {
        !self.software_version.is_empty() && self.software_version_range.is_some()
    }

    pub fn matches(&self, device: &DeviceMetadata) -> bool {
        field_matches(&self.vendor, &device.vendor)
            && field_matches(&self.hardware_model, &device.hardware_model)
            && field_matches(&self.software_version, &device.software_version)
            && self
                .software_version_range
                .as_ref()
                .map_or(true, |range| range.contains(&device.software_version))
    }
}

fn field_matches(wanted: &str, actual: &str) -> bool {
    wanted.is_empty() || wanted.eq_ignore_ascii_case(actual)
}

/// `true` iff any descriptor matches the device.
pub fn metadata_match(constraints: &[PlatformConstraint], device: &DeviceMetadata) -> bool {
    constraints
        .iter()
        .any(|constraint| constraint.matches(device))
}
