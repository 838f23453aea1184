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

use crate::reconcile::cache::EvictionPolicy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ORIGIN: &str = "openconfig";

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

/// Process-level runtime settings shared by the registry and the reconciliation caches.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Namespace backfilled into schema strings of origin-less paths.
    #[serde(default = "default_origin")]
    pub default_origin: String,
    #[serde(default)]
    pub eviction: EvictionPolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_origin: default_origin(),
            eviction: EvictionPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RuntimeConfig;
    use crate::reconcile::cache::EvictionPolicy;

    #[test]
    fn missing_fields_take_defaults() {
        let config: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.default_origin, "openconfig");
        assert_eq!(config.eviction, EvictionPolicy::Retain);
    }

    #[test]
    fn eviction_uses_snake_case_names() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"default_origin":"oc","eviction":"drop_empty_groups"}"#)
                .unwrap();
        assert_eq!(config.default_origin, "oc");
        assert_eq!(config.eviction, EvictionPolicy::DropEmptyGroups);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<RuntimeConfig>(r#"{"evict":"retain"}"#).is_err());
    }
}
