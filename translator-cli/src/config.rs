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

use crate::error::CliError;
use serde::{Deserialize, Serialize};
use telemetry_translator::{DeviceMetadata, OutputSuperset, Path, RuntimeConfig};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub(crate) runtime: RuntimeConfig,
    pub(crate) device: DeviceMetadata,
    #[serde(default)]
    pub(crate) requested_outputs: Vec<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, CliError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, CliError> {
        Ok(json5::from_str(contents)?)
    }

    /// Requested outputs keyed by schema string, origin-less paths backfilled.
    pub fn output_superset(&self) -> Result<OutputSuperset, CliError> {
        let mut superset = OutputSuperset::new(self.runtime.default_origin.as_str());
        for requested in &self.requested_outputs {
            let path: Path = requested.parse().map_err(|err| CliError::OutputPath {
                path: requested.clone(),
                err,
            })?;
            superset.insert(path);
        }
        Ok(superset)
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::error::CliError;
    use telemetry_translator::EvictionPolicy;

    #[test]
    fn example_config_parses() {
        let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/configs/example.json5"))
            .unwrap();

        assert_eq!(config.device.vendor, "Arista");
        assert_eq!(config.runtime.eviction, EvictionPolicy::Retain);
        // Two counter outputs plus one LACP output, all under the default origin.
        assert_eq!(config.output_superset().unwrap().len(), 3);
    }

    #[test]
    fn runtime_section_is_optional() {
        let config = Config::parse("{ device: { vendor: 'Arista' } }").unwrap();
        assert_eq!(config.runtime.default_origin, "openconfig");
        assert!(config.requested_outputs.is_empty());
    }

    #[test]
    fn malformed_inputs_are_reported() {
        assert!(matches!(
            Config::parse("{ device: { vendor: 'Arista' }, extra: 1 }"),
            Err(CliError::Config(_))
        ));

        let config = Config::parse(
            "{ device: { vendor: 'Arista' }, requested_outputs: ['/interfaces/interface[name=x'] }",
        )
        .unwrap();
        assert!(matches!(
            config.output_superset(),
            Err(CliError::OutputPath { .. })
        ));

        assert!(matches!(
            Config::load("/nonexistent/translator.json5"),
            Err(CliError::Io { .. })
        ));
    }
}
