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

//! Translator registry keyed by stable translator identifiers.

use crate::dispatch::metadata::DeviceMetadata;
use crate::dispatch::translator::{MatchedPaths, OutputSuperset, TranslateError, Translator};
use crate::model::notification::Notification;
use crate::model::path::PathParseError;
use crate::observability::{events, fields};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, warn};

const COMPONENT: &str = "translator_registry";

/// Registry construction and planning failures. All of them indicate an authoring
/// bug in a translator definition rather than a runtime condition.
#[derive(Debug)]
pub enum RegistryError {
    DuplicateTranslator(String),
    InvalidPathKey { key: String, err: PathParseError },
    NonCanonicalOutputKey { key: String, canonical: String },
    AmbiguousVersionConstraint { id: String },
    OutputKeyMismatch { key: String, supplied: String },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::DuplicateTranslator(id) => {
                write!(f, "translator '{id}' is already registered")
            }
            RegistryError::InvalidPathKey { key, err } => {
                write!(f, "path key '{key}' does not parse: {err}")
            }
            RegistryError::NonCanonicalOutputKey { key, canonical } => {
                write!(
                    f,
                    "output key '{key}' is not canonical, expected '{canonical}'"
                )
            }
            RegistryError::AmbiguousVersionConstraint { id } => {
                write!(
                    f,
                    "translator '{id}' sets both a software version and a version range"
                )
            }
            RegistryError::OutputKeyMismatch { key, supplied } => {
                write!(
                    f,
                    "requested path encodes as '{supplied}' but is stored under '{key}'"
                )
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RegistryError::InvalidPathKey { err, .. } => Some(err),
            _ => None,
        }
    }
}

/// Process-wide translator registry. Built once at start-up and read-only after.
#[derive(Clone, Debug, Default)]
pub struct TranslatorRegistry {
    translators: BTreeMap<String, Arc<Translator>>,
}

impl TranslatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, translator: Translator) -> Result<(), RegistryError> {
        if self.translators.contains_key(translator.id()) {
            return Err(RegistryError::DuplicateTranslator(
                translator.id().to_string(),
            ));
        }
        debug!(
            event = events::TRANSLATOR_REGISTERED,
            component = COMPONENT,
            translator_id = translator.id(),
            outputs = translator.output_to_input_map().len(),
            "registered translator"
        );
        self.translators
            .insert(translator.id().to_string(), Arc::new(translator));
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<Arc<Translator>> {
        self.translators.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    /// Translators whose applicability matches the device, in ID order.
    pub fn select_applicable(&self, device: &DeviceMetadata) -> Vec<Arc<Translator>> {
        self.translators
            .values()
            .filter(|translator| translator.applies_to(device))
            .cloned()
            .collect()
    }

    /// Union of the inputs every applicable translator needs for the requested outputs.
    pub fn required_inputs(
        &self,
        superset: &OutputSuperset,
        device: &DeviceMetadata,
    ) -> Result<MatchedPaths, RegistryError> {
        let mut matched = MatchedPaths::default();
        for translator in self.translators.values() {
            if let Some(paths) = translator.required_inputs(superset, device)? {
                matched.merge(paths);
            }
        }
        Ok(matched)
    }

    /// Binds the applicable translators for one device.
    pub fn session(&self, device: &DeviceMetadata) -> TranslationSession {
        let translators = self.select_applicable(device);
        debug!(
            event = events::SESSION_CREATED,
            component = COMPONENT,
            vendor = %device.vendor,
            hardware_model = %device.hardware_model,
            software_version = %device.software_version,
            translators = translators.len(),
            "bound translation session"
        );
        TranslationSession {
            device: device.clone(),
            translators,
        }
    }
}

/// The translators selected for one device.
#[derive(Clone, Debug)]
pub struct TranslationSession {
    device: DeviceMetadata,
    translators: Vec<Arc<Translator>>,
}

impl TranslationSession {
    pub fn device(&self) -> &DeviceMetadata {
        &self.device
    }

    pub fn translator_ids(&self) -> Vec<&str> {
        self.translators
            .iter()
            .map(|translator| translator.id())
            .collect()
    }

    /// Runs every bound translator over one notification.
    ///
    /// The first translator error aborts the call; outputs of translators that already
    /// ran are discarded with it.
    pub fn translate(
        &self,
        notification: &Notification,
    ) -> Result<Vec<Notification>, TranslateError> {
        let mut outputs = Vec::new();
        for translator in &self.translators {
            match translator.translate(notification) {
                Ok(Some(output)) => outputs.push(output),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        event = events::TRANSLATE_FAILED,
                        component = COMPONENT,
                        translator_id = translator.id(),
                        target = %fields::format_target(notification.target()),
                        timestamp = notification.timestamp,
                        err = %err,
                        "translator rejected notification"
                    );
                    return Err(err);
                }
            }
        }
        Ok(outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::{RegistryError, TranslatorRegistry};
    use crate::dispatch::metadata::{DeviceMetadata, PlatformConstraint};
    use crate::dispatch::translator::{OutputSuperset, Translate, TranslateError, Translator};
    use crate::dispatch::version::VersionRange;
    use crate::model::notification::Notification;
    use crate::model::path::Path;
    use std::sync::Arc;

    fn tagging(tag: &'static str) -> Arc<dyn Translate> {
        Arc::new(
            move |notification: &Notification| -> Result<Option<Notification>, TranslateError> {
                let mut output = Notification::new(
                    notification.timestamp,
                    Path::from_names([tag]).with_origin("openconfig"),
                );
                output.updates = notification.updates.clone();
                Ok(Some(output))
            },
        )
    }

    fn silent() -> Arc<dyn Translate> {
        Arc::new(|_: &Notification| -> Result<Option<Notification>, TranslateError> { Ok(None) })
    }

    fn registry() -> TranslatorRegistry {
        let mut registry = TranslatorRegistry::new();
        registry
            .register(
                Translator::builder("b-old-eos", tagging("old"))
                    .output(
                        "openconfig:/interfaces/interface/state/counters/out-octets",
                        ["/interfaces/interface/state/counters/out-octets"],
                    )
                    .applies_to(
                        PlatformConstraint::vendor("Arista")
                            .with_software_version_range(VersionRange::new("4.30", "4.35")),
                    )
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                Translator::builder("a-any-arista", silent())
                    .output(
                        "openconfig:/interfaces/interface/state/counters/out-octets",
                        ["/interfaces/interface/ethernet/state/aggregate-id"],
                    )
                    .applies_to(PlatformConstraint::vendor("arista"))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
            .register(
                Translator::builder("c-cisco", tagging("cisco"))
                    .applies_to(PlatformConstraint::vendor("Cisco"))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = registry();
        let again = Translator::builder("c-cisco", silent()).build().unwrap();
        assert!(matches!(
            registry.register(again),
            Err(RegistryError::DuplicateTranslator(id)) if id == "c-cisco"
        ));
        assert_eq!(registry.len(), 3);
        assert!(registry.lookup("a-any-arista").is_some());
        assert!(registry.lookup("missing").is_none());
    }

    #[test]
    fn select_applicable_returns_matches_in_id_order() {
        let registry = registry();
        let selected = registry.select_applicable(&DeviceMetadata::new("ARISTA", "", "4.34.1F"));
        let ids: Vec<&str> = selected.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["a-any-arista", "b-old-eos"]);

        let newer = registry.select_applicable(&DeviceMetadata::new("Arista", "", "4.35.0F"));
        assert_eq!(newer.len(), 1);
    }

    #[test]
    fn registry_required_inputs_unions_applicable_translators() {
        let registry = registry();
        let superset = OutputSuperset::from_paths(
            "openconfig",
            ["/interfaces/interface[name=PC1]/state/counters/out-octets"
                .parse::<Path>()
                .unwrap()],
        );

        let matched = registry
            .required_inputs(&superset, &DeviceMetadata::new("Arista", "", "4.34.1F"))
            .unwrap();
        assert_eq!(matched.input_paths.len(), 2);

        let none = registry
            .required_inputs(&superset, &DeviceMetadata::new("Juniper", "", "23.4R1"))
            .unwrap();
        assert!(none.is_empty());
        assert!(none.input_paths.is_empty());
    }

    #[test]
    fn session_runs_translators_and_skips_silent_ones() {
        let registry = registry();
        let session = registry.session(&DeviceMetadata::new("Arista", "", "4.34.1F"));
        assert_eq!(session.translator_ids(), vec!["a-any-arista", "b-old-eos"]);

        let input = Notification::new(42, Path::default().with_target("dut1"));
        let outputs = session.translate(&input).unwrap();

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].timestamp, 42);
        assert_eq!(outputs[0].prefix.origin, "openconfig");
    }
}
