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

//! Translator descriptor: translate function, data dependencies and applicability.

use crate::dispatch::metadata::{metadata_match, DeviceMetadata, PlatformConstraint};
use crate::dispatch::registry::RegistryError;
use crate::model::notification::Notification;
use crate::model::path::Path;
use crate::reconcile::ReconcileError;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Failures surfaced by a translate function for one input notification.
#[derive(Debug)]
pub enum TranslateError {
    MalformedPath { path: String, reason: String },
    MissingKey { path: String, key: String },
    UnexpectedValue { path: String, expected: String },
    Reconcile(ReconcileError),
}

impl Display for TranslateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::MalformedPath { path, reason } => {
                write!(f, "malformed path '{path}': {reason}")
            }
            TranslateError::MissingKey { path, key } => {
                write!(f, "path '{path}' is missing required key '{key}'")
            }
            TranslateError::UnexpectedValue { path, expected } => {
                write!(f, "path '{path}' carries a value that is not {expected}")
            }
            TranslateError::Reconcile(err) => write!(f, "reconciliation failed: {err}"),
        }
    }
}

impl Error for TranslateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TranslateError::Reconcile(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ReconcileError> for TranslateError {
    fn from(err: ReconcileError) -> Self {
        TranslateError::Reconcile(err)
    }
}

/// Converts one vendor-native notification into a canonical one.
///
/// `Ok(None)` means there is nothing to emit for this input.
pub trait Translate: Send + Sync {
    fn translate(&self, notification: &Notification)
        -> Result<Option<Notification>, TranslateError>;
}

impl<F> Translate for F
where
    F: Fn(&Notification) -> Result<Option<Notification>, TranslateError> + Send + Sync,
{
    fn translate(
        &self,
        notification: &Notification,
    ) -> Result<Option<Notification>, TranslateError> {
        self(notification)
    }
}

/// Requested canonical output paths, keyed by their schema string.
#[derive(Clone, Debug, Default)]
pub struct OutputSuperset {
    default_origin: String,
    paths: BTreeMap<String, Path>,
}

impl OutputSuperset {
    pub fn new(default_origin: impl Into<String>) -> Self {
        Self {
            default_origin: default_origin.into(),
            paths: BTreeMap::new(),
        }
    }

    pub fn from_paths(
        default_origin: impl Into<String>,
        paths: impl IntoIterator<Item = Path>,
    ) -> Self {
        let mut superset = Self::new(default_origin);
        for path in paths {
            superset.insert(path);
        }
        superset
    }

    pub fn insert(&mut self, path: Path) {
        let key = path.schema_string(Some(&self.default_origin));
        self.paths.insert(key, path);
    }

    /// Inserts a path under a caller-chosen key. The key is checked against the path
    /// when it is matched by [`Translator::required_inputs`].
    pub fn insert_keyed(&mut self, key: impl Into<String>, path: Path) {
        self.paths.insert(key.into(), path);
    }

    pub fn default_origin(&self) -> &str {
        &self.default_origin
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn get(&self, key: &str) -> Option<&Path> {
        self.paths.get(key)
    }
}

/// Input paths needed to produce a set of requested outputs.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MatchedPaths {
    /// Deduplicated input paths, sorted by schema string.
    pub input_paths: Vec<Path>,
    /// Each matched output key and the input keys it depends on.
    pub output_to_input: BTreeMap<String, BTreeSet<String>>,
}

impl MatchedPaths {
    /// Unions another match into this one, keeping input paths sorted and unique.
    pub fn merge(&mut self, other: MatchedPaths) {
        let by_key: BTreeMap<String, Path> = self
            .input_paths
            .drain(..)
            .chain(other.input_paths)
            .map(|path| (path.schema_string(None), path))
            .collect();
        self.input_paths = by_key.into_values().collect();

        for (output, inputs) in other.output_to_input {
            self.output_to_input
                .entry(output)
                .or_default()
                .extend(inputs);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.output_to_input.is_empty()
    }
}

/// A registered translator.
#[derive(Clone)]
pub struct Translator {
    id: String,
    translate: Arc<dyn Translate>,
    output_to_input: BTreeMap<String, BTreeSet<String>>,
    input_paths: BTreeMap<String, Path>,
    applicability: Vec<PlatformConstraint>,
}

impl Debug for Translator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("id", &self.id)
            .field("output_to_input", &self.output_to_input)
            .field("applicability", &self.applicability)
            .finish_non_exhaustive()
    }
}

impl Translator {
    pub fn builder(id: impl Into<String>, translate: Arc<dyn Translate>) -> TranslatorBuilder {
        TranslatorBuilder {
            id: id.into(),
            translate,
            output_to_input: BTreeMap::new(),
            applicability: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn applicability(&self) -> &[PlatformConstraint] {
        &self.applicability
    }

    pub fn output_to_input_map(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.output_to_input
    }

    pub fn applies_to(&self, device: &DeviceMetadata) -> bool {
        metadata_match(&self.applicability, device)
    }

    pub fn translate(
        &self,
        notification: &Notification,
    ) -> Result<Option<Notification>, TranslateError> {
        self.translate.translate(notification)
    }

    /// Computes the inputs this translator needs for the requested outputs.
    ///
    /// Returns `Ok(None)` when the translator does not apply to the device.
    pub fn required_inputs(
        &self,
        superset: &OutputSuperset,
        device: &DeviceMetadata,
    ) -> Result<Option<MatchedPaths>, RegistryError> {
        if !self.applies_to(device) {
            return Ok(None);
        }

        let mut required: BTreeSet<&str> = BTreeSet::new();
        let mut output_to_input = BTreeMap::new();

        for (output_key, inputs) in &self.output_to_input {
            let Some(requested) = superset.get(output_key) else {
                continue;
            };
            let supplied = requested.schema_string(Some(superset.default_origin()));
            if supplied != *output_key {
                return Err(RegistryError::OutputKeyMismatch {
                    key: output_key.clone(),
                    supplied,
                });
            }
            required.extend(inputs.iter().map(String::as_str));
            output_to_input.insert(output_key.clone(), inputs.clone());
        }

        let input_paths = required
            .into_iter()
            .filter_map(|key| self.input_paths.get(key).cloned())
            .collect();

        Ok(Some(MatchedPaths {
            input_paths,
            output_to_input,
        }))
    }

    /// Single-path lookup of the inputs behind one canonical output.
    pub fn output_to_input(&self, output: &Path, default_origin: &str) -> Option<Vec<Path>> {
        self.output_to_input
            .get(&output.schema_string(Some(default_origin)))
            .map(|inputs| {
                inputs
                    .iter()
                    .filter_map(|key| self.input_paths.get(key).cloned())
                    .collect()
            })
    }
}

/// Builder that validates the output-to-input map and applicability at construction.
pub struct TranslatorBuilder {
    id: String,
    translate: Arc<dyn Translate>,
    output_to_input: BTreeMap<String, BTreeSet<String>>,
    applicability: Vec<PlatformConstraint>,
}

impl TranslatorBuilder {
    pub fn output<I, S>(mut self, output_key: impl Into<String>, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_to_input
            .entry(output_key.into())
            .or_default()
            .extend(inputs.into_iter().map(Into::into));
        self
    }

    pub fn applies_to(mut self, constraint: PlatformConstraint) -> Self {
        self.applicability.push(constraint);
        self
    }

    pub fn build(self) -> Result<Translator, RegistryError> {
        if self
            .applicability
            .iter()
            .any(PlatformConstraint::is_ambiguous)
        {
            return Err(RegistryError::AmbiguousVersionConstraint { id: self.id });
        }

        let mut input_paths = BTreeMap::new();
        for (output_key, inputs) in &self.output_to_input {
            let parsed: Path =
                output_key
                    .parse()
                    .map_err(|err| RegistryError::InvalidPathKey {
                        key: output_key.clone(),
                        err,
                    })?;
            let canonical = parsed.schema_string(None);
            if canonical != *output_key {
                return Err(RegistryError::NonCanonicalOutputKey {
                    key: output_key.clone(),
                    canonical,
                });
            }

            for input_key in inputs {
                let parsed: Path =
                    input_key
                        .parse()
                        .map_err(|err| RegistryError::InvalidPathKey {
                            key: input_key.clone(),
                            err,
                        })?;
                input_paths.insert(input_key.clone(), parsed);
            }
        }

        Ok(Translator {
            id: self.id,
            translate: self.translate,
            output_to_input: self.output_to_input,
            input_paths,
            applicability: self.applicability,
        })
    }
}
