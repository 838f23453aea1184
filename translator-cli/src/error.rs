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

use std::error::Error;
use std::fmt::{Display, Formatter};
use telemetry_translator::{DecodeError, PathParseError, RegistryError, TranslateError};

#[derive(Debug)]
pub enum CliError {
    Io { path: String, source: std::io::Error },
    Config(json5::Error),
    OutputPath { path: String, err: PathParseError },
    Registry(RegistryError),
    Decode(DecodeError),
    Translate(TranslateError),
    Output(serde_json::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Io { path, source } => write!(f, "unable to read '{path}': {source}"),
            CliError::Config(err) => write!(f, "unable to parse config file: {err}"),
            CliError::OutputPath { path, err } => {
                write!(f, "requested output '{path}' is not a valid path: {err}")
            }
            CliError::Registry(err) => write!(f, "translator registry: {err}"),
            CliError::Decode(err) => write!(f, "capture decode: {err}"),
            CliError::Translate(err) => write!(f, "translation: {err}"),
            CliError::Output(err) => write!(f, "unable to write output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliError::Io { source, .. } => Some(source),
            CliError::Config(err) => Some(err),
            CliError::OutputPath { err, .. } => Some(err),
            CliError::Registry(err) => Some(err),
            CliError::Decode(err) => Some(err),
            CliError::Translate(err) => Some(err),
            CliError::Output(err) => Some(err),
        }
    }
}

impl From<json5::Error> for CliError {
    fn from(err: json5::Error) -> Self {
        CliError::Config(err)
    }
}

impl From<RegistryError> for CliError {
    fn from(err: RegistryError) -> Self {
        CliError::Registry(err)
    }
}

impl From<DecodeError> for CliError {
    fn from(err: DecodeError) -> Self {
        CliError::Decode(err)
    }
}

impl From<TranslateError> for CliError {
    fn from(err: TranslateError) -> Self {
        CliError::Translate(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Output(err)
    }
}
