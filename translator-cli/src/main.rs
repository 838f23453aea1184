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

mod config;
mod error;

use crate::config::Config;
use crate::error::CliError;
use aggregate_translators::builtin_registry;
use clap::{Parser, Subcommand};
use std::io::Write;
use telemetry_translator::{
    JsonNotificationDecoder, MatchedPaths, Notification, NotificationDecoder, GNMI_JSON_MODEL,
};
use tracing::{debug, info};

#[derive(Parser)]
#[command()]
struct TranslatorArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the native inputs needed for the configured outputs.
    Plan {
        #[arg(short, long, value_name = "FILE")]
        config: String,
    },
    /// Translate a captured notification stream and print the outputs as JSON lines.
    Translate {
        #[arg(short, long, value_name = "FILE")]
        config: String,
        #[arg(short, long, value_name = "FILE")]
        input: String,
        #[arg(short, long, default_value = GNMI_JSON_MODEL)]
        model: String,
    },
}

fn plan(config: &Config) -> Result<MatchedPaths, CliError> {
    let registry = builtin_registry(&config.runtime)?;
    let superset = config.output_superset()?;
    Ok(registry.required_inputs(&superset, &config.device)?)
}

fn translate(config: &Config, raw: &[u8], model: &str) -> Result<Vec<Notification>, CliError> {
    let registry = builtin_registry(&config.runtime)?;
    let session = registry.session(&config.device);
    let notifications = JsonNotificationDecoder.decode(raw, model)?;
    debug!(
        notifications = notifications.len(),
        translators = session.translator_ids().len(),
        "decoded capture"
    );

    let mut outputs = Vec::new();
    for notification in &notifications {
        outputs.extend(session.translate(notification)?);
    }
    Ok(outputs)
}

fn main() -> Result<(), CliError> {
    let _ = tracing_subscriber::fmt::try_init();

    info!("Started translator-cli");

    let args = TranslatorArgs::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Plan { config } => {
            let config = Config::load(&config)?;
            let matched = plan(&config)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&matched)?).map_err(|source| {
                CliError::Io {
                    path: "<stdout>".to_string(),
                    source,
                }
            })?;
        }
        Command::Translate {
            config,
            input,
            model,
        } => {
            let config = Config::load(&config)?;
            let raw = std::fs::read(&input).map_err(|source| CliError::Io {
                path: input.clone(),
                source,
            })?;
            for output in translate(&config, &raw, &model)? {
                writeln!(out, "{}", serde_json::to_string(&output)?).map_err(|source| {
                    CliError::Io {
                        path: "<stdout>".to_string(),
                        source,
                    }
                })?;
            }
        }
    }

    Ok(())
}
