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

//! Decoding of raw captures into [`Notification`]s.

use crate::model::notification::Notification;
use crate::observability::events;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tracing::warn;

const COMPONENT: &str = "notification_decoder";

/// Model id understood by [`JsonNotificationDecoder`].
pub const GNMI_JSON_MODEL: &str = "gnmi-json";

#[derive(Debug)]
pub enum DecodeError {
    UnsupportedModel(String),
    Json(serde_json::Error),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::UnsupportedModel(model_id) => {
                write!(f, "no decoder for model '{model_id}'")
            }
            DecodeError::Json(err) => write!(f, "malformed notification JSON: {err}"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DecodeError::Json(err) => Some(err),
            DecodeError::UnsupportedModel(_) => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Json(err)
    }
}

/// Turns raw bytes of a given data model into notifications.
pub trait NotificationDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8], model_id: &str) -> Result<Vec<Notification>, DecodeError>;
}

/// Decodes gNMI JSON: a single notification object, an array of them, or one object
/// per line.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonNotificationDecoder;

impl JsonNotificationDecoder {
    fn decode_json(bytes: &[u8]) -> Result<Vec<Notification>, serde_json::Error> {
        let first = bytes
            .iter()
            .copied()
            .find(|byte| !byte.is_ascii_whitespace());
        match first {
            None => Ok(Vec::new()),
            Some(b'[') => serde_json::from_slice(bytes),
            Some(_) => serde_json::Deserializer::from_slice(bytes)
                .into_iter::<Notification>()
                .collect(),
        }
    }
}

impl NotificationDecoder for JsonNotificationDecoder {
    fn decode(&self, bytes: &[u8], model_id: &str) -> Result<Vec<Notification>, DecodeError> {
        if model_id != GNMI_JSON_MODEL {
            return Err(DecodeError::UnsupportedModel(model_id.to_string()));
        }
        Self::decode_json(bytes).map_err(|err| {
            warn!(
                event = events::DECODE_FAILED,
                component = COMPONENT,
                model_id,
                line = err.line(),
                err = %err,
                "failed to decode notification capture"
            );
            DecodeError::Json(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, JsonNotificationDecoder, NotificationDecoder, GNMI_JSON_MODEL};
    use crate::model::typed_value::TypedValue;

    const ONE: &str = r#"{
        "timestamp": 7,
        "prefix": {"origin": "openconfig", "target": "dut1"},
        "update": [
            {"path": {"elem": [{"name": "interfaces"}, {"name": "interface", "key": {"name": "Ethernet1"}}]},
             "val": {"uint_val": 12}}
        ]
    }"#;

    #[test]
    fn decodes_single_object() {
        let decoded = JsonNotificationDecoder
            .decode(ONE.as_bytes(), GNMI_JSON_MODEL)
            .unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].target(), "dut1");
        assert_eq!(decoded[0].updates[0].val, TypedValue::Uint(12));
        assert_eq!(decoded[0].updates[0].path.key_at(1, "name"), Some("Ethernet1"));
    }

    #[test]
    fn decodes_arrays_and_json_lines() {
        let lines = "{\"timestamp\":1}\n{\"timestamp\":2,\"delete\":[{\"elem\":[{\"name\":\"a\"}]}]}\n";
        let decoded = JsonNotificationDecoder
            .decode(lines.as_bytes(), GNMI_JSON_MODEL)
            .unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].deletes.len(), 1);

        let array = format!("[{ONE}, {ONE}]");
        let decoded = JsonNotificationDecoder
            .decode(array.as_bytes(), GNMI_JSON_MODEL)
            .unwrap();
        assert_eq!(decoded.len(), 2);

        assert!(JsonNotificationDecoder
            .decode(b"  \n", GNMI_JSON_MODEL)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn rejects_unknown_models_and_bad_json() {
        assert!(matches!(
            JsonNotificationDecoder.decode(ONE.as_bytes(), "proto"),
            Err(DecodeError::UnsupportedModel(model)) if model == "proto"
        ));
        assert!(matches!(
            JsonNotificationDecoder.decode(b"{\"timestamp\":", GNMI_JSON_MODEL),
            Err(DecodeError::Json(_))
        ));
    }
}
