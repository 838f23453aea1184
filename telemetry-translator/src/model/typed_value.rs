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

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Closed tagged union of leaf values, serialized with the gNMI JSON field names.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum TypedValue {
    #[serde(rename = "string_val")]
    String(String),
    #[serde(rename = "int_val")]
    Int(i64),
    #[serde(rename = "uint_val")]
    Uint(u64),
    #[serde(rename = "bool_val")]
    Bool(bool),
    #[serde(rename = "bytes_val")]
    Bytes(Vec<u8>),
    #[serde(rename = "double_val")]
    Double(f64),
    #[serde(rename = "leaflist_val")]
    LeafList(Vec<TypedValue>),
    #[serde(rename = "json_ietf_val")]
    JsonIetf(String),
}

impl TypedValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            TypedValue::Uint(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Elements of a leaf-list value.
    pub fn as_leaf_list(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::LeafList(values) => Some(values),
            _ => None,
        }
    }

    /// Wire tag name, used in error messages and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TypedValue::String(_) => "string_val",
            TypedValue::Int(_) => "int_val",
            TypedValue::Uint(_) => "uint_val",
            TypedValue::Bool(_) => "bool_val",
            TypedValue::Bytes(_) => "bytes_val",
            TypedValue::Double(_) => "double_val",
            TypedValue::LeafList(_) => "leaflist_val",
            TypedValue::JsonIetf(_) => "json_ietf_val",
        }
    }
}

impl Display for TypedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypedValue::String(value) | TypedValue::JsonIetf(value) => write!(f, "{value}"),
            TypedValue::Int(value) => write!(f, "{value}"),
            TypedValue::Uint(value) => write!(f, "{value}"),
            TypedValue::Bool(value) => write!(f, "{value}"),
            TypedValue::Bytes(value) => write!(f, "{value:02x?}"),
            TypedValue::Double(value) => write!(f, "{value}"),
            TypedValue::LeafList(values) => {
                write!(f, "[")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::String(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::String(value)
    }
}

impl From<u64> for TypedValue {
    fn from(value: u64) -> Self {
        TypedValue::Uint(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        TypedValue::Int(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Bool(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        TypedValue::Double(value)
    }
}
