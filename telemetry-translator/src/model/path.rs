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

//! Hierarchical telemetry path with join, structural matching and schema-string encoding.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Token that matches any element name when it appears in a pattern path.
pub const WILDCARD: &str = "*";

const ORIGIN_SEPARATOR: &str = ":/";

/// One named element of a [`Path`], optionally carrying list keys.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PathElem {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub key: BTreeMap<String, String>,
}

impl PathElem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: BTreeMap::new(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.key.insert(key.into(), value.into());
        self
    }

    pub fn key(&self, key: &str) -> Option<&str> {
        self.key.get(key).map(String::as_str)
    }
}

/// Address into a canonical or vendor-native data tree.
///
/// An empty `origin` or `target` means the field is absent on the wire.
///
/// ```
/// use telemetry_translator::Path;
///
/// let path: Path = "openconfig:/interfaces/interface[name=Ethernet1/1]/state"
///     .parse()
///     .unwrap();
/// assert_eq!(path.elem[1].key("name"), Some("Ethernet1/1"));
/// assert_eq!(path.schema_string(None), "openconfig:/interfaces/interface/state");
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Path {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub origin: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elem: Vec<PathElem>,
}

impl Path {
    pub fn new(elem: Vec<PathElem>) -> Self {
        Self {
            elem,
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Builds a key-less path from element names.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(names.into_iter().map(PathElem::new).collect())
    }

    pub fn len(&self) -> usize {
        self.elem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elem.is_empty()
    }

    /// Concatenates `prefix` and `suffix` elements. Origin and target come from the
    /// prefix when set there, otherwise from the suffix.
    pub fn join(prefix: &Path, suffix: &Path) -> Path {
        let pick = |p: &String, s: &String| if p.is_empty() { s.clone() } else { p.clone() };

        let mut elem = Vec::with_capacity(prefix.elem.len() + suffix.elem.len());
        elem.extend(prefix.elem.iter().cloned());
        elem.extend(suffix.elem.iter().cloned());

        Path {
            origin: pick(&prefix.origin, &suffix.origin),
            target: pick(&prefix.target, &suffix.target),
            elem,
        }
    }

    /// Structural match against a pattern: same length, and every pattern name is
    /// either equal to the path's name or the [`WILDCARD`]. Keys are never compared.
    pub fn matches(&self, pattern: &Path) -> bool {
        self.elem.len() == pattern.elem.len()
            && self
                .elem
                .iter()
                .zip(pattern.elem.iter())
                .all(|(elem, pattern_elem)| {
                    pattern_elem.name == WILDCARD || pattern_elem.name == elem.name
                })
    }

    /// Key-stripped, origin-qualified encoding used as a map key.
    ///
    /// When `default_origin` is given and the path carries no origin, the default is
    /// substituted so that vendors omitting the origin still hit the same key.
    pub fn schema_string(&self, default_origin: Option<&str>) -> String {
        let origin = match (self.origin.as_str(), default_origin) {
            ("", Some(fallback)) => fallback,
            (origin, _) => origin,
        };

        let mut encoded = String::new();
        if !origin.is_empty() {
            encoded.push_str(origin);
            encoded.push(':');
        }
        if self.elem.is_empty() {
            encoded.push('/');
        }
        for elem in &self.elem {
            encoded.push('/');
            encoded.push_str(&elem.name);
        }
        encoded
    }

    /// Returns the key value of the element at `index`, if both exist.
    pub fn key_at(&self, index: usize, key: &str) -> Option<&str> {
        self.elem.get(index).and_then(|elem| elem.key(key))
    }

    pub fn last_name(&self) -> Option<&str> {
        self.elem.last().map(|elem| elem.name.as_str())
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.origin.is_empty() {
            write!(f, "{}:", self.origin)?;
        }
        if self.elem.is_empty() {
            return write!(f, "/");
        }
        for elem in &self.elem {
            write!(f, "/{}", elem.name)?;
            for (key, value) in &elem.key {
                write!(f, "[{key}={}]", value.replace(']', "\\]"))?;
            }
        }
        Ok(())
    }
}

/// Failures while parsing the textual path form.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PathParseError {
    EmptyElement(String),
    UnterminatedKey(String),
    MissingKeyValue(String),
}

impl Display for PathParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PathParseError::EmptyElement(path) => {
                write!(f, "path '{path}' contains an empty element name")
            }
            PathParseError::UnterminatedKey(path) => {
                write!(f, "path '{path}' has an unterminated key selector")
            }
            PathParseError::MissingKeyValue(path) => {
                write!(f, "path '{path}' has a key selector without '='")
            }
        }
    }
}

impl Error for PathParseError {}

impl FromStr for Path {
    type Err = PathParseError;

    /// Parses `origin:/a/b[k=v]/c`. Key values may contain `/`; a literal `]` inside a
    /// value is written as `\]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (origin, rest) = match s.find(ORIGIN_SEPARATOR) {
            Some(idx) if !s[..idx].contains('/') && !s[..idx].contains('[') => {
                (&s[..idx], &s[idx + 1..])
            }
            _ => ("", s),
        };

        let mut elem = Vec::new();
        let mut chars = rest.trim_start_matches('/').chars().peekable();
        let mut name = String::new();
        let mut current: Option<PathElem> = None;

        let finish = |name: &mut String,
                      current: &mut Option<PathElem>,
                      elem: &mut Vec<PathElem>|
         -> Result<(), PathParseError> {
            let taken = current.take();
            match taken {
                Some(done) => elem.push(done),
                None if name.is_empty() => return Err(PathParseError::EmptyElement(s.to_string())),
                None => elem.push(PathElem::new(std::mem::take(name))),
            }
            Ok(())
        };

        if chars.peek().is_none() {
            return Ok(Path {
                origin: origin.to_string(),
                ..Default::default()
            });
        }

        while let Some(c) = chars.next() {
            match c {
                '/' => finish(&mut name, &mut current, &mut elem)?,
                '[' => {
                    let mut selector = String::new();
                    let mut closed = false;
                    while let Some(k) = chars.next() {
                        match k {
                            '\\' if chars.peek() == Some(&']') => {
                                selector.push(']');
                                chars.next();
                            }
                            ']' => {
                                closed = true;
                                break;
                            }
                            other => selector.push(other),
                        }
                    }
                    if !closed {
                        return Err(PathParseError::UnterminatedKey(s.to_string()));
                    }
                    let (key, value) = selector
                        .split_once('=')
                        .ok_or_else(|| PathParseError::MissingKeyValue(s.to_string()))?;
                    let target = current.get_or_insert_with(|| PathElem::new(std::mem::take(&mut name)));
                    if target.name.is_empty() {
                        return Err(PathParseError::EmptyElement(s.to_string()));
                    }
                    target.key.insert(key.to_string(), value.to_string());
                }
                other => {
                    if current.is_some() {
                        // Characters after a key selector without a '/' are not a valid element.
                        return Err(PathParseError::EmptyElement(s.to_string()));
                    }
                    name.push(other);
                }
            }
        }
        finish(&mut name, &mut current, &mut elem)?;

        Ok(Path {
            origin: origin.to_string(),
            target: String::new(),
            elem,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Path, PathElem, PathParseError};

    fn path(s: &str) -> Path {
        s.parse().expect("valid path")
    }

    #[test]
    fn join_prefers_prefix_origin_and_target() {
        let prefix = path("openconfig:/interfaces").with_target("dut1");
        let suffix = path("vendor:/interface[name=Ethernet1]/state").with_target("other");

        let joined = Path::join(&prefix, &suffix);

        assert_eq!(joined.origin, "openconfig");
        assert_eq!(joined.target, "dut1");
        assert_eq!(
            joined.to_string(),
            "openconfig:/interfaces/interface[name=Ethernet1]/state"
        );
    }

    #[test]
    fn join_falls_back_to_suffix_origin_and_target() {
        let prefix = path("/interfaces");
        let suffix = path("vendor:/interface/state").with_target("dut2");

        let joined = Path::join(&prefix, &suffix);

        assert_eq!(joined.origin, "vendor");
        assert_eq!(joined.target, "dut2");
        assert_eq!(joined.len(), 3);
    }

    #[test]
    fn match_is_reflexive_and_ignores_keys() {
        let concrete = path("/interfaces/interface[name=Ethernet1]/state/counters/out-octets");
        assert!(concrete.matches(&concrete));

        let other_key = path("/interfaces/interface[name=Ethernet9]/state/counters/out-octets");
        let no_key = path("/interfaces/interface/state/counters/out-octets");
        assert!(concrete.matches(&other_key));
        assert!(concrete.matches(&no_key));
    }

    #[test]
    fn wildcard_matches_any_name_but_not_any_length() {
        let concrete = path("/interfaces/interface[name=Ethernet1]/state/counters/out-octets");
        let pattern = path("/interfaces/interface/state/counters/*");
        let shorter = path("/interfaces/interface/state/*");

        assert!(concrete.matches(&pattern));
        assert!(!concrete.matches(&shorter));
        assert!(!concrete.matches(&path("/interfaces/interface/config/counters/*")));
    }

    #[test]
    fn schema_string_strips_keys_and_backfills_origin() {
        let native = path("/interfaces/interface[name=Ethernet1]/state");

        assert_eq!(native.schema_string(None), "/interfaces/interface/state");
        assert_eq!(
            native.schema_string(Some("openconfig")),
            "openconfig:/interfaces/interface/state"
        );

        let explicit = path("vendor:/interfaces/interface[name=Ethernet1]/state");
        assert_eq!(
            explicit.schema_string(Some("openconfig")),
            "vendor:/interfaces/interface/state"
        );
    }

    #[test]
    fn parse_accepts_slashes_and_escaped_brackets_in_key_values() {
        let parsed = path("/interfaces/interface[name=Ethernet1/1]/subinterfaces/subinterface[index=0]");
        assert_eq!(parsed.key_at(1, "name"), Some("Ethernet1/1"));
        assert_eq!(parsed.key_at(3, "index"), Some("0"));

        let escaped = Path::new(vec![PathElem::new("a").with_key("k", "x]y")]);
        assert_eq!(path(&escaped.to_string()), escaped);
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert_eq!(
            "/a//b".parse::<Path>(),
            Err(PathParseError::EmptyElement("/a//b".to_string()))
        );
        assert!(matches!(
            "/a[name=x".parse::<Path>(),
            Err(PathParseError::UnterminatedKey(_))
        ));
        assert!(matches!(
            "/a[name]".parse::<Path>(),
            Err(PathParseError::MissingKeyValue(_))
        ));
    }

    #[test]
    fn root_path_round_trips() {
        let root = path("openconfig:/");
        assert!(root.is_empty());
        assert_eq!(root.to_string(), "openconfig:/");
        assert_eq!(root.schema_string(None), "openconfig:/");
    }
}
