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

//! Mixed numeric/alphabetic software-version ordering and half-open ranges.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const PAD_TOKEN: &str = "0";

/// Splits a case-folded version into maximal runs of ASCII digits or letters.
/// Every other character only separates tokens.
pub fn tokenize(version: &str) -> Vec<String> {
    let folded = version.to_lowercase();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_is_digit = false;

    for c in folded.chars() {
        let is_digit = c.is_ascii_digit();
        if !is_digit && !c.is_alphabetic() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() && is_digit != current_is_digit {
            tokens.push(std::mem::take(&mut current));
        }
        current_is_digit = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn compare_tokens(left: &str, right: &str) -> Ordering {
    match (left.parse::<u64>(), right.parse::<u64>()) {
        (Ok(l), Ok(r)) => l.cmp(&r),
        // A digit run only loses to a letter run under plain string order.
        _ => left.cmp(right),
    }
}

/// Orders two version strings token by token, padding the shorter with `"0"`.
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    let left = tokenize(left);
    let right = tokenize(right);
    let width = left.len().max(right.len());

    (0..width)
        .map(|idx| {
            compare_tokens(
                left.get(idx).map(String::as_str).unwrap_or(PAD_TOKEN),
                right.get(idx).map(String::as_str).unwrap_or(PAD_TOKEN),
            )
        })
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Half-open version interval `[inclusive_min, exclusive_max)`.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VersionRange {
    pub inclusive_min: String,
    pub exclusive_max: String,
}

impl VersionRange {
    pub fn new(inclusive_min: impl Into<String>, exclusive_max: impl Into<String>) -> Self {
        Self {
            inclusive_min: inclusive_min.into(),
            exclusive_max: exclusive_max.into(),
        }
    }

    /// `true` when `version` lies in `[inclusive_min, exclusive_max)`.
    ///
    /// ```
    /// use telemetry_translator::VersionRange;
    ///
    /// let range = VersionRange::new("4.34", "4.35");
    /// assert!(range.contains("4.34.2F-build123"));
    /// assert!(range.contains("4.34.999"));
    /// assert!(!range.contains("4.35"));
    /// ```
    pub fn contains(&self, version: &str) -> bool {
        compare_versions(version, &self.inclusive_min) != Ordering::Less
            && compare_versions(version, &self.exclusive_max) == Ordering::Less
    }
}
