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

use crate::model::path::Path;
use crate::model::typed_value::TypedValue;
use serde::{Deserialize, Serialize};

/// One path/value pair of a [`Notification`]. The path is relative to the prefix.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Update {
    pub path: Path,
    pub val: TypedValue,
}

impl Update {
    pub fn new(path: Path, val: impl Into<TypedValue>) -> Self {
        Self {
            path,
            val: val.into(),
        }
    }
}

/// A timestamped batch of updates and deletes under a common prefix.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Notification {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub prefix: Path,
    #[serde(default, rename = "update", skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<Update>,
    #[serde(default, rename = "delete", skip_serializing_if = "Vec::is_empty")]
    pub deletes: Vec<Path>,
}

impl Notification {
    pub fn new(timestamp: i64, prefix: Path) -> Self {
        Self {
            timestamp,
            prefix,
            ..Default::default()
        }
    }

    pub fn target(&self) -> &str {
        &self.prefix.target
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.deletes.is_empty()
    }

    /// Updates with the prefix joined onto each path.
    pub fn absolute_updates(&self) -> impl Iterator<Item = (Path, &TypedValue)> + '_ {
        self.updates
            .iter()
            .map(|update| (Path::join(&self.prefix, &update.path), &update.val))
    }

    /// Deletes with the prefix joined onto each path.
    pub fn absolute_deletes(&self) -> impl Iterator<Item = Path> + '_ {
        self.deletes
            .iter()
            .map(|delete| Path::join(&self.prefix, delete))
    }
}

#[cfg(test)]
mod tests {
    use super::{Notification, Update};
    use crate::model::path::Path;
    use crate::model::typed_value::TypedValue;

    #[test]
    fn wire_json_round_trips_without_loss() {
        let mut notification = Notification::new(
            1_700_000_000_000_000_000,
            Path::from_names(["interfaces"]).with_target("dut1"),
        );
        notification.updates.push(Update::new(
            "interface[name=Ethernet1]/state/counters/out-octets".parse().unwrap(),
            100u64,
        ));
        notification
            .deletes
            .push("interface[name=Ethernet2]/ethernet/state/aggregate-id".parse().unwrap());

        let encoded = serde_json::to_string(&notification).unwrap();
        let decoded: Notification = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, notification);
        assert!(encoded.contains(r#""update""#));
        assert!(encoded.contains(r#""delete""#));
    }

    #[test]
    fn absolute_paths_join_prefix() {
        let mut notification = Notification::new(1, Path::from_names(["interfaces"]));
        notification
            .updates
            .push(Update::new(Path::from_names(["interface", "state"]), true));

        let (path, value) = notification.absolute_updates().next().unwrap();
        assert_eq!(path.to_string(), "/interfaces/interface/state");
        assert_eq!(value, &TypedValue::Bool(true));
    }
}
