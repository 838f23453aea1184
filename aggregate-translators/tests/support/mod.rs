use std::sync::Arc;
use telemetry_translator::{Notification, Translate, TypedValue};

#[allow(dead_code)]
pub(crate) const TARGET: &str = "dut1";

/// Value emitted for `path` across `outputs`, last write wins.
pub(crate) fn emitted(outputs: &[Notification], path: &str) -> Option<TypedValue> {
    outputs
        .iter()
        .flat_map(|notification| notification.updates.iter())
        .rev()
        .find(|update| update.path.to_string() == path)
        .map(|update| update.val.clone())
}

#[allow(dead_code)]
pub(crate) fn deleted(outputs: &[Notification], path: &str) -> bool {
    outputs
        .iter()
        .flat_map(|notification| notification.deletes.iter())
        .any(|delete| delete.to_string() == path)
}

/// Feeds `inputs` through `translator` in order and collects every emission.
#[allow(dead_code)]
pub(crate) fn run(translator: &Arc<dyn Translate>, inputs: &[Notification]) -> Vec<Notification> {
    inputs
        .iter()
        .filter_map(|input| {
            translator
                .translate(input)
                .expect("translation should succeed")
        })
        .collect()
}

#[allow(dead_code)]
pub(crate) fn counter_path(group: &str, counter: &str) -> String {
    format!("/interfaces/interface[name={group}]/state/counters/{counter}")
}
