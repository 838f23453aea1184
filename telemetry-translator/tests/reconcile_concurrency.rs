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

mod support;

use std::collections::BTreeMap;
use std::sync::Arc;
use support::{assign, counter, total, TARGET};
use telemetry_translator::{ReconciliationCache, SumPolicy};

const WORKERS: usize = 8;
const MEMBERS_PER_WORKER: usize = 16;
const GROUPS: usize = 4;

fn member_name(index: usize) -> String {
    format!("Ethernet{index}")
}

fn group_name(index: usize) -> String {
    format!("Port-Channel{}", index % GROUPS)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_batches_on_one_target_converge() {
    integration_test_utils::init_logging();

    let cache = Arc::new(ReconciliationCache::new(SumPolicy::new()));
    let mut handles = Vec::new();

    for worker in 0..WORKERS {
        let cache = cache.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            for offset in 0..MEMBERS_PER_WORKER {
                let index = worker * MEMBERS_PER_WORKER + offset;
                let member = member_name(index);
                let membership = assign(&member, &group_name(index));
                let value = counter(&member, "out-octets", index as u64 + 1);

                // Half the workers learn counters before membership.
                let ops = if worker % 2 == 0 {
                    [value, membership]
                } else {
                    [membership, value]
                };
                for op in ops {
                    cache
                        .apply(TARGET, &[op])
                        .expect("batch on healthy target should succeed");
                }
            }
        }));
    }
    for handle in handles {
        handle.await.expect("worker should not panic");
    }

    let mut expected: BTreeMap<String, u64> = BTreeMap::new();
    for index in 0..WORKERS * MEMBERS_PER_WORKER {
        *expected.entry(group_name(index)).or_default() += index as u64 + 1;
    }

    let touch: Vec<_> = (0..GROUPS)
        .map(|group| counter(&member_name(group), "in-octets", 0))
        .collect();
    let aggregates = cache.apply(TARGET, &touch).unwrap();

    for (group, sum) in expected {
        assert_eq!(total(&aggregates, &group, "out-octets"), Some(sum), "{group}");
        assert_eq!(
            cache.group_members(TARGET, &group).unwrap().len(),
            WORKERS * MEMBERS_PER_WORKER / GROUPS
        );
    }
    assert!(cache.held_members(TARGET).unwrap().is_empty());
    assert_eq!(cache.target_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_target_creation_keeps_every_target() {
    integration_test_utils::init_logging();

    let cache = Arc::new(ReconciliationCache::new(SumPolicy::new()));
    let mut handles = Vec::new();
    for worker in 0..WORKERS {
        let cache = cache.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            for device in 0..32 {
                let target = format!("dut{device}");
                cache
                    .apply(&target, &[assign(&member_name(worker), "Port-Channel1")])
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.target_count(), 32);
    assert_eq!(
        cache.group_members("dut7", "Port-Channel1").unwrap().len(),
        WORKERS
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn membership_churn_racing_counter_updates_keeps_one_owner() {
    integration_test_utils::init_logging();

    let cache = Arc::new(ReconciliationCache::new(SumPolicy::new()));
    cache
        .apply(TARGET, &[assign("Ethernet9", "Port-Channel1")])
        .unwrap();

    let churn = {
        let cache = cache.clone();
        tokio::task::spawn_blocking(move || {
            for round in 0..200 {
                let group = if round % 2 == 0 {
                    "Port-Channel1"
                } else {
                    "Port-Channel2"
                };
                cache.apply(TARGET, &[assign("Ethernet1", group)]).unwrap();
                if round % 7 == 0 {
                    cache.apply(TARGET, &[assign("Ethernet1", "")]).unwrap();
                }
            }
        })
    };
    let counters = {
        let cache = cache.clone();
        tokio::task::spawn_blocking(move || {
            for value in 0..200u64 {
                cache
                    .apply(TARGET, &[counter("Ethernet1", "out-octets", value)])
                    .unwrap();
            }
        })
    };
    churn.await.unwrap();
    counters.await.unwrap();

    assert_eq!(cache.group_members(TARGET, "Port-Channel1").unwrap(), vec!["Ethernet9"]);
    assert_eq!(cache.group_members(TARGET, "Port-Channel2").unwrap(), vec!["Ethernet1"]);
    assert!(cache.held_members(TARGET).unwrap().is_empty());

    let aggregates = cache
        .apply(
            TARGET,
            &[
                counter("Ethernet1", "out-octets", 200),
                counter("Ethernet9", "in-octets", 0),
            ],
        )
        .unwrap();

    assert_eq!(total(&aggregates, "Port-Channel2", "out-octets"), Some(200));
    assert!(matches!(
        total(&aggregates, "Port-Channel1", "out-octets"),
        None | Some(0)
    ));
}
