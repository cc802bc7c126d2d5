//! Deterministic pipeline fingerprint used by CI cross-host comparison.

use log as _;
use minion_core::harness::vectors::{random_msgs, split, DEFAULT_SEED};
use minion_core::{MinionConfig, ReadyPattern, TestHarness, TestSink, TestSource, TraceEvent};
use proptest as _;
use rand as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

fn fingerprint() -> String {
    let (reqs, resps) = split(&random_msgs(DEFAULT_SEED));
    let config = MinionConfig {
        tracing_enabled: true,
        ..MinionConfig::default()
    };
    let mut harness = TestHarness::build(
        config,
        TestSource::with_delays(reqs, 1, 1),
        TestSink::new(
            resps,
            ReadyPattern::Random {
                probability: 0.5,
                seed: DEFAULT_SEED,
            },
        )
        .expect("valid ready pattern"),
    )
    .expect("default geometry");
    let report = harness.run(100_000).expect("run should complete");

    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    hash_bytes(&mut hash, &report.steps.to_le_bytes());

    for event in &report.events {
        match *event {
            TraceEvent::RequestAccepted { step, opaque, index, .. } => {
                hash_bytes(&mut hash, &[0x10, opaque]);
                hash_bytes(&mut hash, &step.to_le_bytes());
                hash_bytes(&mut hash, &index.to_le_bytes());
            }
            TraceEvent::ResponseDelivered {
                step,
                opaque,
                bypassed,
            } => {
                hash_bytes(&mut hash, &[0x11, opaque, u8::from(bypassed)]);
                hash_bytes(&mut hash, &step.to_le_bytes());
            }
            TraceEvent::ResponseBuffered { step, occupancy, .. } => {
                hash_bytes(&mut hash, &[0x12]);
                hash_bytes(&mut hash, &step.to_le_bytes());
                hash_bytes(&mut hash, &occupancy.to_le_bytes());
            }
            _ => {}
        }
    }

    for resp in &report.responses {
        hash_bytes(&mut hash, &resp.data.to_le_bytes());
    }
    for word in harness.minion().sram().words() {
        hash_bytes(&mut hash, &word.to_le_bytes());
    }

    format!("{hash:016x}")
}

fn main() {
    println!("{}", fingerprint());
}
