//! Randomised and delay-swept runs checked against the reference model.

#![allow(clippy::pedantic, clippy::nursery, clippy::cast_possible_truncation)]

use log as _;
use minion_core::harness::vectors::{
    all_n_msgs, basic_multiple_msgs, basic_single_msgs, random_msgs, split, MsgPair, DEFAULT_SEED,
};
use minion_core::{
    MemRequest, Minion, MinionConfig, ReadyPattern, Reference, SramConfig, StepInputs,
    TestHarness, TestSink, TestSource, BYPASS_QUEUE_CAPACITY,
};
use proptest::prelude::*;
use rand as _;
use rstest::rstest;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const MAX_STEPS: u64 = 10_000;

fn run_pairs(pairs: &[MsgPair], src_delay: u32, sink: ReadyPattern) -> Minion {
    let (reqs, resps) = split(pairs);
    let mut harness = TestHarness::build(
        MinionConfig::default(),
        TestSource::with_delays(reqs, src_delay, src_delay),
        TestSink::new(resps.clone(), sink).expect("pattern"),
    )
    .expect("config");
    let report = harness.run(MAX_STEPS).expect("run completes");
    assert_eq!(report.responses, resps);
    assert!(report.diag.peak_occupancy <= BYPASS_QUEUE_CAPACITY);
    harness.into_minion()
}

#[rstest]
#[case::basic_single(basic_single_msgs(), 0, 0)]
#[case::basic_multiple(basic_multiple_msgs(), 0, 0)]
#[case::random(random_msgs(DEFAULT_SEED), 0, 0)]
#[case::random_0_3(random_msgs(DEFAULT_SEED), 0, 3)]
#[case::random_3_0(random_msgs(DEFAULT_SEED), 3, 0)]
#[case::random_3_5(random_msgs(DEFAULT_SEED), 3, 5)]
#[case::all_zeros(all_n_msgs(0, DEFAULT_SEED), 0, 0)]
#[case::all_ones(all_n_msgs(0xffff_ffff, DEFAULT_SEED), 2, 1)]
fn delay_sweep_delivers_expected_stream(
    #[case] pairs: Vec<MsgPair>,
    #[case] src_delay: u32,
    #[case] sink_delay: u32,
) {
    let minion = run_pairs(
        &pairs,
        src_delay,
        ReadyPattern::Delayed {
            initial: sink_delay,
            interval: sink_delay,
        },
    );

    let (reqs, _) = split(&pairs);
    let mut reference = Reference::new(&MinionConfig::default());
    reference.run(&reqs);
    assert_eq!(minion.sram().words(), reference.words());
}

#[test]
fn random_stalls_match_the_always_ready_run() {
    let pairs = random_msgs(DEFAULT_SEED);
    let always = run_pairs(&pairs, 0, ReadyPattern::ALWAYS);
    let stalled = run_pairs(
        &pairs,
        0,
        ReadyPattern::Random {
            probability: 0.5,
            seed: DEFAULT_SEED,
        },
    );

    assert_eq!(always.sram().words(), stalled.sram().words());
    assert_eq!(always.diag().delivered, stalled.diag().delivered);
    assert!(stalled.diag().consumer_stalls > 0);
    assert!(stalled.diag().producer_stalls > 0);
}

#[test]
fn always_ready_stream_sustains_one_request_per_step() {
    let pairs = random_msgs(DEFAULT_SEED);
    let (reqs, resps) = split(&pairs);
    let mut harness = TestHarness::build(
        MinionConfig::default(),
        TestSource::new(reqs),
        TestSink::new(resps, ReadyPattern::ALWAYS).expect("pattern"),
    )
    .expect("config");

    let report = harness.run(MAX_STEPS).expect("run");
    assert_eq!(report.steps, pairs.len() as u64 + 1);
    assert_eq!(report.diag.bypassed, pairs.len() as u64);
    assert_eq!(report.diag.peak_occupancy, 0);
}

#[test]
fn wide_storage_serves_word_aligned_traffic() {
    let config = MinionConfig::with_sram(SramConfig::new(64, 32));
    let reqs: Vec<MemRequest> = (0..32_u32)
        .map(|i| MemRequest::write(i as u8, 8 * i, u128::from(i) << 40 | 0xff))
        .chain((0..32_u32).rev().map(|i| MemRequest::read(0x80 | i as u8, 8 * i)))
        .collect();
    let expected = Reference::new(&config).run(&reqs);

    let mut harness = TestHarness::build(
        config,
        TestSource::with_delays(reqs, 1, 2),
        TestSink::new(
            expected.clone(),
            ReadyPattern::Random {
                probability: 0.3,
                seed: 11,
            },
        )
        .expect("pattern"),
    )
    .expect("config");

    let report = harness.run(MAX_STEPS).expect("run");
    assert_eq!(report.responses, expected);
    assert_eq!(report.responses[32].data, u128::from(31_u32) << 40 | 0xff);
}

fn request_strategy() -> impl Strategy<Value = (bool, u32, u32)> {
    (any::<bool>(), 0_u32..0x400, any::<u32>())
}

proptest! {
    #[test]
    fn property_responses_match_reference_under_random_backpressure(
        ops in prop::collection::vec(request_strategy(), 1..64),
        probability in 0.05_f64..=1.0,
        seed in any::<u64>(),
        src_delay in 0_u32..3,
    ) {
        let reqs: Vec<MemRequest> = ops
            .iter()
            .enumerate()
            .map(|(i, &(write, addr, data))| {
                let addr = addr & !3;
                if write {
                    MemRequest::write(i as u8, addr, u128::from(data))
                } else {
                    MemRequest::read(i as u8, addr)
                }
            })
            .collect();
        let mut reference = Reference::new(&MinionConfig::default());
        let expected = reference.run(&reqs);

        let mut harness = TestHarness::build(
            MinionConfig::default(),
            TestSource::with_delays(reqs, src_delay, src_delay),
            TestSink::new(expected.clone(), ReadyPattern::Random { probability, seed })
                .expect("pattern"),
        )
        .expect("config");

        let report = harness.run(MAX_STEPS);
        prop_assert!(report.is_ok(), "{report:?}");
        let report = report.expect("checked above");
        prop_assert_eq!(report.responses, expected);
        prop_assert_eq!(harness.minion().sram().words(), reference.words());
    }

    #[test]
    fn property_ready_equals_empty_queue(
        readies in prop::collection::vec(any::<bool>(), 1..200),
        valids in prop::collection::vec(any::<bool>(), 1..200),
    ) {
        let mut minion = Minion::new(MinionConfig::default()).expect("config");
        let mut in_flight = 0_usize;

        for (step, (&ready, &valid)) in readies.iter().zip(valids.iter().cycle()).enumerate() {
            let occupancy = minion.occupancy();
            let request = valid.then(|| MemRequest::read(step as u8, (step as u32 % 128) * 4));
            let out = minion.tick(&StepInputs::new(request, ready));
            prop_assert!(out.is_ok());
            let out = out.expect("checked above");

            prop_assert_eq!(out.request_ready, occupancy == 0);
            prop_assert!(minion.occupancy() <= BYPASS_QUEUE_CAPACITY);
            if out.response_fired {
                prop_assert!(ready && out.response.is_some());
            }
            if out.admission.is_accepted() {
                in_flight += 1;
            }
            if out.response_fired {
                prop_assert!(in_flight > 0);
                in_flight -= 1;
            }
        }
    }
}
