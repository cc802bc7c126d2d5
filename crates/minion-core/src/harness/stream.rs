//! Delay-driven stream endpoints for the minion's request and response
//! interfaces.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{MemRequest, MemResponse};

use super::HarnessError;

/// Producer that presents a fixed list of requests in order.
///
/// A request is valid only while the delay counter is zero. The counter
/// starts at `initial_delay`, reloads `interval_delay` after every transfer
/// and otherwise counts down once per step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSource {
    msgs: Vec<MemRequest>,
    idx: usize,
    count: u32,
    interval_delay: u32,
}

impl TestSource {
    /// Source with no delays.
    #[must_use]
    pub fn new(msgs: Vec<MemRequest>) -> Self {
        Self::with_delays(msgs, 0, 0)
    }

    /// Source that waits `initial_delay` steps before the first request and
    /// `interval_delay` steps between requests.
    #[must_use]
    pub const fn with_delays(
        msgs: Vec<MemRequest>,
        initial_delay: u32,
        interval_delay: u32,
    ) -> Self {
        Self {
            msgs,
            idx: 0,
            count: initial_delay,
            interval_delay,
        }
    }

    /// Request presented this step.
    #[must_use]
    pub fn current(&self) -> Option<MemRequest> {
        if self.count == 0 {
            self.msgs.get(self.idx).copied()
        } else {
            None
        }
    }

    /// Number of requests already transferred.
    #[must_use]
    pub const fn sent(&self) -> usize {
        self.idx
    }

    /// True once every request has been transferred.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.idx >= self.msgs.len()
    }

    /// Advances the delay counter after a step.
    pub fn commit(&mut self, transferred: bool) {
        if transferred {
            self.idx += 1;
            self.count = self.interval_delay;
        } else if self.count > 0 {
            self.count -= 1;
        }
    }

    /// One-column trace: the presented request, `#` while stalled or blank
    /// while idle.
    #[must_use]
    pub fn line_trace(&self, ready: bool) -> String {
        match self.current() {
            Some(req) if ready => req.to_string(),
            Some(_) => "#".to_owned(),
            None => " ".to_owned(),
        }
    }
}

/// How a [`TestSink`] drives its ready signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadyPattern {
    /// Ready once the delay counter reaches zero; `initial` steps before the
    /// first response and `interval` steps after each one.
    Delayed {
        /// Steps before the first response can be taken.
        initial: u32,
        /// Steps between responses.
        interval: u32,
    },
    /// Ready with `probability` on every step, drawn from a seeded RNG.
    Random {
        /// Chance of asserting ready on a step, in `0.0..=1.0`.
        probability: f64,
        /// RNG seed.
        seed: u64,
    },
}

impl ReadyPattern {
    /// Always ready.
    pub const ALWAYS: Self = Self::Delayed {
        initial: 0,
        interval: 0,
    };
}

impl Default for ReadyPattern {
    fn default() -> Self {
        Self::ALWAYS
    }
}

#[derive(Debug, Clone)]
enum ReadyDriver {
    Delayed { count: u32, interval: u32 },
    Random { probability: f64, rng: StdRng },
}

/// Consumer that checks responses against an expected list, or records
/// whatever arrives.
#[derive(Debug, Clone)]
pub struct TestSink {
    expected: Option<Vec<MemResponse>>,
    received: Vec<MemResponse>,
    driver: ReadyDriver,
    ready: bool,
}

impl TestSink {
    /// Sink expecting `expected` in order.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidProbability`] for a random pattern
    /// outside `0.0..=1.0`.
    pub fn new(expected: Vec<MemResponse>, pattern: ReadyPattern) -> Result<Self, HarnessError> {
        Self::build(Some(expected), pattern)
    }

    /// Sink that accepts anything and keeps it.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn recording(pattern: ReadyPattern) -> Result<Self, HarnessError> {
        Self::build(None, pattern)
    }

    fn build(
        expected: Option<Vec<MemResponse>>,
        pattern: ReadyPattern,
    ) -> Result<Self, HarnessError> {
        let driver = match pattern {
            ReadyPattern::Delayed { initial, interval } => ReadyDriver::Delayed {
                count: initial,
                interval,
            },
            ReadyPattern::Random { probability, seed } => {
                if !(0.0..=1.0).contains(&probability) {
                    return Err(HarnessError::InvalidProbability(probability));
                }
                ReadyDriver::Random {
                    probability,
                    rng: StdRng::seed_from_u64(seed),
                }
            }
        };
        Ok(Self {
            expected,
            received: Vec::new(),
            driver,
            ready: false,
        })
    }

    /// Decides this step's ready signal.
    pub fn begin_step(&mut self) -> bool {
        self.ready = match &mut self.driver {
            ReadyDriver::Delayed { count, .. } => *count == 0,
            ReadyDriver::Random { probability, rng } => rng.gen_bool(*probability),
        };
        self.ready
    }

    /// Ready signal chosen by the last [`Self::begin_step`].
    #[must_use]
    pub const fn ready(&self) -> bool {
        self.ready
    }

    /// Takes a response that fired this step.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::UnexpectedResponse`] past the end of the
    /// expected list and [`HarnessError::Mismatch`] on a wrong response.
    pub fn accept(&mut self, step: u64, response: MemResponse) -> Result<(), HarnessError> {
        if let Some(expected) = &self.expected {
            match expected.get(self.received.len()) {
                None => {
                    return Err(HarnessError::UnexpectedResponse {
                        step,
                        actual: response,
                    })
                }
                Some(want) if *want != response => {
                    return Err(HarnessError::Mismatch {
                        step,
                        index: self.received.len(),
                        expected: *want,
                        actual: response,
                    })
                }
                Some(_) => {}
            }
        }
        self.received.push(response);
        Ok(())
    }

    /// Advances the delay counter after a step.
    pub fn end_step(&mut self, fired: bool) {
        if let ReadyDriver::Delayed { count, interval } = &mut self.driver {
            if fired {
                *count = *interval;
            } else if *count > 0 {
                *count -= 1;
            }
        }
    }

    /// Responses taken so far.
    #[must_use]
    pub fn received(&self) -> &[MemResponse] {
        &self.received
    }

    /// True once every expected response arrived; a recording sink is never
    /// waiting on anything.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.expected
            .as_ref()
            .map_or(true, |expected| self.received.len() >= expected.len())
    }

    /// One-column trace of the response taken this step.
    #[must_use]
    pub fn line_trace(&self, delivered: Option<&MemResponse>) -> String {
        match delivered {
            Some(resp) => resp.to_string(),
            None if self.ready => " ".to_owned(),
            None => "#".to_owned(),
        }
    }

    /// Consumes the sink, returning what it received.
    #[must_use]
    pub fn into_received(self) -> Vec<MemResponse> {
        self.received
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadyPattern, TestSink, TestSource};
    use crate::{HarnessError, MemRequest, MemResponse};

    #[test]
    fn source_waits_out_initial_and_interval_delays() {
        let msgs = vec![MemRequest::read(0, 0), MemRequest::read(1, 4)];
        let mut src = TestSource::with_delays(msgs, 2, 1);

        assert_eq!(src.current(), None);
        src.commit(false);
        assert_eq!(src.current(), None);
        src.commit(false);
        assert_eq!(src.current().map(|r| r.opaque), Some(0));
        src.commit(true);
        assert_eq!(src.current(), None);
        src.commit(false);
        assert_eq!(src.current().map(|r| r.opaque), Some(1));
        src.commit(true);
        assert!(src.is_done());
        assert_eq!(src.sent(), 2);
    }

    #[test]
    fn stalled_source_keeps_presenting_the_same_request() {
        let mut src = TestSource::new(vec![MemRequest::read(7, 0)]);
        for _ in 0..3 {
            assert_eq!(src.current().map(|r| r.opaque), Some(7));
            assert_eq!(src.line_trace(false), "#");
            src.commit(false);
        }
    }

    #[test]
    fn delayed_sink_counts_down_between_responses() {
        let mut sink = TestSink::new(
            vec![MemResponse::write(0), MemResponse::write(1)],
            ReadyPattern::Delayed {
                initial: 1,
                interval: 2,
            },
        )
        .expect("pattern");

        assert!(!sink.begin_step());
        sink.end_step(false);
        assert!(sink.begin_step());
        sink.accept(1, MemResponse::write(0)).expect("match");
        sink.end_step(true);
        assert!(!sink.begin_step());
        sink.end_step(false);
        assert!(!sink.begin_step());
        sink.end_step(false);
        assert!(sink.begin_step());
        assert!(!sink.is_done());
    }

    #[test]
    fn sink_reports_mismatch_and_overrun() {
        let mut sink =
            TestSink::new(vec![MemResponse::write(0)], ReadyPattern::ALWAYS).expect("pattern");
        assert_eq!(
            sink.accept(4, MemResponse::write(1)),
            Err(HarnessError::Mismatch {
                step: 4,
                index: 0,
                expected: MemResponse::write(0),
                actual: MemResponse::write(1),
            })
        );
        sink.accept(5, MemResponse::write(0)).expect("match");
        assert!(sink.is_done());
        assert_eq!(
            sink.accept(6, MemResponse::write(2)),
            Err(HarnessError::UnexpectedResponse {
                step: 6,
                actual: MemResponse::write(2),
            })
        );
    }

    #[test]
    fn random_pattern_is_reproducible_for_a_seed() {
        let pattern = ReadyPattern::Random {
            probability: 0.5,
            seed: 0xa4e2_8cc2,
        };
        let mut a = TestSink::recording(pattern).expect("pattern");
        let mut b = TestSink::recording(pattern).expect("pattern");
        let first: Vec<bool> = (0..64).map(|_| a.begin_step()).collect();
        let second: Vec<bool> = (0..64).map(|_| b.begin_step()).collect();
        assert_eq!(first, second);
        assert!(first.contains(&true) && first.contains(&false));
    }

    #[test]
    fn out_of_range_probability_is_refused() {
        let err = TestSink::recording(ReadyPattern::Random {
            probability: 1.5,
            seed: 0,
        })
        .expect_err("invalid");
        assert_eq!(err, HarnessError::InvalidProbability(1.5));
    }
}
