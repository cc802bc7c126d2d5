//! Source/sink test bench around a [`Minion`].
//!
//! The harness drives the request interface from a [`TestSource`], the
//! response interface into a [`TestSink`], and checks every delivered
//! response in order. Run-to-completion ends when both endpoints are done and
//! nothing is left in flight.

mod reference;
mod stream;
pub mod vectors;

pub use reference::Reference;
pub use stream::{ReadyPattern, TestSink, TestSource};

use thiserror::Error;

use crate::{
    Admission, ConfigError, GenericSram, MemResponse, Minion, MinionConfig, PipelineDiag,
    ProtocolViolation, RequestError, Sram, StepInputs, StepOutputs, TraceEvent, VecTraceSink,
};

/// Failures observed while running a harness.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HarnessError {
    /// The run did not finish within the step budget.
    #[error("simulation did not finish within {steps} steps")]
    Timeout {
        /// Steps executed.
        steps: u64,
    },
    /// A delivered response differed from the expected one.
    #[error("step {step}: response {index} was {actual}, expected {expected}")]
    Mismatch {
        /// Step of delivery.
        step: u64,
        /// Position in the response stream.
        index: usize,
        /// Expected response.
        expected: MemResponse,
        /// Delivered response.
        actual: MemResponse,
    },
    /// A response arrived after every expected one was received.
    #[error("step {step}: unexpected response {actual}")]
    UnexpectedResponse {
        /// Step of delivery.
        step: u64,
        /// Delivered response.
        actual: MemResponse,
    },
    /// The minion refused a request from the source.
    #[error("step {step}: request rejected: {error}")]
    Rejected {
        /// Step of the handshake.
        step: u64,
        /// Reason for refusal.
        error: RequestError,
    },
    /// The minion latched a protocol violation.
    #[error("step {step}: {violation}")]
    Fault {
        /// Step of the violation.
        step: u64,
        /// Latched violation.
        violation: ProtocolViolation,
    },
    /// A random ready pattern named a probability outside `0.0..=1.0`.
    #[error("ready probability {0} is outside 0.0..=1.0")]
    InvalidProbability(f64),
    /// The minion could not be built.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Steps executed.
    pub steps: u64,
    /// Responses delivered, in order.
    pub responses: Vec<MemResponse>,
    /// One line per step when line tracing was enabled.
    pub trace: Vec<String>,
    /// Pipeline events when the minion was built with tracing enabled.
    pub events: Vec<TraceEvent>,
    /// Pipeline counters at the end of the run.
    pub diag: PipelineDiag,
}

/// Source, minion and sink wired back to back.
#[derive(Debug, Clone)]
pub struct TestHarness<S: Sram = GenericSram> {
    src: TestSource,
    minion: Minion<S>,
    sink: TestSink,
    line_trace: bool,
    lines: Vec<String>,
    events: VecTraceSink,
}

impl TestHarness<GenericSram> {
    /// Harness around a fresh minion built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Config`] when the geometry is unsupported.
    pub fn build(
        config: MinionConfig,
        src: TestSource,
        sink: TestSink,
    ) -> Result<Self, HarnessError> {
        Ok(Self::new(src, Minion::new(config)?, sink))
    }
}

impl<S: Sram> TestHarness<S> {
    /// Wires `src` and `sink` to `minion`.
    #[must_use]
    pub const fn new(src: TestSource, minion: Minion<S>, sink: TestSink) -> Self {
        Self {
            src,
            minion,
            sink,
            line_trace: false,
            lines: Vec::new(),
            events: VecTraceSink { events: Vec::new() },
        }
    }

    /// Records a text line per step in the run report.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn with_line_trace(mut self, enabled: bool) -> Self {
        self.line_trace = enabled;
        self
    }

    /// Minion under test.
    #[must_use]
    pub const fn minion(&self) -> &Minion<S> {
        &self.minion
    }

    /// Request source.
    #[must_use]
    pub const fn source(&self) -> &TestSource {
        &self.src
    }

    /// Response sink.
    #[must_use]
    pub const fn sink(&self) -> &TestSink {
        &self.sink
    }

    /// True when both endpoints are done and the pipeline is drained.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.src.is_done() && self.sink.is_done() && self.minion.is_idle()
    }

    /// Advances source, minion and sink by one step.
    ///
    /// # Errors
    ///
    /// Returns the first [`HarnessError`] seen this step.
    pub fn step(&mut self) -> Result<StepOutputs, HarnessError> {
        let step = self.minion.step_count();
        let request = self.src.current();
        let ready = self.sink.begin_step();

        let out = self
            .minion
            .tick_traced(&StepInputs::new(request, ready), &mut self.events)
            .map_err(|violation| HarnessError::Fault { step, violation })?;

        if let Admission::Rejected(error) = out.admission {
            return Err(HarnessError::Rejected { step, error });
        }

        if self.line_trace {
            let line = format!(
                "{:>3}: {} > ({}) > {}",
                step,
                self.src.line_trace(out.request_ready),
                self.minion.line_trace(),
                self.sink.line_trace(out.delivered().as_ref()),
            );
            self.lines.push(line);
        }

        self.src.commit(out.admission.transferred());
        if let Some(resp) = out.delivered() {
            self.sink.accept(step, resp)?;
        }
        self.sink.end_step(out.response_fired);

        Ok(out)
    }

    /// Steps until done.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Timeout`] once `max_steps` steps have run
    /// without finishing, or the first error from [`Self::step`].
    pub fn run(&mut self, max_steps: u64) -> Result<RunReport, HarnessError> {
        let mut steps = 0;
        while !self.is_done() {
            if steps >= max_steps {
                return Err(HarnessError::Timeout { steps });
            }
            self.step()?;
            steps += 1;
        }

        Ok(RunReport {
            steps,
            responses: self.sink.received().to_vec(),
            trace: std::mem::take(&mut self.lines),
            events: std::mem::take(&mut self.events.events),
            diag: *self.minion.diag(),
        })
    }

    /// Consumes the harness, returning the minion for inspection.
    #[must_use]
    pub fn into_minion(self) -> Minion<S> {
        self.minion
    }
}
