//! The three-stage SRAM minion pipeline.
//!
//! ```text
//!          .------.          .------.
//!          |      |          | 2elm |
//!    M0 -> | sram | -> M1 -> | bypq | -> consumer
//!          |      |       .- |      |
//!          '^-----'       |  '^-----'
//!                         |
//!   rdy <-(if count == 0)-'
//! ```
//!
//! Each [`Minion::tick`] runs in two phases. The evaluate phase reads only
//! state committed by the previous step: M1's held request, the SRAM's
//! registered read data and the queue occupancy. The commit phase then
//! updates the queue, clocks the SRAM and latches M1 together, so no stage
//! observes another stage's next-state value.

mod admission;
mod bypass_queue;
mod staging;

pub use admission::{Admission, AdmissionController, AdmissionDecision};
pub use bypass_queue::{BypassQueue, QueueStep, BYPASS_QUEUE_CAPACITY};
pub use staging::StagingRegister;

use log::{debug, error, warn};

use crate::{
    ConfigError, GenericSram, MemRequest, MemResponse, MinionConfig, NullTraceSink, PipelineDiag,
    ProtocolViolation, Sram, TraceEvent, TraceSink,
};

/// Signals driven into the minion for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StepInputs {
    /// Producer request; `Some` means the request valid signal is high.
    pub request: Option<MemRequest>,
    /// Consumer ready signal.
    pub response_ready: bool,
    /// Synchronous reset.
    pub reset: bool,
}

impl StepInputs {
    /// Inputs for a normal step.
    #[must_use]
    pub const fn new(request: Option<MemRequest>, response_ready: bool) -> Self {
        Self {
            request,
            response_ready,
            reset: false,
        }
    }

    /// Inputs for a reset step.
    #[must_use]
    pub const fn reset() -> Self {
        Self {
            request: None,
            response_ready: false,
            reset: true,
        }
    }
}

/// Signals the minion drove during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StepOutputs {
    /// Ready returned to the producer.
    pub request_ready: bool,
    /// What happened to the presented request.
    pub admission: Admission,
    /// Response presented to the consumer; `Some` means response valid.
    pub response: Option<MemResponse>,
    /// True when the consumer took `response`.
    pub response_fired: bool,
    /// Queue occupancy seen by the admission decision.
    pub occupancy: usize,
}

impl StepOutputs {
    /// Response transferred to the consumer this step.
    #[must_use]
    pub const fn delivered(&self) -> Option<MemResponse> {
        if self.response_fired {
            self.response
        } else {
            None
        }
    }
}

/// Latency-insensitive val/rdy wrapper around a one-step-latency SRAM.
#[derive(Debug, Clone)]
pub struct Minion<S: Sram = GenericSram> {
    config: MinionConfig,
    admission: AdmissionController,
    sram: S,
    m1: StagingRegister,
    queue: BypassQueue<MemResponse>,
    fault: Option<ProtocolViolation>,
    diag: PipelineDiag,
    step: u64,
}

impl Minion<GenericSram> {
    /// Creates a minion around a zeroed [`GenericSram`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for geometries that cannot be modelled.
    pub fn new(config: MinionConfig) -> Result<Self, ConfigError> {
        let sram = GenericSram::new(config.sram)?;
        Self::with_sram(config, sram)
    }
}

impl<S: Sram> Minion<S> {
    /// Creates a minion around a caller-supplied storage model.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for geometries that cannot be modelled.
    pub fn with_sram(config: MinionConfig, sram: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            admission: AdmissionController::new(&config),
            sram,
            m1: StagingRegister::new(),
            queue: BypassQueue::new(),
            fault: None,
            diag: PipelineDiag::new(),
            step: 0,
        })
    }

    /// Configuration this minion was built with.
    #[must_use]
    pub const fn config(&self) -> &MinionConfig {
        &self.config
    }

    /// Storage behind the pipeline.
    #[must_use]
    pub const fn sram(&self) -> &S {
        &self.sram
    }

    /// Mutable storage access for backdoor loads.
    pub fn sram_mut(&mut self) -> &mut S {
        &mut self.sram
    }

    /// Activity counters since the last reset.
    #[must_use]
    pub const fn diag(&self) -> &PipelineDiag {
        &self.diag
    }

    /// Steps ticked since construction, reset steps included.
    #[must_use]
    pub const fn step_count(&self) -> u64 {
        self.step
    }

    /// Committed queue occupancy.
    #[must_use]
    pub const fn occupancy(&self) -> usize {
        self.queue.occupancy()
    }

    /// Ready the producer will see on the next step.
    #[must_use]
    pub const fn request_ready(&self) -> bool {
        self.fault.is_none() && self.queue.is_empty()
    }

    /// Latched protocol violation, if any.
    #[must_use]
    pub const fn latched_fault(&self) -> Option<ProtocolViolation> {
        self.fault
    }

    /// True when nothing is in flight in M1 or buffered.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.m1.is_valid() && self.queue.is_empty()
    }

    /// One-column pipeline trace: `*` while M1 holds a request, then the
    /// queue occupancy.
    #[must_use]
    pub fn line_trace(&self) -> String {
        let m1 = if self.m1.is_valid() { '*' } else { ' ' };
        format!("{m1}{}", self.queue.occupancy())
    }

    /// Clears every pipeline register, the queue, the counters and any
    /// latched fault. Storage contents are kept.
    pub fn reset(&mut self) {
        debug!("minion reset at step {}", self.step);
        self.m1.clear();
        self.queue.clear();
        self.fault = None;
        self.diag.reset();
    }

    /// Advances one step without tracing.
    ///
    /// # Errors
    ///
    /// See [`Self::tick_traced`].
    pub fn tick(&mut self, inputs: &StepInputs) -> Result<StepOutputs, ProtocolViolation> {
        self.tick_traced(inputs, &mut NullTraceSink)
    }

    /// Advances one step, sending events to `sink` when tracing is enabled.
    ///
    /// # Errors
    ///
    /// Returns the [`ProtocolViolation`] that latched this step, or the one
    /// latched earlier; nothing is committed in either case. Only a reset
    /// step clears it.
    pub fn tick_traced(
        &mut self,
        inputs: &StepInputs,
        sink: &mut dyn TraceSink,
    ) -> Result<StepOutputs, ProtocolViolation> {
        let step = self.step;
        let tracing = self.config.tracing_enabled;
        let mut emit = |event: TraceEvent| {
            if tracing {
                sink.on_event(event);
            }
        };

        if inputs.reset {
            self.reset();
            self.step += 1;
            emit(TraceEvent::Reset { step });
            let admission = self
                .admission
                .evaluate(inputs.request.as_ref(), 0, true)
                .admission;
            return Ok(StepOutputs {
                admission,
                ..StepOutputs::default()
            });
        }

        if let Some(violation) = self.fault {
            return Err(violation);
        }

        // Evaluate.
        let occupancy = self.queue.occupancy();
        let staged = self.m1.response(self.sram.rdata());
        let decision = self
            .admission
            .evaluate(inputs.request.as_ref(), occupancy, false);
        let response = self.queue.peek(staged);

        if decision.admission.is_accepted() && occupancy != 0 {
            return Err(self.latch_fault(
                ProtocolViolation::AdmissionWhileOccupied { occupancy },
                &mut emit,
            ));
        }

        // Commit.
        let queue_step = match self.queue.step(staged, inputs.response_ready) {
            Ok(queue_step) => queue_step,
            Err(violation) => return Err(self.latch_fault(violation, &mut emit)),
        };
        self.sram.clock(&decision.port);
        let admitted = inputs.request.filter(|_| decision.admission.is_accepted());
        self.m1.latch(admitted);
        self.step += 1;

        self.diag.record_step();
        self.diag.record_occupancy(self.queue.occupancy());

        if let Some(resp) = staged {
            emit(TraceEvent::ResponseStaged {
                step,
                opaque: resp.opaque,
            });
        }
        if let Some(resp) = queue_step.delivered {
            self.diag.record_delivery(queue_step.bypassed);
            emit(TraceEvent::ResponseDelivered {
                step,
                opaque: resp.opaque,
                bypassed: queue_step.bypassed,
            });
        } else if response.is_some() {
            self.diag.record_consumer_stall();
        }
        if queue_step.enqueued {
            if let Some(resp) = staged {
                emit(TraceEvent::ResponseBuffered {
                    step,
                    opaque: resp.opaque,
                    occupancy: self.queue.occupancy(),
                });
            }
        }

        if let Some(req) = inputs.request {
            match decision.admission {
                Admission::Accepted => {
                    self.diag.record_accept();
                    emit(TraceEvent::RequestAccepted {
                        step,
                        opaque: req.opaque,
                        op: req.op,
                        index: decision.port.index,
                    });
                }
                Admission::Stalled => {
                    self.diag.record_producer_stall();
                    emit(TraceEvent::RequestStalled {
                        step,
                        opaque: req.opaque,
                        occupancy,
                    });
                }
                Admission::Rejected(error) => {
                    warn!("step {step}: rejected request {req}: {error}");
                    self.diag.record_reject();
                    emit(TraceEvent::RequestRejected {
                        step,
                        opaque: req.opaque,
                        error,
                    });
                }
                Admission::Idle => {}
            }
        }

        Ok(StepOutputs {
            request_ready: decision.ready,
            admission: decision.admission,
            response,
            response_fired: queue_step.delivered.is_some(),
            occupancy,
        })
    }

    fn latch_fault(
        &mut self,
        violation: ProtocolViolation,
        emit: &mut impl FnMut(TraceEvent),
    ) -> ProtocolViolation {
        error!("step {}: protocol violation: {violation}", self.step);
        self.fault = Some(violation);
        emit(TraceEvent::FaultRaised {
            step: self.step,
            violation,
        });
        violation
    }
}
