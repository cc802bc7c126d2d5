//! M0: request admission and SRAM control.

use crate::{
    validate_request, AddressMap, MemRequest, MinionConfig, Operation, RequestError, SramPort,
};

/// What M0 did with the producer's request this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Admission {
    /// No valid request was presented.
    #[default]
    Idle,
    /// A valid request was held off; the producer must keep presenting it.
    Stalled,
    /// The request entered the pipeline and will yield one response.
    Accepted,
    /// The handshake completed but the request was refused; no response follows.
    Rejected(RequestError),
}

impl Admission {
    /// True when the producer's message was consumed this step.
    #[must_use]
    pub const fn transferred(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected(_))
    }

    /// True when the request entered the pipeline.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Combinational result of one M0 evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdmissionDecision {
    /// Ready signal returned to the producer.
    pub ready: bool,
    /// Outcome for the presented request.
    pub admission: Admission,
    /// SRAM port inputs for this step.
    pub port: SramPort,
}

/// Stateless M0 logic for one pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionController {
    config: MinionConfig,
    map: AddressMap,
}

impl AdmissionController {
    /// Creates the controller for `config`.
    #[must_use]
    pub const fn new(config: &MinionConfig) -> Self {
        Self {
            config: *config,
            map: AddressMap::new(&config.sram),
        }
    }

    /// Address map used to drive the SRAM index.
    #[must_use]
    pub const fn address_map(&self) -> &AddressMap {
        &self.map
    }

    /// Evaluates M0 for one step.
    ///
    /// Ready only when the queue is empty: the one response that may still
    /// be in M1 needs a free slot, and a second slot covers a response the
    /// consumer refuses while this request is in flight.
    #[must_use]
    pub fn evaluate(
        &self,
        request: Option<&MemRequest>,
        occupancy: usize,
        in_reset: bool,
    ) -> AdmissionDecision {
        let ready = !in_reset && occupancy == 0;

        let Some(req) = request else {
            return AdmissionDecision {
                ready,
                admission: Admission::Idle,
                port: SramPort::IDLE,
            };
        };

        if !ready {
            return AdmissionDecision {
                ready,
                admission: Admission::Stalled,
                port: SramPort::IDLE,
            };
        }

        if let Err(error) = validate_request(req, &self.config.sram, self.config.strict_addressing)
        {
            return AdmissionDecision {
                ready,
                admission: Admission::Rejected(error),
                port: SramPort::IDLE,
            };
        }

        let index = self.map.index_of(req.addr);
        let port = match req.op {
            Operation::Read => SramPort::read(index),
            Operation::Write => SramPort::write(index, req.data, self.config.sram.full_wben()),
        };

        AdmissionDecision {
            ready,
            admission: Admission::Accepted,
            port,
        }
    }
}
