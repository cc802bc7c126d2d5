//! Cycle-level model of a latency-insensitive SRAM minion.
//!
//! A producer issues memory requests over a val/rdy handshake; the minion
//! admits them into a fixed one-step-latency SRAM, stages the result, and
//! hands responses to the consumer through a two-entry bypass queue. Every
//! component is evaluated once per [`Minion::tick`].

/// Pipeline and storage configuration.
pub mod config;
pub use config::{
    ConfigError, MinionConfig, SramConfig, DEFAULT_DATA_BITS, DEFAULT_NUM_ENTRIES, MAX_DATA_BITS,
    MAX_MASK_SIZE,
};

/// Memory request/response message types.
pub mod message;
pub use message::{MemRequest, MemResponse, Operation};

/// Packed bit-level encoding of memory messages.
pub mod codec;
pub use codec::{
    CodecError, MsgFormat, ADDR_BITS, OPAQUE_BITS, TEST_BITS, TYPE_BITS, TYPE_READ, TYPE_WRITE,
};

/// Fault taxonomy for protocol violations and malformed requests.
pub mod fault;
pub use fault::{ProtocolViolation, RequestError};

/// Storage contract, address mapping and the behavioural SRAM model.
pub mod memory;
pub use memory::{validate_request, AddressMap, GenericSram, Sram, SramPort};

/// Saturating pipeline activity counters.
pub mod diag;
pub use diag::PipelineDiag;

/// Deterministic trace hooks emitted at commit time.
pub mod trace;
pub use trace::{NullTraceSink, TraceEvent, TraceSink, VecTraceSink};

/// The three-stage minion pipeline.
pub mod pipeline;
pub use pipeline::{
    Admission, AdmissionController, AdmissionDecision, BypassQueue, Minion, QueueStep,
    StagingRegister, StepInputs, StepOutputs, BYPASS_QUEUE_CAPACITY,
};

/// Stream source/sink harness and reference model.
pub mod harness;
pub use harness::{
    HarnessError, ReadyPattern, Reference, RunReport, TestHarness, TestSink, TestSource,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
