//! Deterministic trace events emitted in commit order.

use crate::{Operation, ProtocolViolation, RequestError};

/// Events recorded at step boundaries when tracing is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceEvent {
    /// Reset was asserted.
    Reset {
        /// Step index.
        step: u64,
    },
    /// M1 held a request and produced its response.
    ResponseStaged {
        /// Step index.
        step: u64,
        /// Tag of the staged response.
        opaque: u8,
    },
    /// The consumer took a response.
    ResponseDelivered {
        /// Step index.
        step: u64,
        /// Tag of the delivered response.
        opaque: u8,
        /// True when the response cut through an empty queue.
        bypassed: bool,
    },
    /// A staged response was written into the queue.
    ResponseBuffered {
        /// Step index.
        step: u64,
        /// Tag of the buffered response.
        opaque: u8,
        /// Occupancy after the commit.
        occupancy: usize,
    },
    /// M0 admitted a request and drove the SRAM.
    RequestAccepted {
        /// Step index.
        step: u64,
        /// Request tag.
        opaque: u8,
        /// Request operation.
        op: Operation,
        /// SRAM word index driven.
        index: u32,
    },
    /// M0 held a valid request off because responses were buffered.
    RequestStalled {
        /// Step index.
        step: u64,
        /// Request tag.
        opaque: u8,
        /// Occupancy that caused the stall.
        occupancy: usize,
    },
    /// M0 refused a malformed request.
    RequestRejected {
        /// Step index.
        step: u64,
        /// Request tag.
        opaque: u8,
        /// Reason for refusal.
        error: RequestError,
    },
    /// A protocol violation latched the pipeline.
    FaultRaised {
        /// Step index.
        step: u64,
        /// Latched violation.
        violation: ProtocolViolation,
    },
}

/// Sink for [`TraceEvent`]s.
pub trait TraceSink {
    /// Records an event in commit order.
    fn on_event(&mut self, event: TraceEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn on_event(&mut self, _event: TraceEvent) {}
}

/// Sink that keeps every event in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VecTraceSink {
    /// Recorded events.
    pub events: Vec<TraceEvent>,
}

impl TraceSink for VecTraceSink {
    fn on_event(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
