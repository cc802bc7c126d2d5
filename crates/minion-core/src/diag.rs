//! Saturating activity counters for one pipeline instance.

/// Pipeline activity counters, cleared on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PipelineDiag {
    /// Steps evaluated since reset, excluding reset steps.
    pub steps: u64,
    /// Requests admitted into the pipeline.
    pub accepted: u64,
    /// Requests refused as malformed.
    pub rejected: u64,
    /// Responses handed to the consumer.
    pub delivered: u64,
    /// Deliveries that cut through an empty queue.
    pub bypassed: u64,
    /// Steps where a valid request was held off by backpressure.
    pub producer_stalls: u64,
    /// Steps where a valid response waited on the consumer.
    pub consumer_stalls: u64,
    /// Highest queue occupancy committed since reset.
    pub peak_occupancy: usize,
}

impl PipelineDiag {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests admitted but not yet delivered.
    #[must_use]
    pub const fn in_flight(&self) -> u64 {
        self.accepted.saturating_sub(self.delivered)
    }

    #[allow(clippy::missing_const_for_fn)]
    pub(crate) fn record_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    #[allow(clippy::missing_const_for_fn)]
    pub(crate) fn record_accept(&mut self) {
        self.accepted = self.accepted.saturating_add(1);
    }

    #[allow(clippy::missing_const_for_fn)]
    pub(crate) fn record_reject(&mut self) {
        self.rejected = self.rejected.saturating_add(1);
    }

    #[allow(clippy::missing_const_for_fn)]
    pub(crate) fn record_delivery(&mut self, bypassed: bool) {
        self.delivered = self.delivered.saturating_add(1);
        if bypassed {
            self.bypassed = self.bypassed.saturating_add(1);
        }
    }

    #[allow(clippy::missing_const_for_fn)]
    pub(crate) fn record_producer_stall(&mut self) {
        self.producer_stalls = self.producer_stalls.saturating_add(1);
    }

    #[allow(clippy::missing_const_for_fn)]
    pub(crate) fn record_consumer_stall(&mut self) {
        self.consumer_stalls = self.consumer_stalls.saturating_add(1);
    }

    pub(crate) fn record_occupancy(&mut self, occupancy: usize) {
        self.peak_occupancy = self.peak_occupancy.max(occupancy);
    }

    /// Clears every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
