//! M1: the pipeline register between the SRAM and the response queue.

use crate::{MemRequest, MemResponse, Operation};

/// Holds the request admitted on the previous step, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StagingRegister {
    slot: Option<MemRequest>,
}

impl StagingRegister {
    /// Creates an empty (invalid) register.
    #[must_use]
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// True when a request is in flight in M1.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.slot.is_some()
    }

    /// Request held in M1.
    #[must_use]
    pub const fn request(&self) -> Option<&MemRequest> {
        self.slot.as_ref()
    }

    /// Response for the held request, combining it with this step's SRAM
    /// read data. Writes acknowledge with zero data.
    #[must_use]
    pub fn response(&self, rdata: u128) -> Option<MemResponse> {
        self.slot.map(|req| MemResponse {
            op: req.op,
            opaque: req.opaque,
            test: 0,
            len: req.len,
            data: match req.op {
                Operation::Read => rdata,
                Operation::Write => 0,
            },
        })
    }

    /// Latches next step's contents; `None` when nothing was admitted.
    #[allow(clippy::missing_const_for_fn)]
    pub fn latch(&mut self, admitted: Option<MemRequest>) {
        self.slot = admitted;
    }

    /// Invalidates the register.
    #[allow(clippy::missing_const_for_fn)]
    pub fn clear(&mut self) {
        self.slot = None;
    }
}
