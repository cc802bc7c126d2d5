use thiserror::Error;

/// Internal-consistency faults. None is reachable while the admission rule
/// holds; any occurrence is fatal and latches the pipeline until reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ProtocolViolation {
    /// A response arrived while every queue slot was occupied.
    #[error("response enqueued into a full bypass queue (occupancy {occupancy})")]
    BufferOverflow {
        /// Occupancy observed when the enqueue was attempted.
        occupancy: usize,
    },
    /// A dequeue was attempted on an empty queue.
    #[error("response dequeued from an empty bypass queue")]
    BufferUnderflow,
    /// The admission stage accepted a request while responses were buffered.
    #[error("request admitted while the bypass queue holds {occupancy} response(s)")]
    AdmissionWhileOccupied {
        /// Occupancy observed at the accept decision.
        occupancy: usize,
    },
}

/// Reasons a well-typed request is refused at admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RequestError {
    /// Address lies beyond the last word (strict addressing only).
    #[error("address {addr:#010x} is outside the {num_entries}-word storage")]
    AddressOutOfRange {
        /// Offending byte address.
        addr: u32,
        /// Words available.
        num_entries: u32,
    },
    /// Length field does not fit the word's byte count.
    #[error("length {len} is not valid for a {word_bytes}-byte word")]
    LengthOutOfRange {
        /// Offending length.
        len: u8,
        /// Bytes per word.
        word_bytes: u32,
    },
    /// Write data has bits set above the word width.
    #[error("write data {data:#x} does not fit in {data_bits} bits")]
    DataOverflow {
        /// Offending write data.
        data: u128,
        /// Word width.
        data_bits: u32,
    },
}
