//! Memory request/response messages exchanged over the minion interface.

use std::fmt;

/// Memory operation carried by a request and echoed by its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Operation {
    /// Read one word.
    #[default]
    Read,
    /// Write one word.
    Write,
}

impl Operation {
    /// Two-letter mnemonic used in line traces.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Read => "rd",
            Self::Write => "wr",
        }
    }
}

/// A producer-issued memory request. Immutable once issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MemRequest {
    /// Requested operation.
    pub op: Operation,
    /// Opaque correlation tag returned unchanged in the response.
    pub opaque: u8,
    /// Byte address.
    pub addr: u32,
    /// Access length in bytes; zero selects the full word.
    pub len: u8,
    /// Write data; ignored for reads.
    pub data: u128,
}

impl MemRequest {
    /// Full-word read of `addr`.
    #[must_use]
    pub const fn read(opaque: u8, addr: u32) -> Self {
        Self {
            op: Operation::Read,
            opaque,
            addr,
            len: 0,
            data: 0,
        }
    }

    /// Full-word write of `data` to `addr`.
    #[must_use]
    pub const fn write(opaque: u8, addr: u32, data: u128) -> Self {
        Self {
            op: Operation::Write,
            opaque,
            addr,
            len: 0,
            data,
        }
    }

    /// Returns this request with an explicit length field.
    #[must_use]
    pub const fn with_len(mut self, len: u8) -> Self {
        self.len = len;
        self
    }
}

impl fmt::Display for MemRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02x}:{:08x}:{}:{:08x}",
            self.op.mnemonic(),
            self.opaque,
            self.addr,
            self.len,
            self.data
        )
    }
}

/// A response delivered to the consumer, one per accepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MemResponse {
    /// Operation of the originating request.
    pub op: Operation,
    /// Tag of the originating request.
    pub opaque: u8,
    /// Test field of the standard response layout; always zero here.
    pub test: u8,
    /// Length of the originating request.
    pub len: u8,
    /// Read data; zero for write acknowledgements.
    pub data: u128,
}

impl MemResponse {
    /// Read response carrying `data`.
    #[must_use]
    pub const fn read(opaque: u8, data: u128) -> Self {
        Self {
            op: Operation::Read,
            opaque,
            test: 0,
            len: 0,
            data,
        }
    }

    /// Write acknowledgement.
    #[must_use]
    pub const fn write(opaque: u8) -> Self {
        Self {
            op: Operation::Write,
            opaque,
            test: 0,
            len: 0,
            data: 0,
        }
    }

    /// Returns this response with an explicit length field.
    #[must_use]
    pub const fn with_len(mut self, len: u8) -> Self {
        self.len = len;
        self
    }
}

impl fmt::Display for MemResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02x}:{}:{}:{:08x}",
            self.op.mnemonic(),
            self.opaque,
            self.test,
            self.len,
            self.data
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{MemRequest, MemResponse, Operation};

    #[test]
    fn constructors_fill_full_word_defaults() {
        let write = MemRequest::write(3, 0x10, 0xCAFE);
        assert_eq!(write.op, Operation::Write);
        assert_eq!(write.len, 0);
        assert_eq!(MemRequest::read(4, 0x10).data, 0);
        assert_eq!(MemResponse::write(3).data, 0);
        assert_eq!(MemResponse::read(4, 7).with_len(2).len, 2);
    }

    #[test]
    fn display_matches_line_trace_format() {
        assert_eq!(
            MemRequest::write(0, 0, 0xDEAD_BEEF).to_string(),
            "wr:00:00000000:0:deadbeef"
        );
        assert_eq!(
            MemResponse::read(0x1f, 0xDEAD_BEEF).to_string(),
            "rd:1f:0:0:deadbeef"
        );
    }
}
