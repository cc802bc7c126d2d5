//! Packed bit layout of the standard memory messages.
//!
//! Fields are packed most-significant first:
//!
//! ```text
//! request  : type(4) | opaque(8) | addr(32) | len(L) | data(D)
//! response : type(4) | opaque(8) | test(2)  | len(L) | data(D)
//! ```
//!
//! where `D` is the word width and `L = log2(D / 8)`.

use thiserror::Error;

use crate::config::low_mask;
use crate::{MemRequest, MemResponse, Operation};

/// Width of the message type field.
pub const TYPE_BITS: u32 = 4;
/// Width of the opaque tag field.
pub const OPAQUE_BITS: u32 = 8;
/// Width of the request address field.
pub const ADDR_BITS: u32 = 32;
/// Width of the response test field.
pub const TEST_BITS: u32 = 2;

/// Type code for reads.
pub const TYPE_READ: u8 = 0;
/// Type code for writes.
pub const TYPE_WRITE: u8 = 1;

/// Encode/decode failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CodecError {
    /// Type code is not a read or a write (e.g. init or an AMO).
    #[error("unsupported memory operation code {code}")]
    UnsupportedOperation {
        /// Raw type field value.
        code: u8,
    },
    /// A field value does not fit its slot in the layout.
    #[error("{field} value {value:#x} does not fit in {bits} bits")]
    FieldOverflow {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: u128,
        /// Slot width.
        bits: u32,
    },
    /// The packed message would not fit in 128 bits.
    #[error("{data_bits}-bit data produces a {total_bits}-bit message wider than 128 bits")]
    FormatTooWide {
        /// Requested data width.
        data_bits: u32,
        /// Resulting request width.
        total_bits: u32,
    },
    /// The word width is not a power-of-two byte count.
    #[error("data width of {0} bits has no length field encoding")]
    DataWidth(u32),
}

impl Operation {
    /// Wire type code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Read => TYPE_READ,
            Self::Write => TYPE_WRITE,
        }
    }

    /// Maps a wire type code to a supported operation.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedOperation`] for any code other than
    /// [`TYPE_READ`] or [`TYPE_WRITE`].
    pub const fn from_code(code: u8) -> Result<Self, CodecError> {
        match code {
            TYPE_READ => Ok(Self::Read),
            TYPE_WRITE => Ok(Self::Write),
            _ => Err(CodecError::UnsupportedOperation { code }),
        }
    }
}

/// Field widths for one data width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MsgFormat {
    data_bits: u32,
    len_bits: u32,
}

impl MsgFormat {
    /// Creates the layout for `data_bits`-wide words.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::DataWidth`] for widths that are not a power-of-two
    /// byte count and [`CodecError::FormatTooWide`] when a request would not
    /// fit in a `u128`.
    pub const fn new(data_bits: u32) -> Result<Self, CodecError> {
        if data_bits < 8 || data_bits % 8 != 0 || !(data_bits / 8).is_power_of_two() {
            return Err(CodecError::DataWidth(data_bits));
        }
        let len_bits = (data_bits / 8).trailing_zeros();
        let total_bits = TYPE_BITS + OPAQUE_BITS + ADDR_BITS + len_bits + data_bits;
        if total_bits > u128::BITS {
            return Err(CodecError::FormatTooWide {
                data_bits,
                total_bits,
            });
        }
        Ok(Self {
            data_bits,
            len_bits,
        })
    }

    /// Word width.
    #[must_use]
    pub const fn data_bits(&self) -> u32 {
        self.data_bits
    }

    /// Width of the length field.
    #[must_use]
    pub const fn len_bits(&self) -> u32 {
        self.len_bits
    }

    /// Total packed request width.
    #[must_use]
    pub const fn request_bits(&self) -> u32 {
        TYPE_BITS + OPAQUE_BITS + ADDR_BITS + self.len_bits + self.data_bits
    }

    /// Total packed response width.
    #[must_use]
    pub const fn response_bits(&self) -> u32 {
        TYPE_BITS + OPAQUE_BITS + TEST_BITS + self.len_bits + self.data_bits
    }

    /// Packs a request.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldOverflow`] when `len` or `data` exceed
    /// their slots.
    pub fn encode_request(&self, req: &MemRequest) -> Result<u128, CodecError> {
        let mut bits = u128::from(req.op.code());
        bits = push_field(bits, u128::from(req.opaque), OPAQUE_BITS, "opaque")?;
        bits = push_field(bits, u128::from(req.addr), ADDR_BITS, "addr")?;
        bits = push_field(bits, u128::from(req.len), self.len_bits, "len")?;
        push_field(bits, req.data, self.data_bits, "data")
    }

    /// Unpacks a request.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldOverflow`] when bits are set above the
    /// request width and [`CodecError::UnsupportedOperation`] for type codes
    /// other than read and write.
    #[allow(clippy::cast_possible_truncation)]
    pub fn decode_request(&self, bits: u128) -> Result<MemRequest, CodecError> {
        check_width(bits, self.request_bits())?;
        let (bits, data) = pop_field(bits, self.data_bits);
        let (bits, len) = pop_field(bits, self.len_bits);
        let (bits, addr) = pop_field(bits, ADDR_BITS);
        let (bits, opaque) = pop_field(bits, OPAQUE_BITS);
        let op = Operation::from_code(bits as u8)?;

        Ok(MemRequest {
            op,
            opaque: opaque as u8,
            addr: addr as u32,
            len: len as u8,
            data,
        })
    }

    /// Packs a response.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldOverflow`] when `test`, `len` or `data`
    /// exceed their slots.
    pub fn encode_response(&self, resp: &MemResponse) -> Result<u128, CodecError> {
        let mut bits = u128::from(resp.op.code());
        bits = push_field(bits, u128::from(resp.opaque), OPAQUE_BITS, "opaque")?;
        bits = push_field(bits, u128::from(resp.test), TEST_BITS, "test")?;
        bits = push_field(bits, u128::from(resp.len), self.len_bits, "len")?;
        push_field(bits, resp.data, self.data_bits, "data")
    }

    /// Unpacks a response.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::decode_request`].
    #[allow(clippy::cast_possible_truncation)]
    pub fn decode_response(&self, bits: u128) -> Result<MemResponse, CodecError> {
        check_width(bits, self.response_bits())?;
        let (bits, data) = pop_field(bits, self.data_bits);
        let (bits, len) = pop_field(bits, self.len_bits);
        let (bits, test) = pop_field(bits, TEST_BITS);
        let (bits, opaque) = pop_field(bits, OPAQUE_BITS);
        let op = Operation::from_code(bits as u8)?;

        Ok(MemResponse {
            op,
            opaque: opaque as u8,
            test: test as u8,
            len: len as u8,
            data,
        })
    }
}

fn push_field(
    bits: u128,
    value: u128,
    width: u32,
    field: &'static str,
) -> Result<u128, CodecError> {
    if value & !low_mask(width) != 0 {
        return Err(CodecError::FieldOverflow {
            field,
            value,
            bits: width,
        });
    }
    if width == 0 {
        return Ok(bits);
    }
    Ok((bits << width) | value)
}

const fn pop_field(bits: u128, width: u32) -> (u128, u128) {
    if width == 0 {
        return (bits, 0);
    }
    (bits >> width, bits & low_mask(width))
}

fn check_width(bits: u128, width: u32) -> Result<(), CodecError> {
    if width < u128::BITS && bits >> width != 0 {
        return Err(CodecError::FieldOverflow {
            field: "message",
            value: bits,
            bits: width,
        });
    }
    Ok(())
}
