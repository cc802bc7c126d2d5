//! Request legality policy applied at admission.

use crate::{AddressMap, MemRequest, Operation, RequestError, SramConfig};

/// Checks a request against the storage geometry.
///
/// The length field must name a byte count inside one word and write data
/// must fit the word. Addresses beyond the storage fold onto it unless
/// `strict` is set.
///
/// # Errors
///
/// Returns the first [`RequestError`] found: length, then write data, then
/// (strict only) address range.
pub const fn validate_request(
    req: &MemRequest,
    config: &SramConfig,
    strict: bool,
) -> Result<(), RequestError> {
    let word_bytes = config.word_bytes();
    if req.len as u32 >= word_bytes {
        return Err(RequestError::LengthOutOfRange {
            len: req.len,
            word_bytes,
        });
    }

    if matches!(req.op, Operation::Write) && req.data & !config.data_mask() != 0 {
        return Err(RequestError::DataOverflow {
            data: req.data,
            data_bits: config.data_bits,
        });
    }

    if strict && !AddressMap::new(config).contains(req.addr) {
        return Err(RequestError::AddressOutOfRange {
            addr: req.addr,
            num_entries: config.num_entries,
        });
    }

    Ok(())
}
