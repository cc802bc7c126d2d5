//! Storage contract, address mapping and request legality checks.

/// Request legality policy applied at admission.
pub mod access;
/// Byte-address to word-index mapping.
pub mod map;
/// Single-port SRAM contract and behavioural model.
pub mod sram;

pub use access::validate_request;
pub use map::AddressMap;
pub use sram::{GenericSram, Sram, SramPort};
