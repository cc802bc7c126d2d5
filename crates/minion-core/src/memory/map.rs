//! Byte-address to word-index mapping.

use crate::SramConfig;

/// Strips the byte offset from an address and keeps the word-index bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressMap {
    offset_bits: u32,
    index_bits: u32,
    num_entries: u32,
}

impl AddressMap {
    /// Builds the map for a validated geometry.
    #[must_use]
    pub const fn new(config: &SramConfig) -> Self {
        Self {
            offset_bits: config.offset_bits(),
            index_bits: config.index_bits(),
            num_entries: config.num_entries,
        }
    }

    /// Address bits below the word index.
    #[must_use]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Word-index width.
    #[must_use]
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Word index addressed by `addr`, folded onto the storage.
    #[must_use]
    pub const fn index_of(&self, addr: u32) -> u32 {
        (addr >> self.offset_bits) & (self.num_entries - 1)
    }

    /// True when `addr` names a word without folding.
    #[must_use]
    pub const fn contains(&self, addr: u32) -> bool {
        (addr >> self.offset_bits) < self.num_entries
    }

    /// Byte address of word `index`.
    #[must_use]
    pub const fn addr_of(&self, index: u32) -> u32 {
        (index & (self.num_entries - 1)) << self.offset_bits
    }
}
