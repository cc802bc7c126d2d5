use thiserror::Error;

/// Default SRAM word width in bits.
pub const DEFAULT_DATA_BITS: u32 = 32;

/// Default number of SRAM words.
pub const DEFAULT_NUM_ENTRIES: u32 = 128;

/// Widest word the model can hold.
pub const MAX_DATA_BITS: u32 = 128;

/// Largest supported number of write-byte-enable bits.
pub const MAX_MASK_SIZE: u32 = 16;

/// Rejected configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ConfigError {
    /// Word width is not a power-of-two byte count between 8 and 128 bits.
    #[error("unsupported word width of {0} bits")]
    DataWidth(u32),
    /// Entry count is zero or not a power of two.
    #[error("unsupported entry count {0}; must be a non-zero power of two")]
    EntryCount(u32),
    /// Byte-enable mask does not evenly slice the word.
    #[error("write mask of {mask_size} bits does not evenly divide a {data_bits}-bit word")]
    MaskSize {
        /// Requested number of write-enable bits.
        mask_size: u32,
        /// Configured word width.
        data_bits: u32,
    },
}

/// Geometry of a single-port SRAM macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SramConfig {
    /// Word width in bits.
    pub data_bits: u32,
    /// Number of addressable words.
    pub num_entries: u32,
    /// Number of write-byte-enable bits; zero disables masked writes.
    pub mask_size: u32,
}

impl Default for SramConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_BITS, DEFAULT_NUM_ENTRIES)
    }
}

impl SramConfig {
    /// Creates an unmasked geometry.
    #[must_use]
    pub const fn new(data_bits: u32, num_entries: u32) -> Self {
        Self {
            data_bits,
            num_entries,
            mask_size: 0,
        }
    }

    /// Returns this geometry with `mask_size` write-enable bits.
    #[must_use]
    pub const fn with_mask(mut self, mask_size: u32) -> Self {
        self.mask_size = mask_size;
        self
    }

    /// Checks that the geometry can be modelled.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in width, entry count, then mask.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        let data_bits = self.data_bits;
        if data_bits < 8
            || data_bits > MAX_DATA_BITS
            || data_bits % 8 != 0
            || !(data_bits / 8).is_power_of_two()
        {
            return Err(ConfigError::DataWidth(data_bits));
        }

        if !self.num_entries.is_power_of_two() {
            return Err(ConfigError::EntryCount(self.num_entries));
        }

        let mask_size = self.mask_size;
        if mask_size > MAX_MASK_SIZE || (mask_size != 0 && data_bits % mask_size != 0) {
            return Err(ConfigError::MaskSize {
                mask_size,
                data_bits,
            });
        }

        Ok(())
    }

    /// Bytes per word.
    #[must_use]
    pub const fn word_bytes(&self) -> u32 {
        self.data_bits / 8
    }

    /// Low address bits selecting a byte within a word.
    #[must_use]
    pub const fn offset_bits(&self) -> u32 {
        self.word_bytes().trailing_zeros()
    }

    /// Address bits selecting a word.
    #[must_use]
    pub const fn index_bits(&self) -> u32 {
        self.num_entries.trailing_zeros()
    }

    /// Mask covering every data bit of a word.
    #[must_use]
    pub const fn data_mask(&self) -> u128 {
        low_mask(self.data_bits)
    }

    /// Write-enable value selecting every slice of the word.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn full_wben(&self) -> u16 {
        low_mask(self.mask_size) as u16
    }
}

/// Top-level configuration for a [`crate::Minion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MinionConfig {
    /// Geometry of the SRAM behind the pipeline.
    pub sram: SramConfig,
    /// Reject addresses beyond the SRAM instead of folding them onto it.
    pub strict_addressing: bool,
    /// Enables trace event dispatch to the supplied [`crate::TraceSink`].
    pub tracing_enabled: bool,
}

impl MinionConfig {
    /// Creates a configuration around `sram` with default policies.
    #[must_use]
    pub const fn with_sram(sram: SramConfig) -> Self {
        Self {
            sram,
            strict_addressing: false,
            tracing_enabled: false,
        }
    }

    /// Checks that the configuration can be modelled.
    ///
    /// # Errors
    ///
    /// Propagates [`SramConfig::validate`] failures.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        self.sram.validate()
    }
}

/// Mask with the low `bits` bits set, saturating at 128.
pub(crate) const fn low_mask(bits: u32) -> u128 {
    if bits >= u128::BITS {
        u128::MAX
    } else {
        (1_u128 << bits) - 1
    }
}
