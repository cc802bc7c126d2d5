//! Single-port SRAM contract and the generic behavioural model.

use crate::config::low_mask;
use crate::{ConfigError, SramConfig};

/// Control inputs driven into the SRAM port for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SramPort {
    /// Chip enable.
    pub enable: bool,
    /// Write enable; a read when clear.
    pub write_enable: bool,
    /// Word index.
    pub index: u32,
    /// Write data.
    pub wdata: u128,
    /// Write-byte-enable mask, one bit per slice; ignored by unmasked arrays.
    pub wben: u16,
}

impl SramPort {
    /// Port with every control deasserted.
    pub const IDLE: Self = Self {
        enable: false,
        write_enable: false,
        index: 0,
        wdata: 0,
        wben: 0,
    };

    /// Read of word `index`.
    #[must_use]
    pub const fn read(index: u32) -> Self {
        Self {
            enable: true,
            write_enable: false,
            index,
            wdata: 0,
            wben: 0,
        }
    }

    /// Write of `wdata` to word `index` under `wben`.
    #[must_use]
    pub const fn write(index: u32, wdata: u128, wben: u16) -> Self {
        Self {
            enable: true,
            write_enable: true,
            index,
            wdata,
            wben,
        }
    }
}

/// One-step-latency single-port storage.
///
/// `clock` applies the port inputs of step *t*; the data of a read issued at
/// *t* is visible through `rdata` during step *t+1*. After any step that was
/// not a read, `rdata` reads as zero.
pub trait Sram {
    /// Registered read data produced by the previous step's access.
    fn rdata(&self) -> u128;

    /// Applies one step's port inputs at the step boundary.
    fn clock(&mut self, port: &SramPort);
}

/// Behavioural model of a generated SRAM macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericSram {
    config: SramConfig,
    ram: Box<[u128]>,
    rdata: u128,
}

impl GenericSram {
    /// Allocates a zeroed array.
    ///
    /// # Errors
    ///
    /// Propagates [`SramConfig::validate`] failures.
    pub fn new(config: SramConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ram: vec![0; config.num_entries as usize].into_boxed_slice(),
            rdata: 0,
        })
    }

    /// Geometry of this array.
    #[must_use]
    pub const fn config(&self) -> &SramConfig {
        &self.config
    }

    /// Backdoor read of word `index`.
    #[must_use]
    pub fn peek(&self, index: u32) -> Option<u128> {
        self.ram.get(index as usize).copied()
    }

    /// Backdoor write of word `index`; returns `false` when out of range.
    pub fn load(&mut self, index: u32, value: u128) -> bool {
        let data_mask = self.config.data_mask();
        self.ram.get_mut(index as usize).map_or(false, |word| {
            *word = value & data_mask;
            true
        })
    }

    /// Whole-array view in index order.
    #[must_use]
    pub fn words(&self) -> &[u128] {
        &self.ram
    }

    fn write_mask(&self, wben: u16) -> u128 {
        let mask_size = self.config.mask_size;
        if mask_size == 0 {
            return self.config.data_mask();
        }

        let slice_bits = self.config.data_bits / mask_size;
        let slice_mask = low_mask(slice_bits);
        (0..mask_size)
            .filter(|bit| wben >> bit & 1 == 1)
            .fold(0, |mask, bit| mask | slice_mask << (bit * slice_bits))
    }
}

impl Sram for GenericSram {
    fn rdata(&self) -> u128 {
        self.rdata
    }

    fn clock(&mut self, port: &SramPort) {
        let index = (port.index & (self.config.num_entries - 1)) as usize;

        self.rdata = if port.enable && !port.write_enable {
            self.ram[index]
        } else {
            0
        };

        if port.enable && port.write_enable {
            let mask = self.write_mask(port.wben);
            let word = &mut self.ram[index];
            *word = (*word & !mask) | (port.wdata & mask);
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{GenericSram, Sram, SramPort};
    use crate::{ConfigError, SramConfig};

    // Each row: port inputs for one step, then the rdata expected during the
    // following step (`None` = don't care).
    type Vector = (SramPort, Option<u128>);

    fn run_vectors(sram: &mut GenericSram, vectors: &[Vector]) {
        for (step, (port, expected)) in vectors.iter().enumerate() {
            sram.clock(port);
            if let Some(expected) = expected {
                assert_eq!(sram.rdata(), *expected, "rdata after step {step}");
            }
        }
    }

    #[rstest]
    #[case(16, 32, 0xbeef, 0xcafe, 0x0a0a, 0xf)]
    #[case(32, 256, 0xdead_beef, 0xcafe_cafe, 0x0a0a_0a0a, 0x1f)]
    #[case(128, 256, 0xdead_beef, 0xcafe_cafe, 0x0a0a_0a0a, 0x2f)]
    fn directed_one_at_a_time(
        #[case] data_bits: u32,
        #[case] num_entries: u32,
        #[case] a: u128,
        #[case] b: u128,
        #[case] c: u128,
        #[case] high: u32,
    ) {
        let mut sram =
            GenericSram::new(SramConfig::new(data_bits, num_entries)).expect("valid geometry");

        run_vectors(
            &mut sram,
            &[
                (SramPort::write(0, 0, 0), Some(0)),
                (SramPort::read(0), Some(0)),
                (SramPort::IDLE, Some(0)),
                (SramPort::write(0, a, 0), Some(0)),
                (SramPort::read(0), Some(a)),
                (SramPort::write(1, b, 0), Some(0)),
                (SramPort::read(1), Some(b)),
                (SramPort::write(high, c, 0), Some(0)),
                (SramPort::read(high), Some(c)),
            ],
        );
    }

    #[test]
    fn streaming_reads_return_one_step_later() {
        let mut sram = GenericSram::new(SramConfig::new(32, 256)).expect("valid geometry");
        for (index, value) in [(0x00, 0xdead_beef), (0x01, 0xcafe_cafe), (0x1f, 0x0a0a_0a0a)] {
            assert!(sram.load(index, value));
        }
        sram.load(0x1e, 0x0b0b_0b0b);

        run_vectors(
            &mut sram,
            &[
                (SramPort::read(0x1e), Some(0x0b0b_0b0b)),
                (SramPort::read(0x1f), Some(0x0a0a_0a0a)),
                (SramPort::read(0x01), Some(0xcafe_cafe)),
                (SramPort::read(0x00), Some(0xdead_beef)),
                (SramPort::IDLE, Some(0)),
            ],
        );
    }

    #[test]
    fn interleaved_writes_and_reads() {
        let mut sram = GenericSram::new(SramConfig::new(32, 256)).expect("valid geometry");
        run_vectors(
            &mut sram,
            &[
                (SramPort::write(0x1d, 0x0c0c_0c0c, 0), None),
                (SramPort::read(0x1d), Some(0x0c0c_0c0c)),
                (SramPort::write(0x1c, 0x0d0d_0d0d, 0), Some(0)),
                (SramPort::read(0x1c), Some(0x0d0d_0d0d)),
            ],
        );
    }

    #[test]
    fn masked_write_only_touches_enabled_slices() {
        let config = SramConfig::new(128, 256).with_mask(4);
        let mut sram = GenericSram::new(config).expect("valid geometry");
        sram.load(0, 0x1111_1111_2222_2222_3333_3333_4444_4444);

        sram.clock(&SramPort::write(0, u128::MAX, 0b0001));
        assert_eq!(
            sram.peek(0),
            Some(0x1111_1111_2222_2222_3333_3333_FFFF_FFFF)
        );

        sram.clock(&SramPort::write(0, 0, 0b1010));
        assert_eq!(
            sram.peek(0),
            Some(0x0000_0000_2222_2222_0000_0000_FFFF_FFFF)
        );

        sram.clock(&SramPort::write(0, 0, 0));
        assert_eq!(
            sram.peek(0),
            Some(0x0000_0000_2222_2222_0000_0000_FFFF_FFFF)
        );
    }

    #[test]
    fn unmasked_arrays_ignore_wben() {
        let mut sram = GenericSram::new(SramConfig::default()).expect("valid geometry");
        sram.clock(&SramPort::write(3, 0x1234_5678, 0));
        assert_eq!(sram.peek(3), Some(0x1234_5678));
    }

    #[test]
    fn index_bits_above_the_array_are_dropped() {
        let mut sram = GenericSram::new(SramConfig::new(16, 32)).expect("valid geometry");
        sram.clock(&SramPort::write(32 + 5, 0xabcd, 0));
        assert_eq!(sram.peek(5), Some(0xabcd));
        assert_eq!(sram.peek(32), None);
        assert!(!sram.load(32, 1));
    }

    #[test]
    fn invalid_geometry_is_rejected() {
        assert_eq!(
            GenericSram::new(SramConfig::new(32, 3)),
            Err(ConfigError::EntryCount(3))
        );
    }
}
