use super::constants::*;
use super::error::DataMaskError;

/// A single field of a list-mode event header: a mask over one 32-bit word
/// and the offset of the field's least significant bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub mask: u32,
    pub offset: u32,
}

impl BitField {
    pub const fn new(mask: u32, offset: u32) -> Self {
        Self { mask, offset }
    }

    /// Pull the field's value out of a header word
    pub fn extract(&self, word: u32) -> u32 {
        (word & self.mask) >> self.offset
    }
}

/// ListModeDataMask parameterizes list-mode decoding by the module's ADC
/// sampling frequency (MSPS) and firmware revision.
///
/// The 4-word event header is mostly stable across hardware generations, but
/// the CFD fields of word 2 and the energy field of word 3 moved as firmware
/// evolved. The mask is constructed once per run and shared (it is Copy) with
/// every decode worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListModeDataMask {
    frequency: u32,
    revision: u32,
}

impl ListModeDataMask {
    /// Create a mask for a given sampling frequency and firmware revision.
    /// Fails if the frequency is not one of the shipped ADC variants or the
    /// revision predates the supported header layout.
    pub fn new(frequency: u32, revision: u32) -> Result<Self, DataMaskError> {
        if !VALID_FREQUENCIES.contains(&frequency) {
            return Err(DataMaskError::BadFrequency(frequency));
        }
        if revision < MIN_REVISION {
            return Err(DataMaskError::BadRevision(revision));
        }
        Ok(Self {
            frequency,
            revision,
        })
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    // Word 0

    pub fn channel(&self) -> BitField {
        BitField::new(0xF, 0)
    }

    pub fn slot(&self) -> BitField {
        BitField::new(0xF0, 4)
    }

    pub fn crate_id(&self) -> BitField {
        BitField::new(0xF00, 8)
    }

    pub fn header_length(&self) -> BitField {
        BitField::new(0x1F000, 12)
    }

    pub fn event_length(&self) -> BitField {
        BitField::new(0x7FFE_0000, 17)
    }

    pub fn finish_code(&self) -> BitField {
        BitField::new(0x8000_0000, 31)
    }

    // Words 1 and 2

    pub fn event_time_low(&self) -> BitField {
        BitField::new(0xFFFF_FFFF, 0)
    }

    pub fn event_time_high(&self) -> BitField {
        BitField::new(0xFFFF, 0)
    }

    /// The CFD fractional time occupies the upper half of word 2, losing one
    /// bit per frequency doubling to the trigger-source bits.
    pub fn cfd_fractional_time(&self) -> BitField {
        match self.frequency {
            250 => {
                if self.revision >= REV_FORCED_TRIGGER {
                    BitField::new(0x3FFF_0000, 16)
                } else {
                    BitField::new(0x7FFF_0000, 16)
                }
            }
            500 => BitField::new(0x1FFF_0000, 16),
            _ => {
                if self.revision >= REV_FORCED_TRIGGER {
                    BitField::new(0x7FFF_0000, 16)
                } else {
                    BitField::new(0xFFFF_0000, 16)
                }
            }
        }
    }

    /// Number of states the fractional time can take; used to convert the raw
    /// value into a fraction of one ADC clock tick
    pub fn cfd_size(&self) -> u32 {
        let field = self.cfd_fractional_time();
        (field.mask >> field.offset) + 1
    }

    /// The trigger-source bit(s), when this frequency has them
    pub fn cfd_trigger_source(&self) -> Option<BitField> {
        match self.frequency {
            250 => {
                if self.revision >= REV_FORCED_TRIGGER {
                    Some(BitField::new(0x4000_0000, 30))
                } else {
                    Some(BitField::new(0x8000_0000, 31))
                }
            }
            500 => Some(BitField::new(0xE000_0000, 29)),
            _ => None,
        }
    }

    /// The forced-trigger flag, present on 100 and 250 MSPS variants for
    /// revisions that carry it
    pub fn cfd_forced_trigger(&self) -> Option<BitField> {
        if self.revision < REV_FORCED_TRIGGER || self.frequency == 500 {
            return None;
        }
        Some(BitField::new(0x8000_0000, 31))
    }

    // Word 3

    pub fn energy(&self) -> BitField {
        if self.revision >= REV_ENERGY_NARROWED {
            BitField::new(0x7FFF, 0)
        } else {
            BitField::new(0xFFFF, 0)
        }
    }

    /// The energy-filter out-of-range flag took over bit 15 of word 3 when
    /// the energy field narrowed
    pub fn energy_out_of_range(&self) -> Option<BitField> {
        if self.revision >= REV_ENERGY_NARROWED {
            Some(BitField::new(0x8000, 15))
        } else {
            None
        }
    }

    pub fn trace_length(&self) -> BitField {
        BitField::new(0x7FFF_0000, 16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_parameters() {
        assert!(ListModeDataMask::new(300, 30474).is_err());
        assert!(ListModeDataMask::new(250, 1000).is_err());
        assert!(ListModeDataMask::new(250, 30474).is_ok());
    }

    #[test]
    fn test_word_zero_fields() {
        let mask = ListModeDataMask::new(250, 30474).unwrap();
        // channel 5, slot 2, crate 1, header length 4, event length 4, finish code set
        let word: u32 = 5 | (2 << 4) | (1 << 8) | (4 << 12) | (4 << 17) | 0x8000_0000;
        assert_eq!(mask.channel().extract(word), 5);
        assert_eq!(mask.slot().extract(word), 2);
        assert_eq!(mask.crate_id().extract(word), 1);
        assert_eq!(mask.header_length().extract(word), 4);
        assert_eq!(mask.event_length().extract(word), 4);
        assert_eq!(mask.finish_code().extract(word), 1);
    }

    #[test]
    fn test_cfd_by_frequency() {
        let m100 = ListModeDataMask::new(100, 30474).unwrap();
        let m250 = ListModeDataMask::new(250, 30474).unwrap();
        let m500 = ListModeDataMask::new(500, 30474).unwrap();
        assert_eq!(m100.cfd_size(), 1 << 15);
        assert_eq!(m250.cfd_size(), 1 << 14);
        assert_eq!(m500.cfd_size(), 1 << 13);
        assert!(m100.cfd_trigger_source().is_none());
        assert!(m250.cfd_trigger_source().is_some());
        assert!(m500.cfd_forced_trigger().is_none());
        assert!(m250.cfd_forced_trigger().is_some());
    }

    #[test]
    fn test_cfd_by_revision() {
        let old = ListModeDataMask::new(100, 20466).unwrap();
        assert_eq!(old.cfd_size(), 1 << 16);
        assert!(old.cfd_forced_trigger().is_none());
    }

    #[test]
    fn test_energy_by_revision() {
        let old = ListModeDataMask::new(250, 20466).unwrap();
        let new = ListModeDataMask::new(250, 30474).unwrap();
        assert_eq!(old.energy().extract(0xFFFF), 0xFFFF);
        assert!(old.energy_out_of_range().is_none());
        assert_eq!(new.energy().extract(0xFFFF), 0x7FFF);
        assert_eq!(new.energy_out_of_range().unwrap().extract(0xFFFF), 1);
    }
}
