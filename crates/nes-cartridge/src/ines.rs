//! iNES header and payload parsing.

use log::{debug, warn};

use crate::{CHR_BANK_SIZE, Mirroring, PRG_BANK_SIZE, RomError};

const MAGIC: &[u8; 4] = b"NES\x1a";
const HEADER_LEN: usize = 16;
const TRAINER_LEN: usize = 512;

/// A validated iNES image, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomImage {
    pub prg_rom: Vec<u8>,
    /// Empty when the board carries CHR-RAM instead.
    pub chr_rom: Vec<u8>,
    pub mapper_id: u8,
    pub mirroring: Mirroring,
    /// PRG-RAM size in 8 KB units, at least 1.
    pub prg_ram_banks: u8,
    pub has_battery: bool,
}

impl RomImage {
    /// Parse an iNES file.
    ///
    /// # Errors
    ///
    /// Rejects short or truncated data, a wrong magic number and images
    /// without PRG-ROM. The mapper number is not checked here.
    pub fn parse(data: &[u8]) -> Result<Self, RomError> {
        if data.len() < HEADER_LEN {
            return Err(RomError::TooShort(data.len()));
        }
        if &data[0..4] != MAGIC {
            return Err(RomError::BadMagic);
        }

        let prg_banks = data[4];
        let chr_banks = data[5];
        let flags6 = data[6];
        let flags7 = data[7];
        if prg_banks == 0 {
            return Err(RomError::NoPrgRom);
        }

        let mapper_id = (flags7 & 0xF0) | (flags6 >> 4);
        if flags6 & 0x08 != 0 {
            warn!("cartridge: four-screen VRAM requested; using header mirroring bit");
        }
        let mirroring = if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };
        let has_battery = flags6 & 0x02 != 0;
        let has_trainer = flags6 & 0x04 != 0;

        let prg_size = usize::from(prg_banks) * PRG_BANK_SIZE;
        let chr_size = usize::from(chr_banks) * CHR_BANK_SIZE;
        let prg_start = HEADER_LEN + if has_trainer { TRAINER_LEN } else { 0 };
        let chr_start = prg_start + prg_size;
        let expected = chr_start + chr_size;
        if data.len() < expected {
            return Err(RomError::Truncated {
                expected,
                actual: data.len(),
            });
        }

        debug!(
            "cartridge: mapper {mapper_id}, {prg_banks}x16K PRG, {chr_banks}x8K CHR, {mirroring:?}"
        );

        Ok(Self {
            prg_rom: data[prg_start..chr_start].to_vec(),
            chr_rom: data[chr_start..expected].to_vec(),
            mapper_id,
            mirroring,
            prg_ram_banks: data[8].max(1),
            has_battery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(prg: u8, chr: u8, flags6: u8, flags7: u8) -> Vec<u8> {
        let mut data = vec![0u8; 16];
        data[0..4].copy_from_slice(MAGIC);
        data[4] = prg;
        data[5] = chr;
        data[6] = flags6;
        data[7] = flags7;
        data
    }

    fn image(prg: u8, chr: u8, flags6: u8, flags7: u8) -> Vec<u8> {
        let mut data = header(prg, chr, flags6, flags7);
        if flags6 & 0x04 != 0 {
            data.extend(std::iter::repeat_n(0xEE, TRAINER_LEN));
        }
        data.extend(std::iter::repeat_n(0x11, usize::from(prg) * PRG_BANK_SIZE));
        data.extend(std::iter::repeat_n(0x22, usize::from(chr) * CHR_BANK_SIZE));
        data
    }

    #[test]
    fn parses_sizes_and_mirroring() {
        let rom = RomImage::parse(&image(2, 1, 0x01, 0)).unwrap();
        assert_eq!(rom.prg_rom.len(), 2 * PRG_BANK_SIZE);
        assert_eq!(rom.chr_rom.len(), CHR_BANK_SIZE);
        assert_eq!(rom.mirroring, Mirroring::Vertical);
        assert_eq!(rom.mapper_id, 0);
        assert_eq!(rom.prg_ram_banks, 1);
    }

    #[test]
    fn mapper_number_combines_both_nibbles() {
        let rom = RomImage::parse(&image(1, 1, 0x20, 0x40)).unwrap();
        assert_eq!(rom.mapper_id, 0x42);
    }

    #[test]
    fn trainer_is_skipped() {
        let rom = RomImage::parse(&image(1, 0, 0x04, 0)).unwrap();
        assert!(rom.prg_rom.iter().all(|&b| b == 0x11));
        assert!(rom.chr_rom.is_empty());
    }

    #[test]
    fn prg_ram_size_from_byte_8() {
        let mut data = image(1, 1, 0x02, 0);
        data[8] = 4;
        let rom = RomImage::parse(&data).unwrap();
        assert_eq!(rom.prg_ram_banks, 4);
        assert!(rom.has_battery);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(RomImage::parse(&[0; 8]), Err(RomError::TooShort(8)));
        assert_eq!(RomImage::parse(&[0; 32]), Err(RomError::BadMagic));
        assert_eq!(RomImage::parse(&header(0, 1, 0, 0)), Err(RomError::NoPrgRom));
        let mut data = image(1, 1, 0, 0);
        data.truncate(100);
        assert_eq!(
            RomImage::parse(&data),
            Err(RomError::Truncated {
                expected: 16 + PRG_BANK_SIZE + CHR_BANK_SIZE,
                actual: 100
            })
        );
    }
}
