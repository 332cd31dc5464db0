use thiserror::Error;

/// Reasons an iNES image is rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RomError {
    #[error("iNES file too short ({0} bytes, header needs 16)")]
    TooShort(usize),

    #[error("invalid iNES magic (expected NES\\x1A)")]
    BadMagic,

    #[error("iNES file truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("iNES header declares no PRG-ROM")]
    NoPrgRom,

    #[error("unsupported mapper: {0}")]
    UnsupportedMapper(u8),
}
