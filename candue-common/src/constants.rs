//! Constants defining field limits and special values
//!
//!

/// Limits applied to CAN bus configuration
pub mod can {
    /// Number of independent CAN buses on the board
    pub const BUS_COUNT: usize = 2;
    /// Number of receive acceptance filters configurable per bus
    pub const FILTERS_PER_BUS: usize = 8;
    /// Lowest accepted bus speed, in baud
    pub const MIN_SPEED: u32 = 1;
    /// Highest accepted bus speed, in baud
    pub const MAX_SPEED: u32 = 1_000_000;
    /// Bus speed used by factory defaults
    pub const DEFAULT_SPEED: u32 = 500_000;
}

/// Limits applied to the capture file naming fields
pub mod file {
    /// Maximum number of bytes kept for the file base name
    pub const BASE_LEN: usize = 29;
    /// Maximum number of bytes kept for the file extension
    pub const EXT_LEN: usize = 3;
}

/// Values describing the persisted settings record
pub mod record {
    /// Layout version written into the first byte of every record
    pub const VERSION: u8 = 1;
}
