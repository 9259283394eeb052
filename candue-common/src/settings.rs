//! The configurable device settings
//!
//! [`Settings`] is the aggregate edited by the serial console and written to non-volatile storage
//! as a whole whenever it changes.

use heapless::String;

use crate::constants::{can, file};

/// One of the two CAN controllers on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bus {
    /// The first CAN controller
    Can0,
    /// The second CAN controller
    Can1,
}

impl Bus {
    /// All buses, in index order
    pub const ALL: [Bus; can::BUS_COUNT] = [Bus::Can0, Bus::Can1];

    /// Get the zero-based index of the bus
    pub const fn index(self) -> usize {
        match self {
            Bus::Can0 => 0,
            Bus::Can1 => 1,
        }
    }

    /// Get the bus for a zero-based index, if it is in range
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Bus::Can0),
            1 => Some(Bus::Can1),
            _ => None,
        }
    }
}

impl core::fmt::Display for Bus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "CAN{}", self.index())
    }
}

/// Verbosity of the device log
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LogLevel {
    /// Log everything
    Debug = 0,
    /// Informational messages and above
    Info = 1,
    /// Warnings and errors
    Warn = 2,
    /// Errors only
    Error = 3,
    /// Logging disabled
    Off = 4,
}

impl LogLevel {
    /// Convert the numeric level used on the console and in storage
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Debug),
            1 => Some(Self::Info),
            2 => Some(Self::Warn),
            3 => Some(Self::Error),
            4 => Some(Self::Off),
            _ => None,
        }
    }

    /// The numeric value of the level
    pub fn raw(self) -> u8 {
        self as u8
    }

    /// A lower case name for the level
    pub fn name(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warning",
            Self::Error => "error",
            Self::Off => "off",
        }
    }
}

#[cfg(feature = "log")]
#[cfg_attr(docsrs, doc(cfg(feature = "log")))]
impl From<LogLevel> for log::LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// The board variant the firmware is running on
///
/// A change only takes effect after a power cycle, since the pin assignments are latched at
/// startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SysType {
    /// A CANDue board
    CanDue = 0,
    /// A GEVCU board
    Gevcu = 1,
}

impl SysType {
    /// Convert the numeric board type used on the console and in storage
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::CanDue),
            1 => Some(Self::Gevcu),
            _ => None,
        }
    }

    /// The numeric value of the board type
    pub fn raw(self) -> u8 {
        self as u8
    }
}

/// A receive acceptance filter for one CAN controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FilterRecord {
    /// The ID to match against
    pub id: u32,
    /// Bits of the ID which must match `id`
    pub mask: u32,
    /// Filter matches extended (29-bit) IDs instead of standard (11-bit) IDs
    pub extended: bool,
    /// Filter is applied to the controller at startup
    pub enabled: bool,
}

/// Configuration of one CAN bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusSettings {
    /// Whether the controller is brought up at startup
    pub enabled: bool,
    /// Bus speed in baud
    pub speed: u32,
    /// Receive acceptance filters
    pub filters: [FilterRecord; can::FILTERS_PER_BUS],
}

impl BusSettings {
    /// Create the factory default configuration for a bus
    pub fn new(enabled: bool) -> Self {
        let mut filters = [FilterRecord {
            id: 0,
            mask: 0,
            extended: false,
            enabled: true,
        }; can::FILTERS_PER_BUS];
        // Upper half of the mailboxes default to extended frames
        for filter in filters.iter_mut().skip(can::FILTERS_PER_BUS / 2) {
            filter.extended = true;
        }
        Self {
            enabled,
            speed: can::DEFAULT_SPEED,
            filters,
        }
    }
}

/// Bounded string holding the capture file base name
pub type FileBase = String<{ file::BASE_LEN }>;
/// Bounded string holding the capture file extension
pub type FileExt = String<{ file::EXT_LEN }>;

/// All configurable device settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Active log verbosity
    pub log_level: LogLevel,
    /// Board variant
    pub sys_type: SysType,
    /// Per bus configuration, indexed by [`Bus::index`]
    pub buses: [BusSettings; can::BUS_COUNT],
    /// Send received frames to the serial port in binary rather than ASCII
    pub binary_serial: bool,
    /// Write capture files in binary rather than ASCII
    pub binary_file: bool,
    /// Base name of capture files
    pub file_base: FileBase,
    /// Extension of capture files
    pub file_ext: FileExt,
    /// Next sequence number appended to the capture file name
    pub file_num: i32,
    /// Append to a single capture file instead of numbering new ones
    pub file_append: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            sys_type: SysType::CanDue,
            buses: [BusSettings::new(true), BusSettings::new(false)],
            binary_serial: false,
            binary_file: false,
            file_base: truncated_string("CANBUS"),
            file_ext: truncated_string("TXT"),
            file_num: 1,
            file_append: false,
        }
    }
}

impl Settings {
    /// Get the configuration of a bus
    pub fn bus(&self, bus: Bus) -> &BusSettings {
        &self.buses[bus.index()]
    }

    /// Get a mutable reference to the configuration of a bus
    pub fn bus_mut(&mut self, bus: Bus) -> &mut BusSettings {
        &mut self.buses[bus.index()]
    }
}

/// Copy as much of `text` as fits into a bounded string
///
/// Truncation happens on a character boundary, so the result is always valid UTF-8.
pub fn truncated_string<const N: usize>(text: &str) -> String<N> {
    let mut s = String::new();
    for c in text.chars() {
        if s.push(c).is_err() {
            break;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.bus(Bus::Can0).enabled);
        assert!(!settings.bus(Bus::Can1).enabled);
        assert_eq!(500_000, settings.bus(Bus::Can1).speed);
        assert!(!settings.bus(Bus::Can0).filters[3].extended);
        assert!(settings.bus(Bus::Can0).filters[4].extended);
        assert_eq!("CANBUS", settings.file_base.as_str());
        assert_eq!("TXT", settings.file_ext.as_str());
    }

    #[test]
    fn test_truncated_string() {
        let s: FileExt = truncated_string("JSONL");
        assert_eq!("JSO", s.as_str());
        // Multi-byte character which would straddle the capacity is dropped whole
        let s: String<4> = truncated_string("abcé");
        assert_eq!("abc", s.as_str());
    }

    #[test]
    fn test_level_conversions() {
        assert_eq!(Some(LogLevel::Off), LogLevel::from_raw(4));
        assert_eq!(None, LogLevel::from_raw(5));
        assert_eq!(None, LogLevel::from_raw(-1));
        assert_eq!(Some(SysType::Gevcu), SysType::from_raw(1));
        assert_eq!(None, SysType::from_raw(2));
        assert_eq!(Some(Bus::Can1), Bus::from_index(1));
        assert_eq!(None, Bus::from_index(2));
    }
}
