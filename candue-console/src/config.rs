//! Handling of `KEY=VALUE` configuration commands
//!
//! Keys are matched case-insensitively against a fixed table. The value is read both as an
//! integer and as text, and the table entry decides which reading is used.

use candue_common::{
    constants::can,
    parse_int,
    settings::truncated_string,
    traits::CanController,
    Bus, LogLevel, SysType,
};
use defmt_or_log::debug;
use heapless::Vec;

use crate::{
    board::Board,
    console::Console,
    error::{ConfigError, FilterError},
    line_buffer::LINE_CAPACITY,
};

/// Shortest line treated as a configuration command
///
/// Four key characters, `=`, and at least one value character.
pub const MIN_CONFIG_LEN: usize = 6;

/// The setting addressed by a configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// `CANnEN`
    CanEnable(Bus),
    /// `CANnSPEED`
    CanSpeed(Bus),
    /// `CANnFILTERf`
    CanFilter(Bus, u8),
    /// `BINSERIAL`
    BinSerial,
    /// `BINFILE`
    BinFile,
    /// `FILEBASE`
    FileBase,
    /// `FILEEXT`
    FileExt,
    /// `FILENUM`
    FileNum,
    /// `FILEAPPEND`
    FileAppend,
    /// `SYSTYPE`
    SysType,
    /// `LOGLEVEL`
    LogLevel,
}

static CONFIG_KEYS: [(&str, ConfigKey); 28] = [
    ("CAN0EN", ConfigKey::CanEnable(Bus::Can0)),
    ("CAN1EN", ConfigKey::CanEnable(Bus::Can1)),
    ("CAN0SPEED", ConfigKey::CanSpeed(Bus::Can0)),
    ("CAN1SPEED", ConfigKey::CanSpeed(Bus::Can1)),
    ("CAN0FILTER0", ConfigKey::CanFilter(Bus::Can0, 0)),
    ("CAN0FILTER1", ConfigKey::CanFilter(Bus::Can0, 1)),
    ("CAN0FILTER2", ConfigKey::CanFilter(Bus::Can0, 2)),
    ("CAN0FILTER3", ConfigKey::CanFilter(Bus::Can0, 3)),
    ("CAN0FILTER4", ConfigKey::CanFilter(Bus::Can0, 4)),
    ("CAN0FILTER5", ConfigKey::CanFilter(Bus::Can0, 5)),
    ("CAN0FILTER6", ConfigKey::CanFilter(Bus::Can0, 6)),
    ("CAN0FILTER7", ConfigKey::CanFilter(Bus::Can0, 7)),
    ("CAN1FILTER0", ConfigKey::CanFilter(Bus::Can1, 0)),
    ("CAN1FILTER1", ConfigKey::CanFilter(Bus::Can1, 1)),
    ("CAN1FILTER2", ConfigKey::CanFilter(Bus::Can1, 2)),
    ("CAN1FILTER3", ConfigKey::CanFilter(Bus::Can1, 3)),
    ("CAN1FILTER4", ConfigKey::CanFilter(Bus::Can1, 4)),
    ("CAN1FILTER5", ConfigKey::CanFilter(Bus::Can1, 5)),
    ("CAN1FILTER6", ConfigKey::CanFilter(Bus::Can1, 6)),
    ("CAN1FILTER7", ConfigKey::CanFilter(Bus::Can1, 7)),
    ("BINSERIAL", ConfigKey::BinSerial),
    ("BINFILE", ConfigKey::BinFile),
    ("FILEBASE", ConfigKey::FileBase),
    ("FILEEXT", ConfigKey::FileExt),
    ("FILENUM", ConfigKey::FileNum),
    ("FILEAPPEND", ConfigKey::FileAppend),
    ("SYSTYPE", ConfigKey::SysType),
    ("LOGLEVEL", ConfigKey::LogLevel),
];

impl ConfigKey {
    /// Find the setting for an already upper-cased key
    pub fn lookup(key: &[u8]) -> Option<ConfigKey> {
        CONFIG_KEYS
            .iter()
            .find(|(name, _)| name.as_bytes() == key)
            .map(|(_, k)| *k)
    }

    /// The canonical key text
    pub fn name(&self) -> &'static str {
        CONFIG_KEYS
            .iter()
            .find(|(_, k)| k == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }
}

/// A configuration command split into key and value
#[derive(Debug, Clone)]
pub struct Assignment<'a> {
    key: Vec<u8, LINE_CAPACITY>,
    raw: &'a [u8],
}

impl<'a> Assignment<'a> {
    /// Split `line` at the first `=`
    ///
    /// The key is converted to upper case. Fails if there is no `=`, or nothing after it.
    pub fn parse(line: &'a [u8]) -> Result<Self, ConfigError> {
        let (key, raw) = match line.iter().position(|&b| b == b'=') {
            Some(pos) => (&line[..pos], &line[pos + 1..]),
            None => (line, &line[line.len()..]),
        };
        if raw.is_empty() {
            return Err(ConfigError::MissingValue);
        }
        // A key too long for the buffer can't be in the table
        let mut key = Vec::from_slice(key).map_err(|_| ConfigError::UnknownKey)?;
        key.make_ascii_uppercase();
        Ok(Self { key, raw })
    }

    /// The upper-cased key
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The value exactly as received
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// The value read as an integer, see [`parse_int`]
    pub fn int_value(&self) -> i32 {
        parse_int(self.raw)
    }

    /// The value read as text
    pub fn text_value(&self) -> Result<&'a str, ConfigError> {
        core::str::from_utf8(self.raw).map_err(|_| ConfigError::InvalidText)
    }
}

/// Clamp a value into 0/1 for an on/off setting
fn clamp_flag(value: i32) -> bool {
    value.clamp(0, 1) == 1
}

impl<B: Board> Console<'_, B> {
    /// Process a configuration command line
    ///
    /// The settings are written to storage once if the command changed anything.
    pub(crate) fn handle_config_line(&mut self, line: &[u8]) {
        if line.len() < MIN_CONFIG_LEN {
            debug!("Ignoring {} byte line", line.len());
            return;
        }

        match self.apply_assignment(line) {
            Ok(true) => self.persist(),
            Ok(false) => (),
            Err(e) => console_println!(self.board.console(), "{}", e),
        }
    }

    /// Apply a configuration command, returning whether any setting changed
    fn apply_assignment(&mut self, line: &[u8]) -> Result<bool, ConfigError> {
        let assignment = Assignment::parse(line)?;
        let key = ConfigKey::lookup(assignment.key()).ok_or(ConfigError::UnknownKey)?;
        let value = assignment.int_value();

        match key {
            ConfigKey::CanEnable(bus) => {
                let enabled = clamp_flag(value);
                console_println!(
                    self.board.console(),
                    "Setting {} Enabled to {}",
                    bus,
                    enabled as u8
                );
                self.settings.bus_mut(bus).enabled = enabled;
                if enabled {
                    self.begin_can(bus);
                } else {
                    self.board.can(bus).disable();
                }
            }
            ConfigKey::CanSpeed(bus) => {
                let speed = u32::try_from(value)
                    .ok()
                    .filter(|s| (can::MIN_SPEED..=can::MAX_SPEED).contains(s))
                    .ok_or(ConfigError::InvalidSpeed { value })?;
                console_println!(
                    self.board.console(),
                    "Setting {} Baud Rate to {}",
                    bus,
                    speed
                );
                self.settings.bus_mut(bus).speed = speed;
                self.begin_can(bus);
            }
            ConfigKey::CanFilter(bus, filter) => {
                match self.set_filter(bus.index(), filter as usize, assignment.raw()) {
                    Ok(_) => (),
                    Err(FilterError::MissingTokens { .. }) => {
                        return Err(ConfigError::MalformedFilter)
                    }
                    Err(FilterError::OutOfRange { .. }) => return Ok(false),
                }
            }
            ConfigKey::BinSerial => {
                let flag = clamp_flag(value);
                console_println!(
                    self.board.console(),
                    "Setting Serial Binary Comm to {}",
                    flag as u8
                );
                self.settings.binary_serial = flag;
            }
            ConfigKey::BinFile => {
                let flag = clamp_flag(value);
                console_println!(
                    self.board.console(),
                    "Setting File Binary Writing to {}",
                    flag as u8
                );
                self.settings.binary_file = flag;
            }
            ConfigKey::FileBase => {
                self.settings.file_base = truncated_string(assignment.text_value()?);
                console_println!(
                    self.board.console(),
                    "Setting File Base Name to {}",
                    self.settings.file_base
                );
            }
            ConfigKey::FileExt => {
                self.settings.file_ext = truncated_string(assignment.text_value()?);
                console_println!(
                    self.board.console(),
                    "Setting File Extension to {}",
                    self.settings.file_ext
                );
            }
            ConfigKey::FileNum => {
                console_println!(
                    self.board.console(),
                    "Setting File Incrementing Number Base to {}",
                    value
                );
                self.settings.file_num = value;
            }
            ConfigKey::FileAppend => {
                let flag = clamp_flag(value);
                console_println!(
                    self.board.console(),
                    "Setting File Append Mode to {}",
                    flag as u8
                );
                self.settings.file_append = flag;
            }
            ConfigKey::SysType => {
                let sys_type =
                    SysType::from_raw(value).ok_or(ConfigError::InvalidSysType { value })?;
                self.settings.sys_type = sys_type;
                console_println!(
                    self.board.console(),
                    "System type set to {}. Power cycle to apply.",
                    sys_type.raw()
                );
            }
            ConfigKey::LogLevel => {
                // Unrecognized levels are dropped without a reply
                let Some(level) = LogLevel::from_raw(value) else {
                    debug!("Ignoring log level {}", value);
                    return Ok(false);
                };
                console_println!(
                    self.board.console(),
                    "setting loglevel to '{}'",
                    level.name()
                );
                self.board.set_log_level(level);
                self.settings.log_level = level;
            }
        }

        Ok(true)
    }

    fn begin_can(&mut self, bus: Bus) {
        let speed = self.settings.bus(bus).speed;
        let pin = self.board.enable_pin(bus);
        self.board.can(bus).begin(speed, pin);
    }
}
