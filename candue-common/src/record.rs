//! Fixed-size binary image of [`Settings`] for non-volatile storage
//!
//! The settings are always written as one complete record. All multi-byte fields are little
//! endian, strings are NUL padded to a fixed width, and the record ends with a CRC-16/XMODEM of
//! every preceding byte so that a blank or half-written storage page is detected on load.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0      | 1    | Layout version |
//! | 1      | 1    | Log level |
//! | 2      | 1    | System type |
//! | 3      | 77   | CAN0: enabled (1), speed (4), 8 filters of id (4), mask (4), flags (1) |
//! | 80     | 77   | CAN1, same layout as CAN0 |
//! | 157    | 1    | Flags: bit 0 binary serial, bit 1 binary file, bit 2 file append |
//! | 158    | 30   | File base name |
//! | 188    | 4    | File extension |
//! | 192    | 4    | File number |
//! | 196    | 2    | CRC |
//!
//! Filter flags use bit 0 for extended and bit 1 for enabled.

use snafu::Snafu;

use crate::{
    constants::{can, file, record::VERSION},
    settings::{truncated_string, BusSettings, FilterRecord, LogLevel, Settings, SysType},
};

const FILTER_SIZE: usize = 9;
const BUS_SIZE: usize = 5 + can::FILTERS_PER_BUS * FILTER_SIZE;
const FILE_BASE_FIELD: usize = file::BASE_LEN + 1;
const FILE_EXT_FIELD: usize = file::EXT_LEN + 1;
const CRC_SIZE: usize = 2;

/// Size in bytes of a serialized settings record
pub const SETTINGS_RECORD_SIZE: usize =
    3 + can::BUS_COUNT * BUS_SIZE + 1 + FILE_BASE_FIELD + FILE_EXT_FIELD + 4 + CRC_SIZE;

/// A serialized settings record
pub type SettingsRecord = [u8; SETTINGS_RECORD_SIZE];

const FLAG_BINARY_SERIAL: u8 = 1 << 0;
const FLAG_BINARY_FILE: u8 = 1 << 1;
const FLAG_FILE_APPEND: u8 = 1 << 2;
const FILTER_EXTENDED: u8 = 1 << 0;
const FILTER_ENABLED: u8 = 1 << 1;

/// Error returned when a stored record cannot be turned back into [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// The stored data is not the size of a settings record
    #[snafu(display("Settings record is {len} bytes, expected {expected}"))]
    WrongLength {
        /// Length of the data provided
        len: usize,
        /// Length of a valid record
        expected: usize,
    },
    /// The checksum does not match the record contents
    #[snafu(display(
        "Settings record checksum mismatch: stored 0x{stored:04x}, computed 0x{computed:04x}"
    ))]
    ChecksumMismatch {
        /// Checksum read from the record
        stored: u16,
        /// Checksum calculated over the record contents
        computed: u16,
    },
    /// The record was written with an unknown layout
    #[snafu(display("Unsupported settings record version {version}"))]
    UnsupportedVersion {
        /// Version byte read from the record
        version: u8,
    },
    /// An enumerated field holds a value with no meaning
    #[snafu(display("Invalid {field} value {value} in settings record"))]
    InvalidField {
        /// Name of the field
        field: &'static str,
        /// The raw value found
        value: u8,
    },
    /// A file name field is not valid UTF-8
    #[snafu(display("File name in settings record is not valid UTF-8"))]
    InvalidFileName,
}

struct RecordWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> RecordWriter<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn put_u8(&mut self, value: u8) {
        self.put_bytes(&[value]);
    }

    fn put_u32(&mut self, value: u32) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Write `text` into a NUL padded field of `width` bytes
    fn put_str(&mut self, text: &str, width: usize) {
        let field = &mut self.buf[self.pos..self.pos + width];
        field.fill(0);
        let n = text.len().min(width - 1);
        field[..n].copy_from_slice(&text.as_bytes()[..n]);
        self.pos += width;
    }
}

struct RecordReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        bytes
    }

    fn u8(&mut self) -> u8 {
        self.take(1)[0]
    }

    fn u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.take(4));
        u32::from_le_bytes(bytes)
    }

    fn str(&mut self, width: usize) -> Result<&'a str, RecordError> {
        let field = self.take(width);
        let len = field.iter().position(|&b| b == 0).unwrap_or(width);
        core::str::from_utf8(&field[..len]).map_err(|_| RecordError::InvalidFileName)
    }
}

fn checksum(data: &[u8]) -> u16 {
    crc16::State::<crc16::XMODEM>::calculate(data)
}

impl Settings {
    /// Serialize the settings into a storage record
    pub fn to_record(&self) -> SettingsRecord {
        let mut record = [0u8; SETTINGS_RECORD_SIZE];
        let mut w = RecordWriter::new(&mut record);
        w.put_u8(VERSION);
        w.put_u8(self.log_level.raw());
        w.put_u8(self.sys_type.raw());
        for bus in &self.buses {
            w.put_u8(bus.enabled as u8);
            w.put_u32(bus.speed);
            for filter in &bus.filters {
                w.put_u32(filter.id);
                w.put_u32(filter.mask);
                let mut flags = 0;
                if filter.extended {
                    flags |= FILTER_EXTENDED;
                }
                if filter.enabled {
                    flags |= FILTER_ENABLED;
                }
                w.put_u8(flags);
            }
        }

        let mut flags = 0;
        if self.binary_serial {
            flags |= FLAG_BINARY_SERIAL;
        }
        if self.binary_file {
            flags |= FLAG_BINARY_FILE;
        }
        if self.file_append {
            flags |= FLAG_FILE_APPEND;
        }
        w.put_u8(flags);
        w.put_str(&self.file_base, FILE_BASE_FIELD);
        w.put_str(&self.file_ext, FILE_EXT_FIELD);
        w.put_u32(self.file_num as u32);

        let crc_pos = SETTINGS_RECORD_SIZE - CRC_SIZE;
        let crc = checksum(&record[..crc_pos]);
        record[crc_pos..].copy_from_slice(&crc.to_le_bytes());
        record
    }

    /// Restore settings from a storage record
    ///
    /// The record is checked for length, checksum and version before any field is interpreted.
    pub fn from_record(data: &[u8]) -> Result<Settings, RecordError> {
        if data.len() != SETTINGS_RECORD_SIZE {
            return WrongLengthSnafu {
                len: data.len(),
                expected: SETTINGS_RECORD_SIZE,
            }
            .fail();
        }

        let crc_pos = SETTINGS_RECORD_SIZE - CRC_SIZE;
        let stored = u16::from_le_bytes([data[crc_pos], data[crc_pos + 1]]);
        let computed = checksum(&data[..crc_pos]);
        if stored != computed {
            return ChecksumMismatchSnafu { stored, computed }.fail();
        }

        let mut r = RecordReader::new(&data[..crc_pos]);
        let version = r.u8();
        if version != VERSION {
            return UnsupportedVersionSnafu { version }.fail();
        }

        let value = r.u8();
        let log_level = LogLevel::from_raw(value as i32).ok_or(RecordError::InvalidField {
            field: "log level",
            value,
        })?;
        let value = r.u8();
        let sys_type = SysType::from_raw(value as i32).ok_or(RecordError::InvalidField {
            field: "system type",
            value,
        })?;

        let mut buses = [BusSettings::new(false); can::BUS_COUNT];
        for bus in buses.iter_mut() {
            bus.enabled = r.u8() != 0;
            bus.speed = r.u32();
            for filter in bus.filters.iter_mut() {
                let id = r.u32();
                let mask = r.u32();
                let flags = r.u8();
                *filter = FilterRecord {
                    id,
                    mask,
                    extended: flags & FILTER_EXTENDED != 0,
                    enabled: flags & FILTER_ENABLED != 0,
                };
            }
        }

        let flags = r.u8();
        let file_base = truncated_string(r.str(FILE_BASE_FIELD)?);
        let file_ext = truncated_string(r.str(FILE_EXT_FIELD)?);
        let file_num = r.u32() as i32;

        Ok(Settings {
            log_level,
            sys_type,
            buses,
            binary_serial: flags & FLAG_BINARY_SERIAL != 0,
            binary_file: flags & FLAG_BINARY_FILE != 0,
            file_base,
            file_ext,
            file_num,
            file_append: flags & FLAG_FILE_APPEND != 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Bus;
    use assertables::assert_contains;

    fn reseal(record: &mut SettingsRecord) {
        let crc_pos = SETTINGS_RECORD_SIZE - CRC_SIZE;
        let crc = checksum(&record[..crc_pos]);
        record[crc_pos..].copy_from_slice(&crc.to_le_bytes());
    }

    #[test]
    fn test_layout_size() {
        assert_eq!(198, SETTINGS_RECORD_SIZE);
    }

    #[test]
    fn test_restore_modified_settings() {
        let mut settings = Settings::default();
        settings.log_level = LogLevel::Off;
        settings.sys_type = SysType::Gevcu;
        settings.bus_mut(Bus::Can1).enabled = true;
        settings.bus_mut(Bus::Can1).speed = 125_000;
        settings.bus_mut(Bus::Can0).filters[3] = FilterRecord {
            id: 0x100,
            mask: 0x7FF,
            extended: true,
            enabled: false,
        };
        settings.binary_file = true;
        settings.file_append = true;
        settings.file_base = truncated_string("TRACE");
        settings.file_ext = truncated_string("LOG");
        settings.file_num = -3;

        let record = settings.to_record();
        assert_eq!(VERSION, record[0]);
        assert_eq!(Ok(settings), Settings::from_record(&record));
    }

    #[test]
    fn test_full_width_file_base() {
        let mut settings = Settings::default();
        settings.file_base = truncated_string("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789");
        assert_eq!(file::BASE_LEN, settings.file_base.len());
        let restored = Settings::from_record(&settings.to_record()).unwrap();
        assert_eq!(settings.file_base, restored.file_base);
    }

    #[test]
    fn test_blank_storage_rejected() {
        let blank = [0xFFu8; SETTINGS_RECORD_SIZE];
        assert!(matches!(
            Settings::from_record(&blank),
            Err(RecordError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let record = Settings::default().to_record();
        let err = Settings::from_record(&record[..100]).unwrap_err();
        assert_eq!(
            RecordError::WrongLength {
                len: 100,
                expected: SETTINGS_RECORD_SIZE
            },
            err
        );
        assert_contains!(err.to_string(), "expected 198");
    }

    #[test]
    fn test_corruption_detected() {
        let mut record = Settings::default().to_record();
        record[10] ^= 0x01;
        assert!(matches!(
            Settings::from_record(&record),
            Err(RecordError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_fields_rejected() {
        let mut record = Settings::default().to_record();
        record[0] = 7;
        reseal(&mut record);
        assert_eq!(
            Err(RecordError::UnsupportedVersion { version: 7 }),
            Settings::from_record(&record)
        );

        let mut record = Settings::default().to_record();
        record[1] = 9;
        reseal(&mut record);
        assert_eq!(
            Err(RecordError::InvalidField {
                field: "log level",
                value: 9
            }),
            Settings::from_record(&record)
        );

        let mut record = Settings::default().to_record();
        record[158] = 0xC3;
        record[159] = 0x28;
        reseal(&mut record);
        assert_eq!(
            Err(RecordError::InvalidFileName),
            Settings::from_record(&record)
        );
    }
}
