use candue_common::{
    traits::{CanController, DigitalOutputs, SettingsStorage},
    Bus, LogLevel, SettingsRecord,
};
use candue_console::Board;

pub const CAN0_ENABLE_PIN: u8 = 255;
pub const CAN1_ENABLE_PIN: u8 = 62;

/// A call made on a [`SimCan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanCall {
    Begin { speed: u32, pin: u8 },
    Disable,
    Filter { index: u8, id: u32, mask: u32, extended: bool },
}

/// A CAN controller which records every call made on it
#[derive(Debug, Default)]
pub struct SimCan {
    pub calls: Vec<CanCall>,
}

impl SimCan {
    pub fn take_calls(&mut self) -> Vec<CanCall> {
        core::mem::take(&mut self.calls)
    }
}

impl CanController for SimCan {
    fn begin(&mut self, speed: u32, enable_pin: u8) {
        self.calls.push(CanCall::Begin {
            speed,
            pin: enable_pin,
        });
    }

    fn disable(&mut self) {
        self.calls.push(CanCall::Disable);
    }

    fn set_rx_filter(&mut self, index: u8, id: u32, mask: u32, extended: bool) {
        self.calls.push(CanCall::Filter {
            index,
            id,
            mask,
            extended,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageFailed;

/// Settings storage held in memory, counting writes
#[derive(Debug, Default)]
pub struct SimStorage {
    pub record: Option<SettingsRecord>,
    pub writes: usize,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl SettingsStorage for SimStorage {
    type Error = StorageFailed;

    fn read_record(&mut self) -> Result<Option<SettingsRecord>, Self::Error> {
        if self.fail_reads {
            return Err(StorageFailed);
        }
        Ok(self.record)
    }

    fn write_record(&mut self, record: &SettingsRecord) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(StorageFailed);
        }
        self.writes += 1;
        self.record = Some(*record);
        Ok(())
    }
}

#[derive(Debug)]
pub struct SimOutputs {
    pub lines: Vec<bool>,
}

impl DigitalOutputs for SimOutputs {
    fn count(&self) -> usize {
        self.lines.len()
    }

    fn set(&mut self, index: usize, high: bool) {
        self.lines[index] = high;
    }
}

/// A board with recording peripherals, and console output captured to a string
#[derive(Debug)]
pub struct SimBoard {
    pub can: [SimCan; 2],
    pub storage: SimStorage,
    pub outputs: SimOutputs,
    pub log_level: Option<LogLevel>,
    pub output: String,
}

impl SimBoard {
    pub fn new() -> Self {
        Self {
            can: Default::default(),
            storage: SimStorage::default(),
            outputs: SimOutputs {
                lines: vec![false; 8],
            },
            log_level: None,
            output: String::new(),
        }
    }

    /// Return the console output since the last call
    pub fn take_output(&mut self) -> String {
        core::mem::take(&mut self.output)
    }

    /// Clear all recorded activity
    pub fn reset_activity(&mut self) {
        for can in &mut self.can {
            can.calls.clear();
        }
        self.storage.writes = 0;
        self.output.clear();
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for SimBoard {
    type Can = SimCan;
    type Storage = SimStorage;
    type Outputs = SimOutputs;

    fn can(&mut self, bus: Bus) -> &mut Self::Can {
        &mut self.can[bus.index()]
    }

    fn enable_pin(&self, bus: Bus) -> u8 {
        match bus {
            Bus::Can0 => CAN0_ENABLE_PIN,
            Bus::Can1 => CAN1_ENABLE_PIN,
        }
    }

    fn storage(&mut self) -> &mut Self::Storage {
        &mut self.storage
    }

    fn outputs(&mut self) -> &mut Self::Outputs {
        &mut self.outputs
    }

    fn set_log_level(&mut self, level: LogLevel) {
        self.log_level = Some(level);
    }

    fn console(&mut self) -> &mut dyn core::fmt::Write {
        &mut self.output
    }
}
