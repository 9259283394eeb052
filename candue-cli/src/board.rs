//! A [`Board`] running on the host

use std::io::{self, Write as _};

use candue_common::{
    traits::{CanController, DigitalOutputs},
    Bus, LogLevel,
};
use candue_console::Board;

use crate::storage::FileStorage;

/// Pretend CAN controller which logs what would be done to the hardware
#[derive(Debug)]
pub struct LoggingCan {
    bus: Bus,
    running: bool,
}

impl LoggingCan {
    /// Create a stopped controller for `bus`
    pub fn new(bus: Bus) -> Self {
        Self {
            bus,
            running: false,
        }
    }

    /// Whether the controller has been started and not disabled since
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl CanController for LoggingCan {
    fn begin(&mut self, speed: u32, enable_pin: u8) {
        log::info!(
            "{}: begin at {} baud, enable pin {}",
            self.bus,
            speed,
            enable_pin
        );
        self.running = true;
    }

    fn disable(&mut self) {
        log::info!("{}: disabled", self.bus);
        self.running = false;
    }

    fn set_rx_filter(&mut self, index: u8, id: u32, mask: u32, extended: bool) {
        log::info!(
            "{}: filter {} id 0x{:x} mask 0x{:x} extended {}",
            self.bus,
            index,
            id,
            mask,
            extended
        );
    }
}

/// Digital outputs held in memory
#[derive(Debug)]
pub struct OutputBank {
    lines: Vec<bool>,
}

impl OutputBank {
    /// Create `count` outputs, all low
    pub fn new(count: usize) -> Self {
        Self {
            lines: vec![false; count],
        }
    }

    /// The current state of each output
    pub fn lines(&self) -> &[bool] {
        &self.lines
    }
}

impl DigitalOutputs for OutputBank {
    fn count(&self) -> usize {
        self.lines.len()
    }

    fn set(&mut self, index: usize, high: bool) {
        if let Some(line) = self.lines.get_mut(index) {
            *line = high;
            log::debug!("Output {} set {}", index, if high { "high" } else { "low" });
        }
    }
}

/// Console text sink writing to stdout
#[derive(Debug, Default)]
pub struct StdoutConsole;

impl core::fmt::Write for StdoutConsole {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(s.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|_| core::fmt::Error)
    }
}

/// Adapts a [`std::io::Read`] to the [`embedded_io::Read`] the console polls
#[derive(Debug)]
pub struct StdinPort<R> {
    inner: R,
}

impl<R: io::Read> StdinPort<R> {
    /// Wrap a std reader
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: io::Read> embedded_io::ErrorType for StdinPort<R> {
    type Error = io::Error;
}

impl<R: io::Read> embedded_io::Read for StdinPort<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }
}

/// Enable pins for the two transceivers
const ENABLE_PINS: [u8; 2] = [255, 62];

/// The simulated board
#[derive(Debug)]
pub struct HostBoard {
    can: [LoggingCan; 2],
    storage: FileStorage,
    outputs: OutputBank,
    console: StdoutConsole,
}

impl HostBoard {
    /// Create a board keeping its settings in `storage`, with `output_count` digital outputs
    pub fn new(storage: FileStorage, output_count: usize) -> Self {
        Self {
            can: [LoggingCan::new(Bus::Can0), LoggingCan::new(Bus::Can1)],
            storage,
            outputs: OutputBank::new(output_count),
            console: StdoutConsole,
        }
    }
}

impl Board for HostBoard {
    type Can = LoggingCan;
    type Storage = FileStorage;
    type Outputs = OutputBank;

    fn can(&mut self, bus: Bus) -> &mut Self::Can {
        &mut self.can[bus.index()]
    }

    fn enable_pin(&self, bus: Bus) -> u8 {
        ENABLE_PINS[bus.index()]
    }

    fn storage(&mut self) -> &mut Self::Storage {
        &mut self.storage
    }

    fn outputs(&mut self) -> &mut Self::Outputs {
        &mut self.outputs
    }

    fn set_log_level(&mut self, level: LogLevel) {
        log::set_max_level(level.into());
    }

    fn console(&mut self) -> &mut dyn core::fmt::Write {
        &mut self.console
    }
}
