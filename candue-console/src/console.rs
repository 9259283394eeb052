use candue_common::{
    traits::{DigitalOutputs, SettingsStorage},
    Settings,
};
use defmt_or_log::{debug, warn};

use crate::{
    board::Board,
    line_buffer::{LineBuffer, OverflowPolicy},
    menu::print_menu,
    setup::setup,
};

/// The menu level the console is at
///
/// Only the root menu exists so far. Lines are only interpreted while at the root menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleState {
    /// Accepting short commands and `KEY=VALUE` configuration
    #[default]
    RootMenu,
}

/// The serial configuration console
///
/// Bytes received from the serial port are passed to [`Console::receive_byte`] (or read directly
/// from an [`embedded_io::Read`] with [`Console::poll`]). Each CR or LF ends a command line,
/// which is executed immediately, editing `settings` and driving the `board` peripherals.
#[derive(Debug)]
pub struct Console<'a, B: Board> {
    line: LineBuffer,
    state: ConsoleState,
    command_count: u32,
    pub(crate) settings: &'a mut Settings,
    pub(crate) board: &'a mut B,
}

impl<'a, B: Board> Console<'a, B> {
    /// Create a console editing `settings`, with the default overflow policy
    pub fn new(settings: &'a mut Settings, board: &'a mut B) -> Self {
        Self::with_overflow_policy(settings, board, OverflowPolicy::default())
    }

    /// Create a console which handles over-long lines according to `policy`
    pub fn with_overflow_policy(
        settings: &'a mut Settings,
        board: &'a mut B,
        policy: OverflowPolicy,
    ) -> Self {
        Self {
            line: LineBuffer::new(policy),
            state: ConsoleState::RootMenu,
            command_count: 0,
            settings,
            board,
        }
    }

    /// Handle one received byte
    pub fn receive_byte(&mut self, byte: u8) {
        if byte == b'\r' || byte == b'\n' {
            self.handle_line();
        } else {
            self.line.push(byte);
        }
    }

    /// Read whatever is available from `port` and process it
    ///
    /// Returns the number of bytes consumed. A return of 0 means the reader is at end of file.
    pub fn poll<R: embedded_io::Read>(&mut self, port: &mut R) -> Result<usize, R::Error> {
        let mut buf = [0u8; 32];
        let n = port.read(&mut buf)?;
        for &b in &buf[..n] {
            self.receive_byte(b);
        }
        Ok(n)
    }

    /// The current write cursor, i.e. the number of bytes in the unfinished line
    pub fn cursor(&self) -> usize {
        self.line.cursor()
    }

    /// The current menu state
    pub fn state(&self) -> ConsoleState {
        self.state
    }

    /// The number of non-empty lines which have been executed
    pub fn command_count(&self) -> u32 {
        self.command_count
    }

    /// Read access to the settings being edited
    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Access the board
    pub fn board(&self) -> &B {
        self.board
    }

    /// Mutable access to the board
    pub fn board_mut(&mut self) -> &mut B {
        self.board
    }

    fn handle_line(&mut self) {
        let line = self.line.take();
        match self.state {
            ConsoleState::RootMenu => {
                if !line.is_empty() {
                    self.command_count = self.command_count.wrapping_add(1);
                    debug!("Executing {} byte command", line.len());
                }
                if line.len() == 1 {
                    self.handle_short_command(line[0]);
                } else {
                    self.handle_config_line(&line);
                }
            }
        }
    }

    fn handle_short_command(&mut self, cmd: u8) {
        match cmd {
            b'h' | b'H' | b'?' => print_menu(self.settings, self.board.console()),
            b'K' => {
                self.set_all_outputs(true);
                console_println!(self.board.console(), "all outputs: ON");
            }
            b'J' => {
                self.set_all_outputs(false);
                console_println!(self.board.console(), "all outputs: OFF");
            }
            // Reset to factory defaults. Not implemented yet.
            b'R' => (),
            // Start and stop logging to file. Not implemented yet.
            b's' | b'S' => (),
            b'X' => {
                // This re-initializes every peripheral with traffic possibly in flight. Only for
                // debugging on a bench setup.
                warn!("Re-running device setup from the console");
                setup(self.settings, self.board);
            }
            _ => debug!("Ignoring unknown short command {}", cmd),
        }
    }

    fn set_all_outputs(&mut self, high: bool) {
        let outputs = self.board.outputs();
        for i in 0..outputs.count() {
            outputs.set(i, high);
        }
    }

    /// Write the whole settings record to storage
    pub(crate) fn persist(&mut self) {
        let record = self.settings.to_record();
        if self.board.storage().write_record(&record).is_err() {
            warn!("Failed to write settings record");
            console_println!(self.board.console(), "Failed to save settings");
        }
    }
}
