//! Host tools for the CANDue configuration console
//!
//! # candue-sim
//!
//! Runs the console on a PC, reading commands from stdin and printing replies to stdout. CAN
//! controller activity is reported through the logger, and the settings record is kept in a file,
//! so a sequence of configuration sessions behaves like a real board with EEPROM.
//!
//! Usage example: `candue-sim --settings candue.bin`

pub mod board;
pub mod storage;

pub use board::{HostBoard, LoggingCan, OutputBank, StdinPort, StdoutConsole};
pub use storage::FileStorage;
