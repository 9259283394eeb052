//! The serial configuration console for the CANDue board
//!
//! The console reads bytes from a serial link, assembles them into lines, and executes each line
//! as either a single character command or a `KEY=VALUE` configuration command. Configuration
//! changes are applied to the running CAN controllers at once and saved to non-volatile storage.
//! It is no_std compatible and performs no heap allocation.
//!
//! # Getting Started
//!
//! ## Implement a [`Board`]
//!
//! The console does not talk to hardware directly. The application provides a type implementing
//! [`Board`], which hands out the CAN controllers, the settings storage, the digital outputs and a
//! text sink for console replies. See [`common::traits`] for the peripheral traits.
//!
//! ## Bring up the device
//!
//! Before starting the console, call [`setup`] to load the stored settings and start the CAN
//! buses:
//!
//! ```ignore
//! let mut settings = Settings::default();
//! let mut board = MyBoard::new(peripherals);
//! candue_console::setup(&mut settings, &mut board);
//! ```
//!
//! ## Run the console
//!
//! Pass received bytes to the [`Console`], either one at a time with
//! [`Console::receive_byte`], or from any [`embedded_io::Read`] with [`Console::poll`]:
//!
//! ```ignore
//! let mut console = Console::new(&mut settings, &mut board);
//! loop {
//!     console.poll(&mut uart)?;
//! }
//! ```
//!
//! Sending `h` prints the menu, which lists every configuration key with its current value.
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Write a line of console output, terminated with CRLF
///
/// Write errors are ignored, there is nowhere to report them.
macro_rules! console_println {
    ($out:expr) => {{
        let out: &mut dyn core::fmt::Write = &mut *$out;
        let _ = core::fmt::Write::write_str(out, "\r\n");
    }};
    ($out:expr, $($arg:tt)*) => {{
        let out: &mut dyn core::fmt::Write = &mut *$out;
        let _ = core::fmt::Write::write_fmt(out, format_args!($($arg)*));
        let _ = core::fmt::Write::write_str(out, "\r\n");
    }};
}

mod board;
pub mod config;
mod console;
pub mod error;
mod filter;
pub mod line_buffer;
mod menu;
mod setup;

pub use candue_common as common;

pub use board::Board;
pub use config::{Assignment, ConfigKey};
pub use console::{Console, ConsoleState};
pub use error::{ConfigError, FilterError};
pub use filter::parse_filter;
pub use line_buffer::{LineBuffer, OverflowPolicy, LINE_CAPACITY, MAX_LINE_LEN};
pub use menu::{print_menu, BUILD_ID};
pub use setup::setup;
