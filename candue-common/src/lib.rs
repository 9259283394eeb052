//! Common functionality shared among the CANDue console crates.
//!
//! This crate holds the settings model which the serial console edits, the fixed-size record
//! format used to persist it, and the traits describing the hardware collaborators (CAN
//! controllers, settings storage, digital outputs) the console drives.
//!
//! Most users will have no reason to depend on this crate directly, as it is re-exported by
//! `candue-console`.
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs, missing_copy_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod constants;
pub mod number;
pub mod record;
pub mod settings;
pub mod traits;

pub use number::parse_int;
pub use record::{RecordError, SettingsRecord, SETTINGS_RECORD_SIZE};
pub use settings::{Bus, BusSettings, FilterRecord, LogLevel, Settings, SysType};
