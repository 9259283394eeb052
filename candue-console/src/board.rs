//! The hardware seen by the console

use candue_common::{
    traits::{CanController, DigitalOutputs, SettingsStorage},
    Bus, LogLevel,
};

/// A trait for the board support code to implement, giving the console access to the peripherals
/// it configures
///
/// All methods are called from within the processing of a single command line, so
/// implementations do not need to handle reentrancy.
pub trait Board {
    /// The CAN controller type
    type Can: CanController;
    /// The non-volatile settings storage type
    type Storage: SettingsStorage;
    /// The digital output bank type
    type Outputs: DigitalOutputs;

    /// Get the controller for `bus`
    fn can(&mut self, bus: Bus) -> &mut Self::Can;

    /// Get the transceiver enable pin for `bus`
    fn enable_pin(&self, bus: Bus) -> u8;

    /// Get the settings storage
    fn storage(&mut self) -> &mut Self::Storage;

    /// Get the digital outputs
    fn outputs(&mut self) -> &mut Self::Outputs;

    /// Change the active log verbosity
    fn set_log_level(&mut self, level: LogLevel);

    /// Get the sink for console output text
    fn console(&mut self) -> &mut dyn core::fmt::Write;
}
