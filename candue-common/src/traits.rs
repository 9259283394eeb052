//! Common traits
//!
//! These describe the hardware the console configures. Implementations are expected to be
//! synchronous: each call completes before it returns.

use crate::record::SettingsRecord;

/// A CAN controller which can be brought up, shut down, and have its receive filters set
pub trait CanController {
    /// Initialize the controller at `speed` baud, driving the transceiver enable pin `enable_pin`
    ///
    /// Calling this on a controller which is already running re-initializes it, and must be safe
    /// to repeat at the same speed.
    fn begin(&mut self, speed: u32, enable_pin: u8);

    /// Shut down the controller
    fn disable(&mut self);

    /// Program receive filter `index`
    fn set_rx_filter(&mut self, index: u8, id: u32, mask: u32, extended: bool);
}

/// Non-volatile storage holding a single settings record
pub trait SettingsStorage {
    /// The error type returned by storage access
    type Error: core::fmt::Debug;

    /// Read the stored record, returning `None` if nothing has been stored yet
    fn read_record(&mut self) -> Result<Option<SettingsRecord>, Self::Error>;

    /// Replace the stored record
    ///
    /// The write must be atomic with respect to power loss: after a failure, either the previous
    /// record or the new record is read back.
    fn write_record(&mut self, record: &SettingsRecord) -> Result<(), Self::Error>;
}

/// A bank of digital output lines
pub trait DigitalOutputs {
    /// The number of output lines
    fn count(&self) -> usize;

    /// Drive output `index` high or low
    fn set(&mut self, index: usize, high: bool);
}
