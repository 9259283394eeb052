//! Console error types
//!
//! The `Display` text of each error is exactly what is printed back to the user.

use snafu::Snafu;

/// Reasons a configuration command is rejected
///
/// None of these are fatal; the command is dropped without changing any setting, and the
/// console waits for the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
pub enum ConfigError {
    /// The line has no `=`, or nothing follows it
    #[snafu(display("Command needs a value..ie CAN0SPEED=500000"))]
    MissingValue,
    /// The key is not one of the known settings
    #[snafu(display("Unknown command"))]
    UnknownKey,
    /// The bus speed is outside 1 - 1000000 baud
    #[snafu(display("Invalid baud rate! Enter a value 1 - 1000000"))]
    InvalidSpeed {
        /// The rejected value
        value: i32,
    },
    /// The system type is neither 0 nor 1
    #[snafu(display("Invalid system type. Please enter a value of 0 for CanDue or 1 for GEVCU"))]
    InvalidSysType {
        /// The rejected value
        value: i32,
    },
    /// A filter value did not contain all four fields
    #[snafu(display("Filter needs four values: ID,Mask,Extended,Enabled"))]
    MalformedFilter,
    /// A text value is not valid UTF-8
    #[snafu(display("Invalid text value"))]
    InvalidText,
}

/// Reasons the filter sub-parser refuses a filter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FilterError {
    /// The bus or filter index does not exist
    #[snafu(display("No filter {filter} on bus {bus}"))]
    OutOfRange {
        /// The requested bus index
        bus: usize,
        /// The requested filter index
        filter: usize,
    },
    /// Fewer than four comma separated values were given
    #[snafu(display("Expected 4 filter values, found {found}"))]
    MissingTokens {
        /// The number of values found
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertables::assert_contains;

    #[test]
    fn test_messages() {
        assert_eq!("Unknown command", ConfigError::UnknownKey.to_string());
        assert_contains!(
            ConfigError::InvalidSpeed { value: 0 }.to_string(),
            "Enter a value 1 - 1000000"
        );
        assert_contains!(
            ConfigError::MissingValue.to_string(),
            "CAN0SPEED=500000"
        );
        assert_contains!(
            FilterError::MissingTokens { found: 2 }.to_string(),
            "found 2"
        );
    }
}
