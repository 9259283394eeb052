//! Parsing of CAN receive filter values
//!
//! A filter value is four comma separated integers: `id,mask,extended,enabled`.

use candue_common::{constants::can, parse_int, traits::CanController, Bus, FilterRecord};

use crate::{
    board::Board,
    console::Console,
    error::{FilterError, MissingTokensSnafu},
};

/// Split a filter value into its four integers
///
/// Empty fields (e.g. from `1,,2`) are skipped rather than read as zero, and anything after the
/// fourth field is ignored.
pub fn parse_filter(raw: &[u8]) -> Result<[i32; 4], FilterError> {
    let mut values = [0; 4];
    let mut found = 0;
    for token in raw
        .split(|&b| b == b',')
        .filter(|t| !t.is_empty())
        .take(values.len())
    {
        values[found] = parse_int(token);
        found += 1;
    }

    if found < values.len() {
        return MissingTokensSnafu { found }.fail();
    }
    Ok(values)
}

impl<B: Board> Console<'_, B> {
    /// Set receive filter `filter` on bus `bus` from a raw `id,mask,extended,enabled` value
    ///
    /// On success the stored filter is updated and applied to the running controller at once. On
    /// failure nothing is changed and nothing is printed.
    pub fn set_filter(
        &mut self,
        bus: usize,
        filter: usize,
        raw: &[u8],
    ) -> Result<FilterRecord, FilterError> {
        let Some(can_bus) = Bus::from_index(bus).filter(|_| filter < can::FILTERS_PER_BUS) else {
            return Err(FilterError::OutOfRange { bus, filter });
        };

        let [id, mask, extended, enabled] = parse_filter(raw)?;
        console_println!(
            self.board.console(),
            "Setting CAN{}FILTER{} to ID 0x{:x} Mask 0x{:x} Extended {} Enabled {}",
            bus,
            filter,
            id as u32,
            mask as u32,
            extended,
            enabled
        );

        let record = FilterRecord {
            id: id as u32,
            mask: mask as u32,
            extended: extended != 0,
            enabled: enabled != 0,
        };
        self.settings.bus_mut(can_bus).filters[filter] = record;
        self.board
            .can(can_bus)
            .set_rx_filter(filter as u8, record.id, record.mask, record.extended);

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(Ok([0x100, 0x7FF, 1, 1]), parse_filter(b"0x100,0x7FF,1,1"));
        assert_eq!(Ok([5, 6, 0, 1]), parse_filter(b"5,6,0,1,99,100"));
        assert_eq!(Ok([1, 2, 3, 4]), parse_filter(b",1,,2,3,,4"));
    }

    #[test]
    fn test_parse_filter_short() {
        assert_eq!(
            Err(FilterError::MissingTokens { found: 2 }),
            parse_filter(b"0x100,0x7FF")
        );
        assert_eq!(
            Err(FilterError::MissingTokens { found: 3 }),
            parse_filter(b"1,2,,3,")
        );
        assert_eq!(Err(FilterError::MissingTokens { found: 0 }), parse_filter(b",,,"));
    }
}
