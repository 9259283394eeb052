//! Device bring-up from stored settings

use candue_common::{
    traits::{CanController, SettingsStorage},
    Bus, Settings,
};
use defmt_or_log::{info, warn};

use crate::board::Board;

/// Load the stored settings and bring up the peripherals from them
///
/// A valid stored record replaces `settings`. If nothing is stored, or the record fails to
/// validate, the factory defaults are loaded and written back so the next boot finds a valid
/// record. If storage cannot be read at all, `settings` is left as it is.
///
/// Then the log level is applied, and each bus is either started at its configured speed with its
/// enabled receive filters programmed, or disabled.
pub fn setup<B: Board>(settings: &mut Settings, board: &mut B) {
    match board.storage().read_record() {
        Ok(Some(record)) => match Settings::from_record(&record) {
            Ok(stored) => {
                info!("Loaded stored settings");
                *settings = stored;
            }
            Err(e) => {
                warn!("Stored settings rejected ({}), loading defaults", e);
                load_defaults(settings, board);
            }
        },
        Ok(None) => {
            info!("No stored settings, loading defaults");
            load_defaults(settings, board);
        }
        Err(_) => warn!("Failed to read settings storage, keeping current settings"),
    }

    board.set_log_level(settings.log_level);

    for bus in Bus::ALL {
        let bus_settings = settings.bus(bus);
        let pin = board.enable_pin(bus);
        let can = board.can(bus);
        if bus_settings.enabled {
            info!("Starting {} at {} baud", bus, bus_settings.speed);
            can.begin(bus_settings.speed, pin);
            for (i, filter) in bus_settings.filters.iter().enumerate() {
                if filter.enabled {
                    can.set_rx_filter(i as u8, filter.id, filter.mask, filter.extended);
                }
            }
        } else {
            info!("{} disabled", bus);
            can.disable();
        }
    }
}

fn load_defaults<B: Board>(settings: &mut Settings, board: &mut B) {
    *settings = Settings::default();
    if board
        .storage()
        .write_record(&settings.to_record())
        .is_err()
    {
        warn!("Failed to write default settings");
    }
}
