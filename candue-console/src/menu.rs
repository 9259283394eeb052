//! The help menu
//!
//! Lists the short commands, then every configuration key with its current value in a form that
//! can be edited and sent straight back.

use core::fmt::Write;

use candue_common::{Bus, Settings};

use crate::config::ConfigKey;

/// Build identifier shown at the top of the menu
pub const BUILD_ID: &str = env!("CARGO_PKG_VERSION");

/// Print the help menu and current settings to `out`
pub fn print_menu(settings: &Settings, out: &mut dyn Write) {
    // Shown here as well as at startup, since users on the native USB port miss the boot banner
    console_println!(out, "Build number: {}", BUILD_ID);
    console_println!(out, "System Menu:");
    console_println!(out);
    console_println!(out, "Enable line endings of some sort (LF, CR, CRLF)");
    console_println!(out);
    console_println!(out, "Short Commands:");
    console_println!(out, "h = help (displays this message)");
    console_println!(out, "K = set all outputs high");
    console_println!(out, "J = set all outputs low");
    console_println!(out, "R = reset to factory defaults");
    console_println!(out, "s = Start logging to file");
    console_println!(out, "S = Stop logging to file");
    console_println!(
        out,
        "X = re-run device setup (debug only, do not use while connected to live equipment)"
    );
    console_println!(out);
    console_println!(
        out,
        "Config Commands (enter command=newvalue). Current values shown after the =:"
    );
    console_println!(out);

    console_println!(
        out,
        "{}={} - set log level (0=debug, 1=info, 2=warn, 3=error, 4=off)",
        ConfigKey::LogLevel.name(),
        settings.log_level.raw()
    );
    console_println!(
        out,
        "{}={} - set board type (0=CANDue, 1=GEVCU)",
        ConfigKey::SysType.name(),
        settings.sys_type.raw()
    );
    console_println!(out);

    for bus in Bus::ALL {
        let bus_settings = settings.bus(bus);
        console_println!(
            out,
            "{}={} - Enable/Disable {} (0 = Disable, 1 = Enable)",
            ConfigKey::CanEnable(bus).name(),
            bus_settings.enabled as u8,
            bus
        );
        console_println!(
            out,
            "{}={} - Set speed of {} in baud (125000, 250000, etc)",
            ConfigKey::CanSpeed(bus).name(),
            bus_settings.speed,
            bus
        );
        for (i, filter) in bus_settings.filters.iter().enumerate() {
            console_println!(
                out,
                "{}=0x{:x},0x{:x},{},{} (ID, Mask, Extended, Enabled)",
                ConfigKey::CanFilter(bus, i as u8).name(),
                filter.id,
                filter.mask,
                filter.extended as u8,
                filter.enabled as u8
            );
        }
        console_println!(out);
    }

    console_println!(
        out,
        "{}={} - Enable/Disable Binary Sending of CANBus Frames to Serial (0=Dis, 1=En)",
        ConfigKey::BinSerial.name(),
        settings.binary_serial as u8
    );
    console_println!(
        out,
        "{}={} - Enable/Disable Binary File Format (0=Ascii, 1=Binary)",
        ConfigKey::BinFile.name(),
        settings.binary_file as u8
    );
    console_println!(out);

    console_println!(
        out,
        "{}={} - Set filename base for saving",
        ConfigKey::FileBase.name(),
        settings.file_base
    );
    console_println!(
        out,
        "{}={} - Set filename ext for saving",
        ConfigKey::FileExt.name(),
        settings.file_ext
    );
    console_println!(
        out,
        "{}={} - Set incrementing number for filename",
        ConfigKey::FileNum.name(),
        settings.file_num
    );
    console_println!(
        out,
        "{}={} - Append to file (no numbers) or use incrementing numbers after basename \
         (0=Incrementing Numbers, 1=Append)",
        ConfigKey::FileAppend.name(),
        settings.file_append as u8
    );
}
