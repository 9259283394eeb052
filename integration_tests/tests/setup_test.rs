use candue_common::{Bus, LogLevel, Settings};
use candue_console::{setup, Console};
use integration_tests::sim_board::{CanCall, SimBoard, CAN0_ENABLE_PIN, CAN1_ENABLE_PIN};

mod utils;
use utils::send;

fn custom_settings() -> Settings {
    let mut settings = Settings::default();
    settings.log_level = LogLevel::Warn;
    settings.bus_mut(Bus::Can0).enabled = false;
    let can1 = settings.bus_mut(Bus::Can1);
    can1.enabled = true;
    can1.speed = 250000;
    for filter in can1.filters.iter_mut().skip(1) {
        filter.enabled = false;
    }
    can1.filters[0].id = 0x7E8;
    can1.filters[0].mask = 0x7F8;
    settings.file_num = 17;
    settings
}

#[test]
fn test_setup_empty_storage_loads_defaults() {
    let mut settings = custom_settings();
    let mut board = SimBoard::new();

    setup(&mut settings, &mut board);

    assert_eq!(Settings::default(), settings);
    assert_eq!(1, board.storage.writes);
    let stored = Settings::from_record(&board.storage.record.unwrap()).unwrap();
    assert_eq!(Settings::default(), stored);
    assert_eq!(Some(LogLevel::Info), board.log_level);

    let mut expected = vec![CanCall::Begin {
        speed: 500000,
        pin: CAN0_ENABLE_PIN,
    }];
    for index in 0..8 {
        expected.push(CanCall::Filter {
            index,
            id: 0,
            mask: 0,
            extended: index >= 4,
        });
    }
    assert_eq!(expected, board.can[0].calls);
    assert_eq!(vec![CanCall::Disable], board.can[1].calls);
}

#[test]
fn test_setup_loads_stored_settings() {
    let mut settings = Settings::default();
    let mut board = SimBoard::new();
    board.storage.record = Some(custom_settings().to_record());

    setup(&mut settings, &mut board);

    assert_eq!(custom_settings(), settings);
    assert_eq!(0, board.storage.writes);
    assert_eq!(Some(LogLevel::Warn), board.log_level);
    assert_eq!(vec![CanCall::Disable], board.can[0].calls);
    // Only the enabled filter is programmed
    assert_eq!(
        vec![
            CanCall::Begin {
                speed: 250000,
                pin: CAN1_ENABLE_PIN
            },
            CanCall::Filter {
                index: 0,
                id: 0x7E8,
                mask: 0x7F8,
                extended: false
            },
        ],
        board.can[1].calls
    );
}

#[test]
fn test_setup_corrupt_record_loads_defaults() {
    let mut settings = custom_settings();
    let mut board = SimBoard::new();
    let mut record = custom_settings().to_record();
    record[10] ^= 0x40;
    board.storage.record = Some(record);

    setup(&mut settings, &mut board);

    assert_eq!(Settings::default(), settings);
    assert_eq!(1, board.storage.writes);
    assert_eq!(Some(Settings::default().to_record()), board.storage.record);
}

#[test]
fn test_setup_erased_storage_loads_defaults() {
    let mut settings = Settings::default();
    let mut board = SimBoard::new();
    board.storage.record = Some([0xFF; candue_common::SETTINGS_RECORD_SIZE]);

    setup(&mut settings, &mut board);

    assert_eq!(Settings::default(), settings);
    assert_eq!(1, board.storage.writes);
}

#[test]
fn test_setup_read_failure_keeps_settings() {
    let mut settings = custom_settings();
    let mut board = SimBoard::new();
    board.storage.fail_reads = true;

    setup(&mut settings, &mut board);

    assert_eq!(custom_settings(), settings);
    assert_eq!(0, board.storage.writes);
    assert_eq!(Some(LogLevel::Warn), board.log_level);
    assert_eq!(vec![CanCall::Disable], board.can[0].calls);
    assert_eq!(2, board.can[1].calls.len());
}

#[test]
fn test_rerun_setup_from_console() {
    let mut settings = Settings::default();
    let mut board = SimBoard::new();
    setup(&mut settings, &mut board);
    board.reset_activity();

    let mut console = Console::new(&mut settings, &mut board);
    send(&mut console, "CAN1EN=1\r");
    console.board_mut().reset_activity();
    send(&mut console, "X\r");
    drop(console);

    // The saved change is picked up again, and nothing is rewritten
    assert!(settings.bus(Bus::Can1).enabled);
    assert_eq!(0, board.storage.writes);
    assert_eq!(
        Some(&CanCall::Begin {
            speed: 500000,
            pin: CAN1_ENABLE_PIN
        }),
        board.can[1].calls.first()
    );
    assert_eq!(9, board.can[1].calls.len());
    assert_eq!(9, board.can[0].calls.len());
    assert!(board.output.is_empty());
}
