use candue_common::Settings;
use candue_console::{Console, ConsoleState, OverflowPolicy, MAX_LINE_LEN};
use integration_tests::sim_board::{CanCall, SimBoard, CAN0_ENABLE_PIN};

mod utils;
use utils::send;

#[test]
fn test_cursor_tracks_unterminated_input() {
    let mut settings = Settings::default();
    let mut board = SimBoard::new();
    let mut console = Console::new(&mut settings, &mut board);

    assert_eq!(ConsoleState::RootMenu, console.state());
    assert_eq!(0, console.cursor());
    send(&mut console, "CAN0");
    assert_eq!(4, console.cursor());
    send(&mut console, [b'x'; 75]);
    assert_eq!(MAX_LINE_LEN, console.cursor());
    // Further bytes are dropped
    send(&mut console, [b'y'; 40]);
    assert_eq!(MAX_LINE_LEN, console.cursor());
    send(&mut console, "\n");
    assert_eq!(0, console.cursor());
    assert_eq!(1, console.command_count());
}

#[test]
fn test_each_terminator_dispatches_once() {
    for terminator in ["\r", "\n", "\r\n"] {
        let mut settings = Settings::default();
        let mut board = SimBoard::new();
        let mut console = Console::new(&mut settings, &mut board);

        send(&mut console, format!("CAN0SPEED=250000{terminator}"));
        assert_eq!(0, console.cursor());
        assert_eq!(1, console.command_count());
        drop(console);

        assert_eq!(
            vec![CanCall::Begin {
                speed: 250000,
                pin: CAN0_ENABLE_PIN
            }],
            board.can[0].calls,
            "terminator {terminator:?}"
        );
        assert_eq!(1, board.storage.writes);
        assert_eq!(250000, settings.buses[0].speed);
    }
}

#[test]
fn test_empty_lines_are_ignored() {
    let mut settings = Settings::default();
    let mut board = SimBoard::new();
    let mut console = Console::new(&mut settings, &mut board);

    send(&mut console, "\r\n\r\n\n\r");
    assert_eq!(0, console.command_count());
    drop(console);
    assert_eq!(Settings::default(), settings);
    assert!(board.output.is_empty());
    assert_eq!(0, board.storage.writes);
}

#[test]
fn test_overflow_drop_excess() {
    let mut settings = Settings::default();
    let mut board = SimBoard::new();
    let mut console = Console::new(&mut settings, &mut board);

    // 8 byte key plus 71 zeros fills the line exactly
    send(&mut console, "FILENUM=");
    send(&mut console, [b'0'; 71]);
    send(&mut console, "7\r");
    drop(console);
    assert_eq!(0, settings.file_num);
}

#[test]
fn test_overflow_overwrite_last() {
    let mut settings = Settings::default();
    let mut board = SimBoard::new();
    let mut console =
        Console::with_overflow_policy(&mut settings, &mut board, OverflowPolicy::OverwriteLast);

    send(&mut console, "FILENUM=");
    send(&mut console, [b'0'; 71]);
    send(&mut console, "97\r");
    drop(console);
    assert_eq!(7, settings.file_num);
}

#[test]
fn test_poll_reads_from_transport() {
    let mut settings = Settings::default();
    let mut board = SimBoard::new();
    let mut console = Console::new(&mut settings, &mut board);

    let input: &[u8] = b"CAN1EN=1\r\nCAN1SPEED=125000\r\nFILENUM=42\r\nSYSTYPE=1\r\nBINFILE=1\r\n";
    let mut port = input;
    let mut total = 0;
    loop {
        let n = console.poll(&mut port).unwrap();
        if n == 0 {
            break;
        }
        total += n;
    }
    assert_eq!(input.len(), total);
    assert_eq!(5, console.command_count());
    drop(console);

    assert!(settings.buses[1].enabled);
    assert_eq!(125000, settings.buses[1].speed);
    assert_eq!(42, settings.file_num);
    assert!(settings.binary_file);
    assert_eq!(5, board.storage.writes);
}
