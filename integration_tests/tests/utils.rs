#![allow(dead_code)]
use candue_common::Settings;
use candue_console::{Board, Console};
use integration_tests::sim_board::SimBoard;

/// Feed `text` to the console one byte at a time
pub fn send<B: Board>(console: &mut Console<'_, B>, text: impl AsRef<[u8]>) {
    for &b in text.as_ref() {
        console.receive_byte(b);
    }
}

/// Run `lines` through a fresh console, returning the resulting settings and board
///
/// The board starts with no recorded activity.
pub fn run_lines(lines: &[&str]) -> (Settings, SimBoard) {
    let mut settings = Settings::default();
    let mut board = SimBoard::new();
    {
        let mut console = Console::new(&mut settings, &mut board);
        for line in lines {
            send(&mut console, line);
            send(&mut console, "\r\n");
        }
    }
    (settings, board)
}
