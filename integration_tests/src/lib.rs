pub mod sim_board;
