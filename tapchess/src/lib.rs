//! # Tapchess
//!
//! Engine for a two-player game on an 8×8 chess board, meant to be driven by cell touches from
//! a board view. Pieces may move from any cell to any cell, and the only rule enforced is that a
//! piece cannot capture a piece of its own side. A side loses when all of its sixteen pieces are
//! captured, or when its clock runs out in a timed game.
//!
//! The main entry point is [`GameController`], which owns a [`Board`] and, optionally, a
//! [`ChessClock`]. The host forwards touches to [`GameController::handle_cell_touch()`] and drives
//! the clock either with [`GameController::tick_clock()`] from its own timer, or with
//! [`GameController::poll_clock()`].
//!
//! # Example
//!
//! ```
//! use tapchess::{GameController, Side};
//!
//! let mut game = GameController::new();
//! game.on_turn_changed(|side| println!("{} to move", side.as_long_str()));
//!
//! game.handle_cell_touch(6, 4);
//! let mv = game.handle_cell_touch(1, 4).unwrap();
//! assert!(mv.is_capture());
//! assert_eq!(game.board().piece_count(Side::Black), 15);
//! assert_eq!(game.side_to_move(), Side::Black);
//! ```

pub mod board;
pub mod clock;
pub mod controller;
pub mod types;

pub use tapchess_base::{bitboard, geometry};

pub use bitboard::Bitboard;
pub use board::{Board, Move, MoveError, PlacementParseError};
pub use clock::{ChessClock, Clock, ClockConfig, ClockConfigError, ClockEvent, ClockState};
pub use controller::{GameConfig, GameController, GameObserver};
pub use types::{Coord, File, Outcome, Piece, PieceKind, Rank, Side, WinReason};
