//! Turn sequencing, selection and game flow

use crate::board::{Board, Move};
use crate::clock::{ChessClock, ClockConfig, ClockConfigError, ClockEvent};
use crate::types::{Coord, Outcome, Piece, Side, WinReason};

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info};

/// Receiver of game events
///
/// All methods do nothing by default, so implementors override only what they need. Observers
/// are invoked synchronously from the controller call that caused the event.
pub trait GameObserver {
    fn piece_moved(&mut self, _mv: &Move) {}
    fn turn_changed(&mut self, _side: Side) {}
    fn clock_ticked(&mut self, _side: Side, _remaining: Duration) {}
    fn game_over(&mut self, _outcome: &Outcome) {}
}

struct PieceMovedFn<F>(F);

impl<F: FnMut(&Move)> GameObserver for PieceMovedFn<F> {
    fn piece_moved(&mut self, mv: &Move) {
        (self.0)(mv)
    }
}

struct TurnChangedFn<F>(F);

impl<F: FnMut(Side)> GameObserver for TurnChangedFn<F> {
    fn turn_changed(&mut self, side: Side) {
        (self.0)(side)
    }
}

struct GameOverFn<F>(F);

impl<F: FnMut(&Outcome)> GameObserver for GameOverFn<F> {
    fn game_over(&mut self, outcome: &Outcome) {
        (self.0)(outcome)
    }
}

/// Settings for a new game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Starting position
    pub board: Board,
    /// Clock settings, or `None` for a game without clocks
    pub clock: Option<ClockConfig>,
}

impl GameConfig {
    pub fn untimed() -> GameConfig {
        GameConfig {
            board: Board::initial(),
            clock: None,
        }
    }
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            board: Board::initial(),
            clock: Some(ClockConfig::default()),
        }
    }
}

/// Game controller
///
/// Turns cell touches into selections and moves. A touch on a piece of the side to move selects
/// it, and the next touch tries to move the selected piece there. The only rule checked is that
/// a piece cannot capture a piece of its own side. After each applied move the turn passes to the
/// opponent and, in a timed game, the opponent's clock starts while the mover's clock stops.
///
/// The game ends when a side loses all its pieces or runs out of time. After that, touches are
/// ignored until [`GameController::reset()`].
///
/// # Example
///
/// ```
/// # use tapchess::{GameController, Side};
/// #
/// let mut game = GameController::new();
/// assert_eq!(game.handle_cell_touch(6, 4), None);
/// assert!(game.selected_cell().is_some());
/// let mv = game.handle_cell_touch(4, 4).unwrap();
/// assert_eq!(mv.to_string(), "e2-e4");
/// assert_eq!(game.side_to_move(), Side::Black);
/// ```
pub struct GameController {
    board: Board,
    selection: Option<Coord>,
    side: Side,
    outcome: Option<Outcome>,
    clock: Option<ChessClock>,
    observers: Vec<Box<dyn GameObserver>>,
}

impl GameController {
    /// Creates an untimed game from the initial position
    pub fn new() -> GameController {
        GameController::from_board(Board::initial())
    }

    /// Creates an untimed game from `board`, with White to move
    pub fn from_board(board: Board) -> GameController {
        GameController {
            board,
            selection: None,
            side: Side::White,
            outcome: None,
            clock: None,
            observers: Vec::new(),
        }
    }

    pub fn with_config(config: GameConfig) -> Result<GameController, ClockConfigError> {
        let mut res = GameController::from_board(config.board);
        if let Some(clock) = config.clock {
            res.clock = Some(ChessClock::new(clock)?);
        }
        Ok(res)
    }

    /// Creates a timed game which drives the given clocks
    pub fn with_clock(board: Board, clock: ChessClock) -> GameController {
        let mut res = GameController::from_board(board);
        res.clock = Some(clock);
        res
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    #[inline]
    pub fn clock(&self) -> Option<&ChessClock> {
        self.clock.as_ref()
    }

    #[inline]
    pub fn selected_cell(&self) -> Option<Coord> {
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    pub fn on_piece_moved(&mut self, f: impl FnMut(&Move) + 'static) {
        self.add_observer(Box::new(PieceMovedFn(f)));
    }

    pub fn on_turn_changed(&mut self, f: impl FnMut(Side) + 'static) {
        self.add_observer(Box::new(TurnChangedFn(f)));
    }

    pub fn on_game_over(&mut self, f: impl FnMut(&Outcome) + 'static) {
        self.add_observer(Box::new(GameOverFn(f)));
    }

    #[inline]
    pub fn is_current_player_piece(&self, piece: &Piece) -> bool {
        piece.side == self.side
    }

    /// Returns `true` unless `(to_row, to_col)` holds a piece of the same side as `piece`
    #[inline]
    pub fn is_valid_move(&self, piece: &Piece, to_row: i32, to_col: i32) -> bool {
        match self.board.piece_at(to_row, to_col) {
            Some(target) => target.side != piece.side,
            None => true,
        }
    }

    /// Handles a touch on the cell at `row` and `col`
    ///
    /// Returns the move if the touch completed one. A touch that only selects a piece, does
    /// nothing, or attempts an illegal move returns `None`. Whenever a piece was selected before
    /// the touch, the selection is cleared, whether the move succeeded or not.
    pub fn handle_cell_touch(&mut self, row: i32, col: i32) -> Option<Move> {
        if self.is_finished() {
            return None;
        }

        if let Some(from) = self.selection.take() {
            let piece = self.board.get(from)?;
            let to = match Coord::from_row_col(row, col) {
                Some(to) if self.is_valid_move(&piece, row, col) => to,
                _ => {
                    debug!("move from {} to ({}, {}) rejected", from, row, col);
                    return None;
                }
            };
            return match self.board.make_move(from, to) {
                Ok(mv) => {
                    self.after_move(&mv);
                    Some(mv)
                }
                Err(e) => {
                    debug!("move rejected: {}", e);
                    None
                }
            };
        }

        if let Some(coord) = Coord::from_row_col(row, col) {
            if let Some(piece) = self.board.get(coord) {
                if self.is_current_player_piece(&piece) {
                    debug!("selected {} on {}", piece, coord);
                    self.selection = Some(coord);
                }
            }
        }
        None
    }

    fn after_move(&mut self, mv: &Move) {
        debug!("{} played {}", self.side.as_long_str(), mv);
        for observer in &mut self.observers {
            observer.piece_moved(mv);
        }

        let mover = self.side;
        self.side = mover.inv();
        for observer in &mut self.observers {
            observer.turn_changed(self.side);
        }

        if self.board.has_lost(self.side) {
            self.finish(Outcome::win(mover, WinReason::AllPiecesCaptured));
        } else if let Some(clock) = self.clock.as_mut() {
            clock.switch_to(self.side);
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        info!("game over: {}", outcome);
        self.outcome = Some(outcome);
        self.selection = None;
        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
        }
        for observer in &mut self.observers {
            observer.game_over(&outcome);
        }
    }

    /// Starts the clock of the side to move
    ///
    /// Clocks are switched automatically after each move, so this is only needed to start
    /// the clock before the first move. Does nothing in an untimed or finished game.
    pub fn start_clock(&mut self) {
        if self.is_finished() {
            return;
        }
        if let Some(clock) = self.clock.as_mut() {
            clock.switch_to(self.side);
        }
    }

    /// Ticks the running clock once
    ///
    /// Intended for hosts that own a fixed-rate timer. Returns `None` if no clock is running.
    pub fn tick_clock(&mut self) -> Option<ClockEvent> {
        let (side, event) = self.clock.as_mut()?.tick()?;
        self.handle_clock_event(side, event);
        Some(event)
    }

    /// Fires all the clock ticks that are due by `now` and returns how many fired
    pub fn poll_clock(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some((side, event)) = self.clock.as_mut().and_then(|c| c.tick_if_due(now)) {
            self.handle_clock_event(side, event);
            fired += 1;
        }
        fired
    }

    fn handle_clock_event(&mut self, side: Side, event: ClockEvent) {
        match event {
            ClockEvent::Tick(remaining) => {
                for observer in &mut self.observers {
                    observer.clock_ticked(side, remaining);
                }
            }
            ClockEvent::Expired => {
                self.finish(Outcome::win(side.inv(), WinReason::TimeForfeit));
            }
        }
    }

    /// Starts a new game from the initial position
    ///
    /// White moves first, the selection and the outcome are cleared, and the clocks are reset to
    /// idle with full time. Observers are kept.
    pub fn reset(&mut self) {
        self.board.reset();
        self.selection = None;
        self.side = Side::White;
        self.outcome = None;
        if let Some(clock) = self.clock.as_mut() {
            clock.reset();
        }
        debug!("game reset");
    }
}

impl Default for GameController {
    fn default() -> GameController {
        GameController::new()
    }
}

impl fmt::Debug for GameController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_struct("GameController")
            .field("board", &self.board)
            .field("selection", &self.selection)
            .field("side", &self.side)
            .field("outcome", &self.outcome)
            .field("clock", &self.clock)
            .field("observers", &self.observers.len())
            .finish()
    }
}
