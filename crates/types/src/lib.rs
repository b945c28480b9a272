//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! from the engine, the quiz and leaderboard ports, the runtime and the terminal
//! front end alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn position**: (4, 0), the bounding box is horizontally centered
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DROP_INTERVAL_MS` | 1000 | Gravity tick interval |
//! | `CLOCK_TICK_MS` | 1000 | Session wall-clock tick |
//! | `QUESTION_TIME_LIMIT_SECS` | 30 | Time to answer a question |
//! | `EXPLANATION_DWELL_MS` | 2500 | Explanation shown before play resumes |
//!
//! # Examples
//!
//! ```
//! use tetris_training_types::{GameAction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 20));
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Gravity interval in milliseconds.
///
/// The drop loop is allowed to vary by level, but the shipped policy keeps it
/// constant at one row per second.
pub const DROP_INTERVAL_MS: u32 = 1000;

/// Session wall-clock tick (one second)
pub const CLOCK_TICK_MS: u32 = 1000;

/// Level a fresh game starts at
pub const STARTING_LEVEL: u32 = 1;

/// Number of answered questions that completes a run
pub const TOTAL_QUESTIONS: u32 = 5;

/// Seconds available to answer a question
pub const QUESTION_TIME_LIMIT_SECS: u32 = 30;

/// Dwell after an answer is submitted, before play resumes
pub const EXPLANATION_DWELL_MS: u32 = 2500;

/// Options offered by every question
pub const ANSWER_OPTIONS: usize = 4;

/// Maximum number of retained leaderboard entries
pub const LEADERBOARD_SIZE: usize = 10;

/// Line clear scoring table
///
/// Base points for clearing N lines with one placement:
/// - 0 lines: 0 points
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
///
/// Points are multiplied by the (1-based) level.
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points per row travelled during a hard drop
pub const HARD_DROP_POINTS_PER_ROW: u32 = 2;

/// Base points for a correct answer
pub const CORRECT_ANSWER_POINTS: i32 = 100;

/// Points for a wrong (or timed out) answer
pub const WRONG_ANSWER_POINTS: i32 = -50;


/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, straight bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **L**: Orange, L-shaped
/// - **J**: Blue, J-shaped (mirror of L)
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// All kinds in draw order. The spawner indexes into this table.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Piece kind at `index` in [`PieceKind::ALL`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_training_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("L"), Some(PieceKind::L));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to uppercase letter
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
        }
    }
}

/// Rotation index of a piece
///
/// - **North**: Spawn orientation (index 0)
/// - **East**: index 1
/// - **South**: index 2
/// - **West**: index 3
///
/// The cycle goes North → East → South → West → North. There is no
/// counter-clockwise input; rotation always advances the index by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotation for an index taken modulo 4
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Index in 0..4
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Advance the rotation by `delta` steps (mod 4)
    pub fn offset(&self, delta: u8) -> Self {
        Self::from_index(self.index().wrapping_add(delta % 4))
    }

    /// Rotate clockwise (index + 1)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_training_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        self.offset(1)
    }
}

/// Game actions accepted while a piece is falling
///
/// These are the five logical commands of the keyboard surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down, locking it if it cannot descend
    SoftDrop,
    /// Advance the rotation index by one (no wall kicks)
    Rotate,
    /// Drop the piece to its landing row and lock it
    HardDrop,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" | "left" => Some(GameAction::MoveLeft),
            "moveright" | "right" => Some(GameAction::MoveRight),
            "softdrop" | "down" => Some(GameAction::SoftDrop),
            "rotate" => Some(GameAction::Rotate),
            "harddrop" => Some(GameAction::HardDrop),
            _ => None,
        }
    }

    /// camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::Rotate => "rotate",
            GameAction::HardDrop => "hardDrop",
        }
    }
}

/// Top-level phase of a session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Menu,
    Question,
    Playing,
    GameOver,
    GameComplete,
}

impl Phase {
    /// Game over and game complete only leave through an explicit restart.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::GameComplete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Menu => "menu",
            Phase::Question => "question",
            Phase::Playing => "playing",
            Phase::GameOver => "gameOver",
            Phase::GameComplete => "gameComplete",
        }
    }
}

/// Named sound triggers. Playback is fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Move,
    Rotate,
    Land,
    HardDrop,
    /// One to three lines cleared
    LineClear(u8),
    /// Four lines cleared
    Tetris,
    GameOver,
    Correct,
    Wrong,
    Click,
    Pause,
    Resume,
    GameComplete,
    TimerTick,
    UrgentBeep,
    HighScore,
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;

/// Logical commands produced by the keyboard surface.
///
/// The terminal layer maps raw key events to these; the session driver
/// decides what each one means in the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputCommand {
    /// A piece command, only honored while playing
    Action(GameAction),
    /// Highlight answer option `0..ANSWER_OPTIONS`
    SelectAnswer(usize),
    /// Start from the menu, submit an answer, or play again after a run
    Confirm,
    TogglePause,
    Restart,
    /// Save the finished run to the leaderboard
    RecordScore,
    Quit,
}
