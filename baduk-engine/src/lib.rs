pub mod board;
pub mod chains;
pub mod error;
pub mod life;
pub mod session;
pub mod sgf;
pub mod stone;
pub mod territory;
pub mod turn;

/// A board coordinate, 1-indexed: `1 <= x, y <= size`.
pub type Point = (u8, u8);

pub use board::{Board, Captures};
pub use chains::{Chain, ChainId, Chains};
pub use error::GoError;
pub use session::{Session, DEFAULT_KOMI};
pub use stone::Stone;
pub use territory::{GameScore, PlayerPoints};
pub use turn::{Move, Record};
