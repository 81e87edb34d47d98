pub mod board;
pub mod controller;
pub mod error;
pub mod movegen;
pub mod notation;
pub mod simulation;

pub use board::{Board, Color, Piece, PieceKind, Square};
pub use controller::{CastlingRights, EnPassantMarker, GameController, GameStatus};
pub use error::{LayoutError, MoveError};
pub use movegen::Move;
