//! Text forms a player can type to pick a move.
//!
//! | Text    | Meaning                                    |
//! |---------|--------------------------------------------|
//! | `0-0`   | castle kingside (`0-0-0` for queenside)    |
//! | `e4`    | pawn to e4                                 |
//! | `ne4`   | piece to e4, when only one such piece can  |
//! | `pe8q`  | pawn to e8, promoting to the named piece   |
//! | `ng1f3` | piece from g1 to f3                        |
//!
//! Everything is case-insensitive. Parsing here only checks the shape of the
//! text; whether the move exists is decided by the controller.

use std::str::FromStr;

use crate::board::{PieceKind, Square};
use crate::error::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRequest {
    Castle(CastleSide),
    PawnTo(Square),
    PieceTo {
        piece: PieceKind,
        target: Square,
    },
    Promotion {
        target: Square,
        promote_to: PieceKind,
    },
    FromTo {
        piece: PieceKind,
        origin: Square,
        target: Square,
    },
}

fn square(file: char, rank: char) -> Result<Square, MoveError> {
    Square::from_algebraic(file, rank).ok_or(MoveError::InvalidMove)
}

fn piece(letter: char) -> Result<PieceKind, MoveError> {
    PieceKind::from_char(letter).ok_or(MoveError::InvalidMove)
}

impl FromStr for MoveRequest {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        match text.as_str() {
            "0-0" => return Ok(MoveRequest::Castle(CastleSide::Kingside)),
            "0-0-0" => return Ok(MoveRequest::Castle(CastleSide::Queenside)),
            _ => {}
        }

        let chars: Vec<char> = text.chars().collect();
        match chars.as_slice() {
            &[file, rank] => Ok(MoveRequest::PawnTo(square(file, rank)?)),
            &[letter, file, rank] => Ok(MoveRequest::PieceTo {
                piece: piece(letter)?,
                target: square(file, rank)?,
            }),
            &[letter, file, rank, promo] => {
                if letter != 'p' {
                    return Err(MoveError::InvalidMove);
                }
                let target = square(file, rank)?;
                match piece(promo)? {
                    PieceKind::Pawn | PieceKind::King => Err(MoveError::ImpossiblePromotion),
                    promote_to => Ok(MoveRequest::Promotion { target, promote_to }),
                }
            }
            &[letter, from_file, from_rank, to_file, to_rank] => Ok(MoveRequest::FromTo {
                piece: piece(letter)?,
                origin: square(from_file, from_rank)?,
                target: square(to_file, to_rank)?,
            }),
            _ => Err(MoveError::IncorrectLength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_castling() {
        assert_eq!("0-0".parse::<MoveRequest>(), Ok(MoveRequest::Castle(CastleSide::Kingside)));
        assert_eq!(" 0-0-0\n".parse::<MoveRequest>(), Ok(MoveRequest::Castle(CastleSide::Queenside)));
    }

    #[test]
    fn test_shapes() {
        assert_eq!("E4".parse::<MoveRequest>(), Ok(MoveRequest::PawnTo(Square::new(4, 4))));
        assert_eq!(
            "Nf3".parse::<MoveRequest>(),
            Ok(MoveRequest::PieceTo {
                piece: PieceKind::Knight,
                target: Square::new(5, 5),
            })
        );
        assert_eq!(
            "pa8q".parse::<MoveRequest>(),
            Ok(MoveRequest::Promotion {
                target: Square::new(0, 0),
                promote_to: PieceKind::Queen,
            })
        );
        assert_eq!(
            "nb1d2".parse::<MoveRequest>(),
            Ok(MoveRequest::FromTo {
                piece: PieceKind::Knight,
                origin: Square::new(7, 1),
                target: Square::new(6, 3),
            })
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!("".parse::<MoveRequest>(), Err(MoveError::IncorrectLength));
        assert_eq!("e".parse::<MoveRequest>(), Err(MoveError::IncorrectLength));
        assert_eq!("ng1f3x".parse::<MoveRequest>(), Err(MoveError::IncorrectLength));
        assert_eq!("e9".parse::<MoveRequest>(), Err(MoveError::InvalidMove));
        assert_eq!("z4".parse::<MoveRequest>(), Err(MoveError::InvalidMove));
        assert_eq!("xe4".parse::<MoveRequest>(), Err(MoveError::InvalidMove));
        assert_eq!("ne8q".parse::<MoveRequest>(), Err(MoveError::InvalidMove));
        assert_eq!("pe8x".parse::<MoveRequest>(), Err(MoveError::InvalidMove));
        assert_eq!("pe8k".parse::<MoveRequest>(), Err(MoveError::ImpossiblePromotion));
        assert_eq!("pe8p".parse::<MoveRequest>(), Err(MoveError::ImpossiblePromotion));
        assert_eq!("ne2e9".parse::<MoveRequest>(), Err(MoveError::InvalidMove));
    }
}
