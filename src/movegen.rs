use std::fmt;
use std::hash::{Hash, Hasher};

use crate::board::{Board, Color, PieceKind, Square};

const ORTHOGONAL: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(-1, 1), (1, 1), (-1, -1), (1, -1)];
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0), (1, 0), (0, 1), (0, -1),
    (-1, 1), (1, 1), (-1, -1), (1, -1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, 1), (-1, 2), (1, 2), (2, 1),
    (2, -1), (1, -2), (-1, -2), (-2, -1),
];

/// A piece travelling from `origin` to `target`.
///
/// Two moves are equal when their coordinates are, whatever piece they claim
/// to move. `en_passant_capture` is only set for en passant, where the pawn
/// taken is not on the target square.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub origin: Square,
    pub target: Square,
    pub piece: PieceKind,
    pub en_passant_capture: Option<Square>,
}

impl Move {
    pub fn new(origin: Square, target: Square, piece: PieceKind) -> Self {
        Self {
            origin,
            target,
            piece,
            en_passant_capture: None,
        }
    }

    pub fn new_en_passant(origin: Square, target: Square, captured: Square) -> Self {
        Self {
            origin,
            target,
            piece: PieceKind::Pawn,
            en_passant_capture: Some(captured),
        }
    }

    /// Packs the four coordinates into one number, unique per origin/target pair.
    pub fn id(&self) -> u16 {
        self.origin.row as u16 * 512
            + self.origin.col as u16 * 64
            + self.target.row as u16 * 8
            + self.target.col as u16
    }

    pub fn is_en_passant(&self) -> bool {
        self.en_passant_capture.is_some()
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.piece.to_char(), self.origin, self.target)
    }
}

/// Output of one generation pass.
#[derive(Debug, Clone, Default)]
pub struct MoveList {
    pub moves: Vec<Move>,
    /// Targets of pawn moves that would land on the far rank.
    pub promotion_squares: Vec<Square>,
}

/// Pseudo-legal move generation for one color on one board. The board can be
/// the live one or a throwaway copy; nothing here knows the difference.
pub struct MoveGenerator<'a> {
    board: &'a Board,
    color: Color,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(board: &'a Board, color: Color) -> Self {
        Self { board, color }
    }

    pub fn generate_moves(&self) -> MoveList {
        let mut list = MoveList::default();
        for (square, piece) in self.board.pieces() {
            if piece.color() == self.color {
                self.piece_moves(square, piece.kind(), &mut list);
            }
        }
        list
    }

    /// True if any pseudo-legal move of this color lands on `square`.
    pub fn reaches(&self, square: Square) -> bool {
        self.generate_moves().moves.iter().any(|mv| mv.target == square)
    }

    pub fn piece_moves(&self, from: Square, kind: PieceKind, list: &mut MoveList) {
        match kind {
            PieceKind::Pawn => self.pawn_moves(from, list),
            PieceKind::Knight => self.leaper_moves(from, PieceKind::Knight, &KNIGHT_OFFSETS, list),
            PieceKind::Bishop => self.ray_moves(from, PieceKind::Bishop, &DIAGONAL, list),
            PieceKind::Rook => self.ray_moves(from, PieceKind::Rook, &ORTHOGONAL, list),
            PieceKind::Queen => self.ray_moves(from, PieceKind::Queen, &ALL_DIRECTIONS, list),
            PieceKind::King => self.leaper_moves(from, PieceKind::King, &ALL_DIRECTIONS, list),
        }
    }

    fn pawn_moves(&self, from: Square, list: &mut MoveList) {
        let direction = self.color.pawn_direction();
        let promotion_row = self.color.promotion_row();
        let push = |list: &mut MoveList, to: Square| {
            list.moves.push(Move::new(from, to, PieceKind::Pawn));
            if to.row == promotion_row {
                list.promotion_squares.push(to);
            }
        };

        // Pushes
        if let Some(one) = from.offset(direction, 0) {
            if self.board.piece_at(one).is_none() {
                push(list, one);
                if from.row == self.color.pawn_home_row() {
                    if let Some(two) = one.offset(direction, 0) {
                        if self.board.piece_at(two).is_none() {
                            push(list, two);
                        }
                    }
                }
            }
        }

        // Captures, right then left
        for d_col in [1, -1] {
            if let Some(to) = from.offset(direction, d_col) {
                if self.is_enemy(to) {
                    push(list, to);
                }
            }
        }
    }

    fn leaper_moves(&self, from: Square, kind: PieceKind, offsets: &[(i8, i8)], list: &mut MoveList) {
        for &(d_row, d_col) in offsets {
            if let Some(to) = from.offset(d_row, d_col) {
                if !self.is_friendly(to) {
                    list.moves.push(Move::new(from, to, kind));
                }
            }
        }
    }

    fn ray_moves(&self, from: Square, kind: PieceKind, directions: &[(i8, i8)], list: &mut MoveList) {
        for &(d_row, d_col) in directions {
            let mut current = from;
            for _ in 1..8 {
                let Some(to) = current.offset(d_row, d_col) else {
                    break;
                };
                match self.board.piece_at(to) {
                    None => list.moves.push(Move::new(from, to, kind)),
                    Some(piece) => {
                        if piece.color() != self.color {
                            list.moves.push(Move::new(from, to, kind));
                        }
                        break;
                    }
                }
                current = to;
            }
        }
    }

    fn is_friendly(&self, square: Square) -> bool {
        self.board
            .piece_at(square)
            .map_or(false, |piece| piece.color() == self.color)
    }

    fn is_enemy(&self, square: Square) -> bool {
        self.board
            .piece_at(square)
            .map_or(false, |piece| piece.color() != self.color)
    }
}
