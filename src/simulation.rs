use crate::board::{Board, Color, PieceKind, Square};
use crate::movegen::{Move, MoveGenerator};

/// A disposable copy of the position used to try a move out.
///
/// It carries its own king squares so that trying a king move never touches
/// the controller's cached positions, castling rights or en-passant marker.
#[derive(Debug, Clone)]
pub struct Simulation {
    board: Board,
    king_positions: [Square; 2],
}

impl Simulation {
    pub fn new(board: &Board, king_positions: [Square; 2]) -> Self {
        Self {
            board: board.clone(),
            king_positions,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Plays `mv` on the copy. Only placement happens here: no promotion and
    /// no bookkeeping beyond the copy's own king squares.
    pub fn apply(&mut self, mv: &Move) {
        let Some(piece) = self.board.pop_cell(mv.origin) else {
            return;
        };
        self.board.edit_cell(mv.target, piece);
        if let Some(captured) = mv.en_passant_capture {
            self.board.pop_cell(captured);
        }
        if piece.kind() == PieceKind::King {
            self.king_positions[piece.color().index()] = mv.target;
        }
    }

    /// Whether `color`'s king could be taken by any reply of the other side.
    pub fn king_exposed(&self, color: Color) -> bool {
        let king = self.king_positions[color.index()];
        MoveGenerator::new(&self.board, color.opposite()).reaches(king)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kings(board: &Board) -> [Square; 2] {
        [
            board.find_king(Color::White).unwrap(),
            board.find_king(Color::Black).unwrap(),
        ]
    }

    #[test]
    fn test_apply_leaves_original_alone() {
        let board = Board::starting();
        let mut sim = Simulation::new(&board, kings(&board));
        sim.apply(&Move::new(Square::new(6, 4), Square::new(4, 4), PieceKind::Pawn));
        assert!(sim.board().piece_at(Square::new(4, 4)).is_some());
        assert!(board.piece_at(Square::new(4, 4)).is_none());
    }

    #[test]
    fn test_king_move_tracks_copy_only() {
        let board = Board::from_layout("4k3/8/8/8/8/8/8/r3K3").unwrap();
        let start = kings(&board);
        let mut sim = Simulation::new(&board, start);
        assert!(sim.king_exposed(Color::White));

        sim.apply(&Move::new(Square::new(7, 4), Square::new(6, 4), PieceKind::King));
        assert!(!sim.king_exposed(Color::White));
        assert_eq!(start[Color::White.index()], Square::new(7, 4));
    }

    #[test]
    fn test_en_passant_removes_captured_pawn() {
        let board = Board::from_layout("4k3/8/8/3pP3/8/8/8/4K3").unwrap();
        let mut sim = Simulation::new(&board, kings(&board));
        let d5 = Square::new(3, 3);
        sim.apply(&Move::new_en_passant(Square::new(3, 4), Square::new(2, 3), d5));
        assert!(sim.board().piece_at(d5).is_none());
        assert!(sim.board().piece_at(Square::new(2, 3)).is_some());
    }
}
