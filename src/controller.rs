use log::{debug, trace, warn};

use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::error::{LayoutError, MoveError};
use crate::movegen::{Move, MoveGenerator};
use crate::notation::{CastleSide, MoveRequest};
use crate::simulation::Simulation;

const KING_HOME_COL: u8 = 4;
const KINGSIDE_ROOK_COL: u8 = 7;
const QUEENSIDE_ROOK_COL: u8 = 0;
/// Squares between king and rook, all of which the king must be able to
/// step onto safely.
const KINGSIDE_PATH: i8 = 2;
const QUEENSIDE_PATH: i8 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastlingRights {
    pub kingside: bool,
    pub queenside: bool,
}

/// A pawn that has just advanced two squares, and the color that moved it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnPassantMarker {
    pub square: Square,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Checkmate { winner: Color },
    Stalemate,
}

/// Owns a match: the board, whose turn it is, castling and en-passant state,
/// and the list of moves the side to move may choose from.
///
/// Every ply the host calls [`calculate_moves`](Self::calculate_moves),
/// [`calculate_special_moves`](Self::calculate_special_moves) and
/// [`calculate_valid_moves`](Self::calculate_valid_moves) in that order (or
/// [`prepare_turn`](Self::prepare_turn)), then [`process_move`](Self::process_move),
/// then flips the active color.
#[derive(Debug, Clone)]
pub struct GameController {
    board: Board,
    active_color: Color,
    moves: Vec<Move>,
    promotion_squares: Vec<Square>,
    promotion_type: Option<PieceKind>,
    king_positions: [Square; 2],
    castle_availability: [CastlingRights; 2],
    castle_this_turn: [CastlingRights; 2],
    en_passant: Option<EnPassantMarker>,
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

impl GameController {
    /// A fresh game from the standard position, white to move.
    pub fn new() -> Self {
        let king_positions = [
            Square::new(Color::White.back_row(), KING_HOME_COL),
            Square::new(Color::Black.back_row(), KING_HOME_COL),
        ];
        Self::with_board(Board::starting(), Color::White, king_positions)
    }

    /// A game starting from an arbitrary placement. Castling is only granted
    /// where king and rook still stand on their home squares.
    pub fn from_layout(layout: &str, active_color: Color) -> Result<Self, LayoutError> {
        let board = Board::from_layout(layout)?;
        let white_king = board
            .find_king(Color::White)
            .ok_or(LayoutError::KingCount(Color::White))?;
        let black_king = board
            .find_king(Color::Black)
            .ok_or(LayoutError::KingCount(Color::Black))?;
        Ok(Self::with_board(board, active_color, [white_king, black_king]))
    }

    fn with_board(board: Board, active_color: Color, king_positions: [Square; 2]) -> Self {
        let castle_availability = [
            home_castling_rights(&board, Color::White),
            home_castling_rights(&board, Color::Black),
        ];
        Self {
            board,
            active_color,
            moves: Vec::new(),
            promotion_squares: Vec::new(),
            promotion_type: None,
            king_positions,
            castle_availability,
            castle_this_turn: [CastlingRights::default(); 2],
            en_passant: None,
        }
    }

    pub fn active_color(&self) -> Color {
        self.active_color
    }

    pub fn set_active_color(&mut self, color: Color) {
        self.active_color = color;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves available this ply, once the three calculation steps have run.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn promotion_squares(&self) -> &[Square] {
        &self.promotion_squares
    }

    pub fn en_passant(&self) -> Option<EnPassantMarker> {
        self.en_passant
    }

    pub fn king_position(&self, color: Color) -> Square {
        self.king_positions[color.index()]
    }

    pub fn castling_availability(&self, color: Color) -> CastlingRights {
        self.castle_availability[color.index()]
    }

    pub fn can_castle_this_turn(&self, color: Color) -> CastlingRights {
        self.castle_this_turn[color.index()]
    }

    /// Runs the three per-ply calculation steps in order.
    pub fn prepare_turn(&mut self) {
        self.calculate_moves();
        self.calculate_special_moves();
        self.calculate_valid_moves();
    }

    /// Rebuilds the move list with every pseudo-legal move of the side to move.
    pub fn calculate_moves(&mut self) {
        self.castle_this_turn = [CastlingRights::default(); 2];
        let list = MoveGenerator::new(&self.board, self.active_color).generate_moves();
        self.moves = list.moves;
        self.promotion_squares = list.promotion_squares;
    }

    /// Adds en-passant captures and works out which castles are allowed.
    pub fn calculate_special_moves(&mut self) {
        self.add_en_passant_moves();
        self.update_castling();
    }

    /// Drops every move that would leave the mover's king open to capture.
    pub fn calculate_valid_moves(&mut self) {
        let mut moves = std::mem::take(&mut self.moves);
        self.retain_legal(&mut moves);
        self.moves = moves;
        trace!("{} has {} legal moves", self.active_color, self.moves.len());
    }

    /// Whether the side to move is attacked right now.
    pub fn in_check(&self) -> bool {
        let king = self.king_position(self.active_color);
        MoveGenerator::new(&self.board, self.active_color.opposite()).reaches(king)
    }

    /// Outcome as of the current move list; only meaningful once the ply's
    /// moves have been calculated.
    pub fn status(&self) -> GameStatus {
        if !self.moves.is_empty() {
            GameStatus::Ongoing
        } else if self.in_check() {
            GameStatus::Checkmate {
                winner: self.active_color.opposite(),
            }
        } else {
            GameStatus::Stalemate
        }
    }

    /// Resolves `text` against this ply's moves and plays it.
    ///
    /// Returns a short description of what was played, such as `pe2e4` or
    /// `0-0`. On error nothing has changed.
    pub fn process_move(&mut self, text: &str) -> Result<String, MoveError> {
        let promotion_row = self.active_color.promotion_row();
        match text.parse::<MoveRequest>()? {
            MoveRequest::Castle(side) => self.castle(side),
            MoveRequest::PawnTo(target) => {
                if target.row == promotion_row {
                    return Err(MoveError::SpecifyPromotion);
                }
                let mv = self.find_unique(target, PieceKind::Pawn)?;
                Ok(self.play(mv))
            }
            MoveRequest::PieceTo { piece, target } => {
                if piece == PieceKind::Pawn && target.row == promotion_row {
                    return Err(MoveError::SpecifyPromotion);
                }
                let mv = self.find_unique(target, piece)?;
                Ok(self.play(mv))
            }
            MoveRequest::Promotion { target, promote_to } => {
                if target.row != promotion_row {
                    return Err(MoveError::InvalidMove);
                }
                let mv = self
                    .moves
                    .iter()
                    .find(|mv| mv.target == target && mv.piece == PieceKind::Pawn)
                    .copied()
                    .ok_or(MoveError::InvalidMove)?;
                self.promotion_type = Some(promote_to);
                Ok(self.play(mv))
            }
            MoveRequest::FromTo { piece, origin, target } => {
                let wanted = Move::new(origin, target, piece);
                let mv = self
                    .moves
                    .iter()
                    .find(|mv| **mv == wanted)
                    .copied()
                    .ok_or(MoveError::InvalidMove)?;
                if mv.piece == PieceKind::Pawn && mv.target.row == promotion_row {
                    return Err(MoveError::SpecifyPromotion);
                }
                Ok(self.play(mv))
            }
        }
    }

    fn find_unique(&self, target: Square, piece: PieceKind) -> Result<Move, MoveError> {
        let mut matches = self
            .moves
            .iter()
            .filter(|mv| mv.target == target && mv.piece == piece);
        match (matches.next(), matches.next()) {
            (Some(mv), None) => Ok(*mv),
            (Some(_), Some(_)) => Err(MoveError::AmbiguousMove),
            (None, _) => Err(MoveError::InvalidMove),
        }
    }

    fn play(&mut self, mv: Move) -> String {
        self.make_move(&mv);
        debug!("{} played {}", self.active_color, mv);
        mv.to_string()
    }

    fn castle(&mut self, side: CastleSide) -> Result<String, MoveError> {
        let rights = self.castle_this_turn[self.active_color.index()];
        let (allowed, rook_col, rook_to, king_to, label) = match side {
            CastleSide::Kingside => (rights.kingside, KINGSIDE_ROOK_COL, 5, 6, "0-0"),
            CastleSide::Queenside => (rights.queenside, QUEENSIDE_ROOK_COL, 3, 2, "0-0-0"),
        };
        if !allowed {
            return Err(MoveError::InvalidMove);
        }

        let row = self.active_color.back_row();
        let rook_move = Move::new(Square::new(row, rook_col), Square::new(row, rook_to), PieceKind::Rook);
        let king_move = Move::new(Square::new(row, KING_HOME_COL), Square::new(row, king_to), PieceKind::King);
        self.make_move(&rook_move);
        self.make_move(&king_move);
        debug!("{} castled {:?}", self.active_color, side);
        Ok(label.to_string())
    }

    /// Plays `mv` on the real board and updates castling rights, the
    /// en-passant marker, king squares and promotions.
    fn make_move(&mut self, mv: &Move) {
        let Some(piece) = self.board.pop_cell(mv.origin) else {
            warn!("no piece on {} for {}", mv.origin, mv);
            return;
        };
        let captured = self.board.edit_cell(mv.target, piece);
        if let Some(square) = mv.en_passant_capture {
            self.board.pop_cell(square);
        }

        if let Some(captured) = captured {
            if captured.kind() == PieceKind::Rook {
                self.revoke_rook_side(captured.color(), mv.target);
            }
        }

        let color = piece.color();
        match piece.kind() {
            PieceKind::Rook => self.revoke_rook_side(color, mv.origin),
            PieceKind::Pawn => {
                if mv.target.row.abs_diff(mv.origin.row) == 2 {
                    self.en_passant = Some(EnPassantMarker {
                        square: mv.target,
                        color,
                    });
                }
                if mv.target.row == color.promotion_row() {
                    match self.promotion_type.take() {
                        Some(kind) => {
                            self.board.edit_cell(mv.target, Piece::new(color, kind));
                        }
                        None => warn!("pawn reached {} with no promotion chosen", mv.target),
                    }
                }
            }
            PieceKind::King => {
                self.king_positions[color.index()] = mv.target;
                self.castle_availability[color.index()] = CastlingRights::default();
            }
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => {}
        }
    }

    /// A rook leaving (or being taken on) its home corner ends castling on
    /// that side for good.
    fn revoke_rook_side(&mut self, color: Color, corner: Square) {
        if corner.row != color.back_row() {
            return;
        }
        let rights = &mut self.castle_availability[color.index()];
        match corner.col {
            KINGSIDE_ROOK_COL => rights.kingside = false,
            QUEENSIDE_ROOK_COL => rights.queenside = false,
            _ => {}
        }
    }

    fn add_en_passant_moves(&mut self) {
        let Some(marker) = self.en_passant else {
            return;
        };
        let color = self.active_color;
        if marker.color == color {
            // The opponent let it pass.
            self.en_passant = None;
            return;
        }

        for d_col in [-1, 1] {
            let Some(side) = marker.square.offset(0, d_col) else {
                continue;
            };
            let own_pawn = self
                .board
                .piece_at(side)
                .map_or(false, |piece| piece.is(color, PieceKind::Pawn));
            if !own_pawn {
                continue;
            }
            if let Some(target) = marker.square.offset(color.pawn_direction(), 0) {
                self.moves.push(Move::new_en_passant(side, target, marker.square));
            }
        }
    }

    fn update_castling(&mut self) {
        let color = self.active_color;
        let rights = self.castle_availability[color.index()];
        if !rights.kingside && !rights.queenside {
            return;
        }

        let king = self.king_position(color);
        if self.exposes_king(&Move::new(king, king, PieceKind::King)) {
            return;
        }

        self.castle_this_turn[color.index()] = CastlingRights {
            kingside: rights.kingside && self.castle_path_safe(king, 1, KINGSIDE_PATH),
            queenside: rights.queenside && self.castle_path_safe(king, -1, QUEENSIDE_PATH),
        };
    }

    /// Every square from the king toward the rook must be empty and safe
    /// for the king to step onto.
    fn castle_path_safe(&self, king: Square, step: i8, length: i8) -> bool {
        (1..=length).all(|i| match king.offset(0, step * i) {
            Some(square) => {
                self.board.piece_at(square).is_none()
                    && !self.exposes_king(&Move::new(king, square, PieceKind::King))
            }
            None => false,
        })
    }

    fn retain_legal(&self, moves: &mut Vec<Move>) {
        moves.retain(|mv| !self.exposes_king(mv));
    }

    /// Tries `mv` on a copy of the board and reports whether the side to
    /// move would be left with its king en prise.
    pub(crate) fn exposes_king(&self, mv: &Move) -> bool {
        let mut simulation = Simulation::new(&self.board, self.king_positions);
        simulation.apply(mv);
        simulation.king_exposed(self.active_color)
    }
}

fn home_castling_rights(board: &Board, color: Color) -> CastlingRights {
    let row = color.back_row();
    let on_square = |col: u8, kind: PieceKind| {
        board
            .piece_at(Square::new(row, col))
            .map_or(false, |piece| piece.is(color, kind))
    };
    if !on_square(KING_HOME_COL, PieceKind::King) {
        return CastlingRights::default();
    }
    CastlingRights {
        kingside: on_square(KINGSIDE_ROOK_COL, PieceKind::Rook),
        queenside: on_square(QUEENSIDE_ROOK_COL, PieceKind::Rook),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let game = GameController::new();
        assert_eq!(game.active_color(), Color::White);
        assert!(game.moves().is_empty());
        assert_eq!(game.en_passant(), None);
        let full = CastlingRights {
            kingside: true,
            queenside: true,
        };
        assert_eq!(game.castling_availability(Color::White), full);
        assert_eq!(game.castling_availability(Color::Black), full);
        assert_eq!(game.king_position(Color::White), Square::new(7, 4));
        assert_eq!(game.king_position(Color::Black), Square::new(0, 4));
    }

    #[test]
    fn test_layout_rights() {
        let game = GameController::from_layout("r3k3/8/8/8/8/8/8/4K2R", Color::White).unwrap();
        assert_eq!(
            game.castling_availability(Color::White),
            CastlingRights {
                kingside: true,
                queenside: false,
            }
        );
        assert_eq!(
            game.castling_availability(Color::Black),
            CastlingRights {
                kingside: false,
                queenside: true,
            }
        );

        let game = GameController::from_layout("4k3/8/8/8/8/8/8/3K3R", Color::White).unwrap();
        assert_eq!(game.castling_availability(Color::White), CastlingRights::default());
    }

    #[test]
    fn test_rook_move_revokes_one_side() {
        let mut game = GameController::from_layout("4k3/8/8/8/8/8/8/R3K2R", Color::White).unwrap();
        game.prepare_turn();
        game.process_move("rh1h2").unwrap();
        let rights = game.castling_availability(Color::White);
        assert!(!rights.kingside);
        assert!(rights.queenside);
    }

    #[test]
    fn test_capturing_home_rook_revokes() {
        let mut game = GameController::from_layout("r3k3/8/8/8/8/8/8/R3K3", Color::White).unwrap();
        game.prepare_turn();
        assert_eq!(game.process_move("ra8"), Ok("ra1a8".to_string()));
        assert!(!game.castling_availability(Color::Black).queenside);
        assert!(!game.castling_availability(Color::White).queenside);
    }

    #[test]
    fn test_in_check_keeps_move_list() {
        let mut game = GameController::from_layout("4k3/8/8/8/8/8/8/4K2r", Color::White).unwrap();
        game.prepare_turn();
        let before = game.moves().to_vec();
        assert!(game.in_check());
        assert_eq!(game.moves(), before.as_slice());
        assert_eq!(game.active_color(), Color::White);
    }

    #[test]
    fn test_exposes_king_on_pin() {
        let game = GameController::from_layout("4k3/4r3/8/8/8/8/4B3/4K3", Color::White).unwrap();
        let off_line = Move::new(Square::new(6, 4), Square::new(5, 3), PieceKind::Bishop);
        assert!(game.exposes_king(&off_line));
        let king_step = Move::new(Square::new(7, 4), Square::new(7, 3), PieceKind::King);
        assert!(!game.exposes_king(&king_step));
    }
}
