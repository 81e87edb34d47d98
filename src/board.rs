use std::fmt;

use crate::error::LayoutError;

/// Piece placement at the start of a game, rank 8 first. Uppercase is white.
pub const STARTING_LAYOUT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Reads a notation letter, ignoring case.
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Lowercase notation letter.
    pub fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Row delta of a single pawn step. White marches toward row 0.
    pub fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row the pawns start on, the only row a double step is allowed from.
    pub fn pawn_home_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// Row on which this color's pawns promote.
    pub fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Row holding this color's king and rooks at the start.
    pub fn back_row(self) -> u8 {
        self.opposite().promotion_row()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn is(&self, color: Color, kind: PieceKind) -> bool {
        self.color == color && self.kind == kind
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = self.kind.to_char();
        match self.color {
            Color::White => write!(f, "{}", c.to_ascii_uppercase()),
            Color::Black => write!(f, "{}", c),
        }
    }
}

/// A cell on the grid. Row 0 is rank 8, column 0 is file a.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    /// Callers guarantee `row` and `col` are below 8.
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// `('e', '4')` is row 4, column 4.
    pub fn from_algebraic(file: char, rank: char) -> Option<Square> {
        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return None;
        }
        let rank = rank.to_digit(10).filter(|d| (1..=8).contains(d))?;
        Some(Square::new(8 - rank as u8, file as u8 - b'a'))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, 8 - self.row)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// A board holding the standard starting position.
    pub fn starting() -> Self {
        let mut board = Board::new();
        board.initialize();
        board
    }

    /// Fills the grid from `STARTING_LAYOUT`. The constant is trusted, so
    /// nothing is validated here.
    pub fn initialize(&mut self) {
        let mut row = 0usize;
        let mut col = 0usize;
        for c in STARTING_LAYOUT.chars() {
            if c == '/' {
                row += 1;
                col = 0;
            } else if let Some(skip) = c.to_digit(10) {
                col += skip as usize;
            } else if let Some(kind) = PieceKind::from_char(c) {
                let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                self.grid[row][col] = Some(Piece::new(color, kind));
                col += 1;
            }
        }
    }

    /// Parses an arbitrary placement descriptor in the `STARTING_LAYOUT`
    /// format, rejecting anything that is not a playable position.
    pub fn from_layout(layout: &str) -> Result<Board, LayoutError> {
        let ranks: Vec<&str> = layout.trim().split('/').collect();
        if ranks.len() != 8 {
            return Err(LayoutError::BadRankCount(ranks.len()));
        }

        let mut board = Board::new();
        for (row, rank) in ranks.iter().enumerate() {
            let width_error = LayoutError::BadRankWidth { rank: 8 - row as u8 };
            let mut col = 0usize;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                    if col > 8 {
                        return Err(width_error);
                    }
                    continue;
                }
                let kind = PieceKind::from_char(c).ok_or(LayoutError::UnknownPiece(c))?;
                if col >= 8 {
                    return Err(width_error);
                }
                let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                board.grid[row][col] = Some(Piece::new(color, kind));
                col += 1;
            }
            if col != 8 {
                return Err(width_error);
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = board
                .pieces()
                .filter(|(_, piece)| piece.is(color, PieceKind::King))
                .count();
            if kings != 1 {
                return Err(LayoutError::KingCount(color));
            }
        }
        Ok(board)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.grid[square.row as usize][square.col as usize]
    }

    /// Removes and returns whatever occupies `square`.
    pub fn pop_cell(&mut self, square: Square) -> Option<Piece> {
        self.grid[square.row as usize][square.col as usize].take()
    }

    /// Puts `piece` on `square`, handing back the piece it replaced.
    pub fn edit_cell(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.grid[square.row as usize][square.col as usize].replace(piece)
    }

    /// Occupied squares, rank 8 first, file a first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.grid.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| {
                cell.map(|piece| (Square::new(row as u8, col as u8), piece))
            })
        })
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.is(color, PieceKind::King))
            .map(|(square, _)| square)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (row, cells) in self.grid.iter().enumerate() {
            write!(f, "{} ", 8 - row)?;
            for (col, cell) in cells.iter().enumerate() {
                match cell {
                    Some(piece) => write!(f, "{}", piece)?,
                    None => write!(f, ".")?,
                }
                if col < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_layout() {
        let board = Board::starting();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(
            board.piece_at(Square::new(7, 4)),
            Some(Piece::new(Color::White, PieceKind::King))
        );
        assert_eq!(
            board.piece_at(Square::new(0, 3)),
            Some(Piece::new(Color::Black, PieceKind::Queen))
        );
        assert_eq!(board.piece_at(Square::new(4, 4)), None);
        assert_eq!(Board::from_layout(STARTING_LAYOUT), Ok(board));
    }

    #[test]
    fn test_square_conversion() {
        let e4 = Square::from_algebraic('e', '4').unwrap();
        assert_eq!(e4, Square::new(4, 4));
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(Square::from_algebraic('A', '8'), Some(Square::new(0, 0)));
        assert_eq!(Square::from_algebraic('i', '4'), None);
        assert_eq!(Square::from_algebraic('e', '9'), None);
        assert_eq!(Square::from_algebraic('e', '0'), None);
        assert_eq!(Square::new(0, 0).offset(-1, 0), None);
        assert_eq!(Square::new(0, 0).offset(1, 2), Some(Square::new(1, 2)));
    }

    #[test]
    fn test_pop_and_edit() {
        let mut board = Board::starting();
        let e2 = Square::new(6, 4);
        let pawn = board.pop_cell(e2);
        assert_eq!(pawn, Some(Piece::new(Color::White, PieceKind::Pawn)));
        assert_eq!(board.pop_cell(e2), None);

        let queen = Piece::new(Color::White, PieceKind::Queen);
        let replaced = board.edit_cell(Square::new(1, 4), queen);
        assert_eq!(replaced, Some(Piece::new(Color::Black, PieceKind::Pawn)));
        assert_eq!(board.piece_at(Square::new(1, 4)), Some(queen));
    }

    #[test]
    fn test_layout_errors() {
        assert_eq!(
            Board::from_layout("8/8/8/8/8/8/8"),
            Err(LayoutError::BadRankCount(7))
        );
        assert_eq!(
            Board::from_layout("4k3/8/8/8/8/8/8/4K4"),
            Err(LayoutError::BadRankWidth { rank: 1 })
        );
        assert_eq!(
            Board::from_layout("4k3/8/8/8/8/8/8/4K2"),
            Err(LayoutError::BadRankWidth { rank: 1 })
        );
        assert_eq!(
            Board::from_layout("4k3/8/8/8/8/8/8/4X3"),
            Err(LayoutError::UnknownPiece('X'))
        );
        assert_eq!(
            Board::from_layout("4k3/8/8/8/8/8/8/8"),
            Err(LayoutError::KingCount(Color::White))
        );
        assert_eq!(
            Board::from_layout("4k2k/8/8/8/8/8/8/4K3"),
            Err(LayoutError::KingCount(Color::Black))
        );
    }

    #[test]
    fn test_display() {
        let text = Board::starting().to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first, "8 r n b q k b n r");
        assert!(text.ends_with("  a b c d e f g h"));
    }
}
