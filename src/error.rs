use crate::board::Color;

/// Why a move string was rejected. Every variant is recoverable: the
/// controller is left untouched and the host can simply ask again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("use 2 to 5 characters (e4, ne4, pe8q, ng1f3) or 0-0 / 0-0-0")]
    IncorrectLength,

    #[error("that move is not available")]
    InvalidMove,

    #[error("more than one piece can make that move; give the starting square too")]
    AmbiguousMove,

    #[error("name the piece to promote to, e.g. pe8q")]
    SpecifyPromotion,

    #[error("a pawn cannot promote to a pawn or a king")]
    ImpossiblePromotion,
}

/// Problems found while reading a piece-placement descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("unknown piece letter '{0}'")]
    UnknownPiece(char),

    #[error("rank {rank} does not describe exactly 8 squares")]
    BadRankWidth { rank: u8 },

    #[error("expected 8 ranks, found {0}")]
    BadRankCount(usize),

    #[error("{0} must have exactly one king")]
    KingCount(Color),
}
