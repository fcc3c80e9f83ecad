//! Undo records for the move history stack.

use crate::{castling_rights::CastlingRights, moves::Move, square::Square};

/// The state a move destroys and cannot recompute: everything needed to
/// restore the previous position exactly, without copying the board.
///
/// The captured piece is not recorded here; it travels inside the move's
/// kind payload.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct HistoryEntry {
    pub played: Move,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
}
