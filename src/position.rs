//! Board state and the rules of the game.
//!
//! [`Position`] owns the 64-slot piece array plus the side to move, castling
//! rights, en passant target and move clocks. It is the only mutable entity
//! in the crate, and it only ever changes through [`Position::apply`] and
//! [`Position::undo`]. Move generation is split the classic way: a
//! pseudo-legal pass that only knows piece geometry and occupancy, and a
//! legality filter that trial-applies each candidate and keeps it if the
//! mover's king is not left attacked.

use log::{debug, trace};
use thiserror::Error;

use crate::{
    castling_rights::CastlingRights,
    colour::Colour,
    fen::{Fen, FenError, START_FEN},
    history::HistoryEntry,
    moves::{Move, MoveKind},
    piece::{Piece, PieceKind, PromotionTarget},
    square::{Rank, Square},
};

/// Move list storage. 256 slots is far beyond the densest position reachable
/// through [`Position::apply`].
pub type MoveList = heapless::Vec<Move, 256>;

/// Returned by [`Position::apply`] when a move cannot be played.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum IllegalMove {
    /// The move was not produced by the generator for this position.
    #[error("{0} is not pseudo-legal in this position")]
    NotPseudoLegal(Move),
    /// The move is pseudo-legal but would leave the mover's own king
    /// attacked.
    #[error("{0} would leave the king attacked")]
    ExposesKing(Move),
}

/// Whether the game has ended in the current position.
///
/// Draws that need game history or material accounting (repetition,
/// insufficient material, the fifty-move rule) are not detected here.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum GameStatus {
    /// The side to move has at least one legal move.
    Ongoing,
    /// The side to move has no legal move and is in check. The payload is
    /// the side that is mated, not the winner.
    Checkmate(Colour),
    /// The side to move has no legal move but is not in check.
    Stalemate,
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, -2),
    (-2, -1),
    (1, -2),
    (-1, 2),
    (-2, 1),
    (2, -1),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];
const ORTHOGONAL_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL_DIRS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];

/// A full chess position.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; 64],
    side_to_move: Colour,
    castling_rights: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
    history: Vec<HistoryEntry>,
}
impl Position {
    /// The standard starting position.
    pub fn initial() -> Self {
        Self::from_fen(START_FEN).unwrap()
    }

    /// Builds a position from a FEN string.
    ///
    /// # Errors
    /// Fails with a [`FenError`] when the string is malformed.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fen: Fen = fen.parse()?;
        debug!("loaded position {fen}");
        Ok(Self::from(fen))
    }

    /// Serializes the position back into a FEN string.
    ///
    /// This is the exact inverse of [`Position::from_fen`] for every
    /// position reachable through [`Position::apply`].
    pub fn to_fen(&self) -> String {
        self.fen().to_string()
    }

    /// The parsed-FEN view of the current state.
    pub fn fen(&self) -> Fen {
        Fen {
            board: self.board,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// The piece sitting on `square`, if any.
    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.board[square.index()]
    }

    /// The side whose turn it is.
    #[inline]
    pub fn side_to_move(&self) -> Colour {
        self.side_to_move
    }

    /// The current castling rights.
    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// The square a pawn skipped on the previous move, if it was a double
    /// push. Valid for one ply only.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Plies since the last pawn move or capture.
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// The move number, starting at 1 and incremented after each Black move.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// The square the king of `colour` stands on, or `None` for a board
    /// without that king.
    pub fn king_square(&self, colour: Colour) -> Option<Square> {
        let king = Piece::new(PieceKind::King, colour);
        Square::all().find(|square| self.board[square.index()] == Some(king))
    }

    // ------------------------------------------------------------------
    // Attack detection
    // ------------------------------------------------------------------

    /// Checks whether `by` attacks `square`.
    ///
    /// A square occupied by one of `by`'s own pieces is never counted as
    /// attacked; this is the sense used by the castling and check logic.
    /// The probe is purely geometric: pawn and knight and king contact
    /// squares first, then the orthogonal and diagonal rays until they hit
    /// a piece or the edge of the board.
    pub fn is_attacked(&self, square: Square, by: Colour) -> bool {
        if self.board[square.index()].is_some_and(|piece| piece.colour == by) {
            return false;
        }

        // An attacking pawn sits one rank behind the square, in `by`'s
        // forward sense, on either adjacent file.
        let pawn = Piece::new(PieceKind::Pawn, by);
        for df in [-1, 1] {
            if let Some(from) = square.offset(df, -by.forward()) {
                if self.board[from.index()] == Some(pawn) {
                    return true;
                }
            }
        }

        let knight = Piece::new(PieceKind::Knight, by);
        for (df, dr) in KNIGHT_OFFSETS {
            if let Some(from) = square.offset(df, dr) {
                if self.board[from.index()] == Some(knight) {
                    return true;
                }
            }
        }

        let king = Piece::new(PieceKind::King, by);
        for (df, dr) in KING_OFFSETS {
            if let Some(from) = square.offset(df, dr) {
                if self.board[from.index()] == Some(king) {
                    return true;
                }
            }
        }

        self.ray_attack(square, by, &ORTHOGONAL_DIRS, PieceKind::Rook)
            || self.ray_attack(square, by, &DIAGONAL_DIRS, PieceKind::Bishop)
    }

    /// Walks each direction in `dirs` away from `square` until a piece or
    /// the board edge; a `slider` or queen of `by` at the end of a ray is an
    /// attacker.
    fn ray_attack(&self, square: Square, by: Colour, dirs: &[(i8, i8)], slider: PieceKind) -> bool {
        for &(df, dr) in dirs {
            let mut current = square.offset(df, dr);
            while let Some(sq) = current {
                match self.board[sq.index()] {
                    None => current = sq.offset(df, dr),
                    Some(piece) => {
                        if piece.colour == by
                            && (piece.kind == slider || piece.kind == PieceKind::Queen)
                        {
                            return true;
                        }
                        break;
                    }
                }
            }
        }
        false
    }

    /// Checks if the side to move is currently in check.
    pub fn in_check(&self) -> bool {
        self.king_attacked(self.side_to_move)
    }

    fn king_attacked(&self, colour: Colour) -> bool {
        self.king_square(colour)
            .is_some_and(|king| self.is_attacked(king, colour.inverse()))
    }

    // ------------------------------------------------------------------
    // Pseudo-legal move generation
    // ------------------------------------------------------------------

    /// Generates every move that respects piece geometry and occupancy,
    /// ignoring whether the mover's king ends up attacked.
    ///
    /// The list is an unordered snapshot; calling this twice on an
    /// unmodified position yields the same set. Generation never mutates
    /// the position.
    pub fn pseudo_legal_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        for from in Square::all() {
            let Some(piece) = self.board[from.index()] else {
                continue;
            };
            if piece.colour != self.side_to_move {
                continue;
            }
            match piece.kind {
                PieceKind::Pawn => self.pawn_moves(from, &mut moves),
                PieceKind::Knight => self.offset_moves(from, &KNIGHT_OFFSETS, &mut moves),
                PieceKind::Bishop => self.ray_moves(from, &DIAGONAL_DIRS, &mut moves),
                PieceKind::Rook => self.ray_moves(from, &ORTHOGONAL_DIRS, &mut moves),
                PieceKind::Queen => {
                    self.ray_moves(from, &DIAGONAL_DIRS, &mut moves);
                    self.ray_moves(from, &ORTHOGONAL_DIRS, &mut moves);
                }
                PieceKind::King => {
                    self.offset_moves(from, &KING_OFFSETS, &mut moves);
                    self.castle_moves(from, &mut moves);
                }
            }
        }
        moves
    }

    /// Generates the legal moves of the side to move: the pseudo-legal
    /// moves that survive a trial apply on a disposable copy.
    ///
    /// An empty result means checkmate or stalemate, see
    /// [`Position::status`].
    pub fn legal_moves(&self) -> MoveList {
        let mut scratch = self.clone();
        let mut legal = MoveList::new();
        for mv in self.pseudo_legal_moves() {
            if scratch.try_apply(mv).is_ok() {
                scratch.undo();
                push_move(&mut legal, mv);
            }
        }
        legal
    }

    fn pawn_moves(&self, from: Square, moves: &mut MoveList) {
        let colour = self.side_to_move;
        let forward = colour.forward();
        let (start_rank, promotion_rank) = match colour {
            Colour::White => (Rank::Two, Rank::Seven),
            Colour::Black => (Rank::Seven, Rank::Two),
        };
        let rank = from.rank();

        if let Some(one) = from.offset(0, forward) {
            if self.board[one.index()].is_none() {
                if rank == promotion_rank {
                    for promotion in PromotionTarget::ALL {
                        push_move(moves, Move::new(from, one, MoveKind::Promotion { promotion }));
                    }
                } else {
                    push_move(moves, Move::new(from, one, MoveKind::Quiet));
                    if rank == start_rank {
                        if let Some(two) = from.offset(0, 2 * forward) {
                            if self.board[two.index()].is_none() {
                                push_move(moves, Move::new(from, two, MoveKind::DoublePush));
                            }
                        }
                    }
                }
            }
        }

        // Capture destinations are derived independently per diagonal.
        for df in [-1, 1] {
            let Some(to) = from.offset(df, forward) else {
                continue;
            };
            match self.board[to.index()] {
                Some(captured) if captured.colour != colour => {
                    if rank == promotion_rank {
                        for promotion in PromotionTarget::ALL {
                            push_move(
                                moves,
                                Move::new(from, to, MoveKind::CapturePromotion { promotion, captured }),
                            );
                        }
                    } else {
                        push_move(moves, Move::new(from, to, MoveKind::Capture { captured }));
                    }
                }
                None if self.en_passant == Some(to) => {
                    if let Some(victim) = en_passant_victim(to, colour) {
                        if let Some(captured) = self.board[victim.index()] {
                            push_move(moves, Move::new(from, to, MoveKind::EnPassant { captured }));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// Knight and king moves: one hop per offset, quiet onto empty squares,
    /// capture onto opposing ones.
    fn offset_moves(&self, from: Square, offsets: &[(i8, i8)], moves: &mut MoveList) {
        for &(df, dr) in offsets {
            let Some(to) = from.offset(df, dr) else {
                continue;
            };
            match self.board[to.index()] {
                None => push_move(moves, Move::new(from, to, MoveKind::Quiet)),
                Some(captured) if captured.colour != self.side_to_move => {
                    push_move(moves, Move::new(from, to, MoveKind::Capture { captured }))
                }
                Some(_) => {}
            }
        }
    }

    /// Bishop, rook and queen moves: walk each ray until a piece or the
    /// board edge stops it.
    fn ray_moves(&self, from: Square, dirs: &[(i8, i8)], moves: &mut MoveList) {
        for &(df, dr) in dirs {
            let mut current = from.offset(df, dr);
            while let Some(to) = current {
                match self.board[to.index()] {
                    None => {
                        push_move(moves, Move::new(from, to, MoveKind::Quiet));
                        current = to.offset(df, dr);
                    }
                    Some(captured) if captured.colour != self.side_to_move => {
                        push_move(moves, Move::new(from, to, MoveKind::Capture { captured }));
                        break;
                    }
                    Some(_) => break,
                }
            }
        }
    }

    /// Castling: the squares strictly between king and rook must be empty,
    /// and the king's square plus every square it crosses (destination
    /// included) must not be attacked by the opponent.
    fn castle_moves(&self, from: Square, moves: &mut MoveList) {
        let colour = self.side_to_move;
        let enemy = colour.inverse();
        let (home, f_sq, g_sq, b_sq, c_sq, d_sq) = match colour {
            Colour::White => (
                Square::E1,
                Square::F1,
                Square::G1,
                Square::B1,
                Square::C1,
                Square::D1,
            ),
            Colour::Black => (
                Square::E8,
                Square::F8,
                Square::G8,
                Square::B8,
                Square::C8,
                Square::D8,
            ),
        };
        if from != home {
            return;
        }

        if self.castling_rights.short_allowed(colour)
            && self.board[f_sq.index()].is_none()
            && self.board[g_sq.index()].is_none()
            && !self.is_attacked(home, enemy)
            && !self.is_attacked(f_sq, enemy)
            && !self.is_attacked(g_sq, enemy)
        {
            push_move(moves, Move::new(home, g_sq, MoveKind::ShortCastle));
        }
        if self.castling_rights.long_allowed(colour)
            && self.board[b_sq.index()].is_none()
            && self.board[c_sq.index()].is_none()
            && self.board[d_sq.index()].is_none()
            && !self.is_attacked(home, enemy)
            && !self.is_attacked(d_sq, enemy)
            && !self.is_attacked(c_sq, enemy)
        {
            push_move(moves, Move::new(home, c_sq, MoveKind::LongCastle));
        }
    }

    // ------------------------------------------------------------------
    // Applying and undoing moves
    // ------------------------------------------------------------------

    /// Plays `mv`, advancing the game by one ply.
    ///
    /// # Errors
    /// Rejects moves that were not produced by
    /// [`Position::pseudo_legal_moves`] for the current position, and
    /// pseudo-legal moves that would leave the mover's own king attacked.
    /// On error the position is left exactly as it was.
    pub fn apply(&mut self, mv: Move) -> Result<(), IllegalMove> {
        if !self.pseudo_legal_moves().contains(&mv) {
            return Err(IllegalMove::NotPseudoLegal(mv));
        }
        self.try_apply(mv)
    }

    /// Like [`Position::apply`] but trusts that `mv` is pseudo-legal here,
    /// skipping the membership scan. Still verifies the king-exposure rule
    /// and rolls back on failure.
    pub(crate) fn try_apply(&mut self, mv: Move) -> Result<(), IllegalMove> {
        self.apply_unchecked(mv);
        let mover = self.side_to_move.inverse();
        if self.king_attacked(mover) {
            self.undo();
            trace!("rejected {mv}: it leaves the {mover} king attacked");
            return Err(IllegalMove::ExposesKing(mv));
        }
        Ok(())
    }

    /// Reverts the most recent [`Position::apply`]. Does nothing if no move
    /// has been played.
    pub fn undo(&mut self) {
        let Some(entry) = self.history.pop() else {
            return;
        };
        self.side_to_move.invert();
        let mover = self.side_to_move;
        if mover.is_black() {
            self.fullmove_number -= 1;
        }
        self.castling_rights = entry.castling_rights;
        self.en_passant = entry.en_passant;
        self.halfmove_clock = entry.halfmove_clock;

        let mv = entry.played;
        match mv.kind() {
            MoveKind::Quiet | MoveKind::DoublePush => self.move_piece(mv.to(), mv.from()),
            MoveKind::Capture { captured } => {
                self.move_piece(mv.to(), mv.from());
                self.board[mv.to().index()] = Some(captured);
            }
            MoveKind::EnPassant { captured } => {
                self.move_piece(mv.to(), mv.from());
                if let Some(victim) = en_passant_victim(mv.to(), mover) {
                    self.board[victim.index()] = Some(captured);
                }
            }
            MoveKind::Promotion { .. } => {
                self.board[mv.to().index()] = None;
                self.board[mv.from().index()] = Some(Piece::new(PieceKind::Pawn, mover));
            }
            MoveKind::CapturePromotion { captured, .. } => {
                self.board[mv.to().index()] = Some(captured);
                self.board[mv.from().index()] = Some(Piece::new(PieceKind::Pawn, mover));
            }
            MoveKind::ShortCastle => {
                self.move_piece(mv.to(), mv.from());
                let (rook_home, rook_castled) = match mover {
                    Colour::White => (Square::H1, Square::F1),
                    Colour::Black => (Square::H8, Square::F8),
                };
                self.move_piece(rook_castled, rook_home);
            }
            MoveKind::LongCastle => {
                self.move_piece(mv.to(), mv.from());
                let (rook_home, rook_castled) = match mover {
                    Colour::White => (Square::A1, Square::D1),
                    Colour::Black => (Square::A8, Square::D8),
                };
                self.move_piece(rook_castled, rook_home);
            }
        }
    }

    /// Mutates the board and bookkeeping for `mv` without any legality
    /// verification, recording an undo entry first.
    fn apply_unchecked(&mut self, mv: Move) {
        self.history.push(HistoryEntry {
            played: mv,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
        });

        let mover = self.side_to_move;
        let pawn_move = self.board[mv.from().index()]
            .is_some_and(|piece| piece.kind == PieceKind::Pawn);

        match mv.kind() {
            MoveKind::Quiet | MoveKind::DoublePush => self.move_piece(mv.from(), mv.to()),
            MoveKind::Capture { .. } => {
                self.board[mv.to().index()] = None;
                self.move_piece(mv.from(), mv.to());
            }
            MoveKind::EnPassant { .. } => {
                self.move_piece(mv.from(), mv.to());
                if let Some(victim) = en_passant_victim(mv.to(), mover) {
                    self.board[victim.index()] = None;
                }
            }
            MoveKind::Promotion { promotion } | MoveKind::CapturePromotion { promotion, .. } => {
                self.board[mv.from().index()] = None;
                self.board[mv.to().index()] = Some(Piece::new(promotion.into(), mover));
            }
            MoveKind::ShortCastle => {
                self.move_piece(mv.from(), mv.to());
                let (rook_home, rook_castled) = match mover {
                    Colour::White => (Square::H1, Square::F1),
                    Colour::Black => (Square::H8, Square::F8),
                };
                self.move_piece(rook_home, rook_castled);
            }
            MoveKind::LongCastle => {
                self.move_piece(mv.from(), mv.to());
                let (rook_home, rook_castled) = match mover {
                    Colour::White => (Square::A1, Square::D1),
                    Colour::Black => (Square::A8, Square::D8),
                };
                self.move_piece(rook_home, rook_castled);
            }
        }

        // A double push leaves the skipped square capturable for one ply;
        // everything else clears the target.
        self.en_passant = match mv.kind() {
            MoveKind::DoublePush => mv.from().offset(0, mover.forward()),
            _ => None,
        };

        // Touching a king or rook home square ends the matching rights,
        // whether the piece moves away or is captured there.
        for square in [mv.from(), mv.to()] {
            match square {
                Square::E1 => self.castling_rights.revoke_both(Colour::White),
                Square::H1 => self.castling_rights.revoke_short(Colour::White),
                Square::A1 => self.castling_rights.revoke_long(Colour::White),
                Square::E8 => self.castling_rights.revoke_both(Colour::Black),
                Square::H8 => self.castling_rights.revoke_short(Colour::Black),
                Square::A8 => self.castling_rights.revoke_long(Colour::Black),
                _ => {}
            }
        }

        if pawn_move || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        self.side_to_move.invert();
        if self.side_to_move.is_white() {
            self.fullmove_number += 1;
        }
    }

    #[inline]
    fn move_piece(&mut self, from: Square, to: Square) {
        self.board[to.index()] = self.board[from.index()].take();
    }

    /// Whether the game has ended: checkmate or stalemate when no legal
    /// move remains, ongoing otherwise.
    pub fn status(&self) -> GameStatus {
        if !self.legal_moves().is_empty() {
            GameStatus::Ongoing
        } else if self.in_check() {
            GameStatus::Checkmate(self.side_to_move)
        } else {
            GameStatus::Stalemate
        }
    }
}
impl From<Fen> for Position {
    fn from(fen: Fen) -> Self {
        Self {
            board: fen.board,
            side_to_move: fen.side_to_move,
            castling_rights: fen.castling_rights,
            en_passant: fen.en_passant,
            halfmove_clock: fen.halfmove_clock,
            fullmove_number: fen.fullmove_number,
            history: Vec::new(),
        }
    }
}
impl Default for Position {
    /// The standard starting position.
    fn default() -> Self {
        Self::initial()
    }
}
impl std::fmt::Display for Position {
    /// Renders the board as a bordered 8x8 grid with file and rank labels,
    /// followed by the FEN line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const BORDER: &str = "   +---+---+---+---+---+---+---+---+";
        for row in 0..8 {
            writeln!(f, "{BORDER}")?;
            write!(f, " {} |", 8 - row)?;
            for file in 0..8 {
                let piece = self.board[8 * row + file];
                write!(f, " {} |", piece.map_or(' ', |p| p.fen_char()))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{BORDER}")?;
        writeln!(f, "     a   b   c   d   e   f   g   h")?;
        writeln!(f)?;
        write!(f, "FEN: {}", self.fen())
    }
}
impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

/// The square of the pawn captured en passant: one rank behind the capture
/// destination from the mover's point of view.
#[inline]
fn en_passant_victim(to: Square, mover: Colour) -> Option<Square> {
    to.offset(0, -mover.forward())
}

/// The generator cannot overflow the move list from any position reachable
/// through `apply`; a full list means the board itself is corrupt.
#[inline]
fn push_move(moves: &mut MoveList, mv: Move) {
    if moves.push(mv).is_err() {
        unreachable!("move list overflow")
    }
}
