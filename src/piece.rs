//! Piece kinds, coloured pieces and their FEN letters.

use crate::colour::Colour;

/// The kind of a piece, one of Pawn, Knight, Bishop, Rook, Queen or King.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    /// The lowercase FEN letter for this kind.
    pub const fn letter(self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }
}
impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A coloured piece, as found on a board square.
///
/// An empty square is represented as `Option::<Piece>::None` rather than by a
/// dedicated marker value.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub colour: Colour,
}
impl Piece {
    /// Creates a new `kind` piece of the given `colour`.
    #[inline]
    pub const fn new(kind: PieceKind, colour: Colour) -> Self {
        Self { kind, colour }
    }

    /// Decodes a FEN piece letter ('P', 'N', 'B', 'R', 'Q', 'K', lowercase
    /// for Black).
    ///
    /// Unrecognized input yields `None`; it is up to the caller to decide
    /// whether that is an error.
    pub const fn from_fen_char(c: char) -> Option<Self> {
        let colour = if c.is_ascii_lowercase() {
            Colour::Black
        } else {
            Colour::White
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };
        Some(Self::new(kind, colour))
    }

    /// The FEN letter of this piece, uppercase for White.
    pub const fn fen_char(self) -> char {
        let c = self.kind.letter();
        if self.colour.is_white() {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}
impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

/// The kinds a pawn may promote to (knight, bishop, rook and queen).
///
/// Keeping this a separate type means a promotion move can never carry a
/// pawn or king as its replacement piece.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum PromotionTarget {
    Knight,
    Bishop,
    Rook,
    Queen,
}
impl PromotionTarget {
    /// All promotion targets, in the order the generator emits them.
    pub const ALL: [Self; 4] = [Self::Knight, Self::Bishop, Self::Rook, Self::Queen];
}
impl From<PromotionTarget> for PieceKind {
    fn from(target: PromotionTarget) -> Self {
        match target {
            PromotionTarget::Knight => PieceKind::Knight,
            PromotionTarget::Bishop => PieceKind::Bishop,
            PromotionTarget::Rook => PieceKind::Rook,
            PromotionTarget::Queen => PieceKind::Queen,
        }
    }
}
impl std::fmt::Display for PromotionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", PieceKind::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_letters_round_trip() {
        for c in "PNBRQKpnbrqk".chars() {
            let piece = Piece::from_fen_char(c).unwrap();
            assert_eq!(piece.fen_char(), c);
        }
    }

    #[test]
    fn case_encodes_colour() {
        assert_eq!(
            Piece::from_fen_char('Q'),
            Some(Piece::new(PieceKind::Queen, Colour::White))
        );
        assert_eq!(
            Piece::from_fen_char('q'),
            Some(Piece::new(PieceKind::Queen, Colour::Black))
        );
    }

    #[test]
    fn unknown_letters_are_rejected() {
        assert_eq!(Piece::from_fen_char('x'), None);
        assert_eq!(Piece::from_fen_char('1'), None);
        assert_eq!(Piece::from_fen_char('/'), None);
    }

    #[test]
    fn promotion_targets_exclude_pawn_and_king() {
        for target in PromotionTarget::ALL {
            let kind = PieceKind::from(target);
            assert!(kind != PieceKind::Pawn && kind != PieceKind::King);
        }
    }
}
