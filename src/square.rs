//! Files, ranks and squares of the 8x8 board.
//!
//! Squares are numbered from the top-left corner of the board as White sees
//! it: index 0 is a8, index 7 is h8 and index 63 is h1. With this layout the
//! board scan order is exactly the order in which FEN lists its squares.

/// Files of the board (a-h).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}
impl File {
    /// A file from its index (a = 0 up to h = 7).
    ///
    /// Fails if the index is more than 7.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(unsafe { Self::from_index_unchecked(index) })
        } else {
            None
        }
    }

    /// A file from its index.
    /// # Safety
    /// An index of more than 7 results in undefined behavior.
    #[inline]
    pub const unsafe fn from_index_unchecked(index: u8) -> Self {
        std::mem::transmute(index)
    }
}
impl std::fmt::Display for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

/// Ranks of the board (1-8).
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}
impl Rank {
    /// A rank from its index (rank 1 = 0 up to rank 8 = 7).
    ///
    /// Fails if the index is more than 7.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 8 {
            Some(unsafe { Self::from_index_unchecked(index) })
        } else {
            None
        }
    }

    /// A rank from its index.
    /// # Safety
    /// An index of more than 7 results in undefined behavior.
    #[inline]
    pub const unsafe fn from_index_unchecked(index: u8) -> Self {
        std::mem::transmute(index)
    }
}
impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", 1 + *self as u8)
    }
}

/// A square of the board, numbered a8 = 0 through h1 = 63.
#[repr(u8)]
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
}
impl Square {
    /// The square sitting on the given file and rank.
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { Self::from_index_unchecked(8 * (7 - rank as u8) + file as u8) }
    }

    /// A square from its index.
    ///
    /// Fails if the index is more than 63.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(unsafe { Self::from_index_unchecked(index) })
        } else {
            None
        }
    }

    /// A square from its index.
    /// # Safety
    /// An index of more than 63 results in undefined behavior.
    #[inline]
    pub const unsafe fn from_index_unchecked(index: u8) -> Self {
        std::mem::transmute(index)
    }

    /// Returns the index of the square, in `0..64`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the file of the square.
    #[inline]
    pub const fn file(self) -> File {
        unsafe { File::from_index_unchecked(self as u8 % 8) }
    }

    /// Returns the rank of the square.
    #[inline]
    pub const fn rank(self) -> Rank {
        unsafe { Rank::from_index_unchecked(7 - self as u8 / 8) }
    }

    /// The square reached by moving `df` files towards h and `dr` ranks
    /// towards rank 8.
    ///
    /// Returns `None` when the destination falls off the board, so offset
    /// arithmetic can never wrap around the a/h files or past the back
    /// ranks.
    #[inline]
    pub const fn offset(self, df: i8, dr: i8) -> Option<Self> {
        let file = self.file() as i8 + df;
        let rank = self.rank() as i8 + dr;
        if file < 0 || file > 7 || rank < 0 || rank > 7 {
            return None;
        }
        Some(unsafe { Self::from_index_unchecked((8 * (7 - rank) + file) as u8) })
    }

    /// An iterator over all squares in index order (a8, b8, ... h1).
    pub fn all() -> impl Iterator<Item = Self> {
        (0..64).map(|index| unsafe { Self::from_index_unchecked(index) })
    }
}
impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}
impl std::str::FromStr for Square {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file @ 'a'..='h'), Some(rank @ '1'..='8'), None) =
            (chars.next(), chars.next(), chars.next())
        else {
            return Err(());
        };
        let file = File::from_index(file as u8 - b'a').ok_or(())?;
        let rank = Rank::from_index(rank as u8 - b'1').ok_or(())?;
        Ok(Self::new(file, rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_indices() {
        assert_eq!(Square::A8.index(), 0);
        assert_eq!(Square::H8.index(), 7);
        assert_eq!(Square::A1.index(), 56);
        assert_eq!(Square::H1.index(), 63);
    }

    #[test]
    fn file_and_rank_round_trip() {
        for square in Square::all() {
            assert_eq!(Square::new(square.file(), square.rank()), square);
        }
    }

    #[test]
    fn offsets_stay_on_the_board() {
        assert_eq!(Square::E4.offset(0, 1), Some(Square::E5));
        assert_eq!(Square::E4.offset(-1, -1), Some(Square::D3));
        assert_eq!(Square::A4.offset(-1, 0), None);
        assert_eq!(Square::H4.offset(1, 0), None);
        assert_eq!(Square::E8.offset(0, 1), None);
        assert_eq!(Square::E1.offset(0, -1), None);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("e4".parse(), Ok(Square::E4));
        assert_eq!("a8".parse(), Ok(Square::A8));
        assert_eq!(Square::H1.to_string(), "h1");
        assert!("e9".parse::<Square>().is_err());
        assert!("i4".parse::<Square>().is_err());
        assert!("e44".parse::<Square>().is_err());
    }
}
