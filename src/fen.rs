//! Forsyth-Edwards Notation parsing and formatting.
//!
//! A [`Fen`] is the parsed form of the six whitespace-separated FEN fields:
//! piece placement, side to move, castling rights, en passant target and the
//! two move clocks. Parsing goes through [`std::str::FromStr`], formatting
//! through [`std::fmt::Display`], and the two are exact inverses for every
//! position this crate can reach.

use thiserror::Error;

use crate::{
    castling_rights::CastlingRights,
    colour::Colour,
    piece::Piece,
    square::{Rank, Square},
};

/// The standard chess starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN parsing errors.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum FenError {
    #[error("expected 6 whitespace-separated fields, found {0}")]
    NotEnoughFields(usize),
    #[error("unexpected character {0:?} in the piece placement field")]
    UnexpectedPlacementChar(char),
    #[error("piece placement describes {0} squares instead of 64")]
    WrongSquareCount(usize),
    #[error("invalid side to move field {0:?}")]
    InvalidSideToMove(String),
    #[error("invalid castling rights field {0:?}")]
    InvalidCastlingRights(String),
    #[error("invalid en passant field {0:?}")]
    InvalidEnPassant(String),
    #[error("move clock {0:?} is not a number")]
    InvalidClock(String),
}

/// The parsed fields of a FEN string.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Fen {
    /// Piece placement, indexed by [`Square`] (a8 first, h1 last).
    pub board: [Option<Piece>; 64],
    pub side_to_move: Colour,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}
impl std::str::FromStr for Fen {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_ascii_whitespace().collect();
        if fields.len() < 6 {
            return Err(FenError::NotEnoughFields(fields.len()));
        }

        // Piece placement, rank 8 down to rank 1. Each rank separator simply
        // moves on to the next 8 squares, so only the total square count is
        // checked at the end.
        let mut squares = Vec::with_capacity(64);
        for c in fields[0].chars() {
            match c {
                '/' => continue,
                '1'..='8' => {
                    let run = c as usize - '0' as usize;
                    squares.resize(squares.len() + run, None);
                }
                c => match Piece::from_fen_char(c) {
                    Some(piece) => squares.push(Some(piece)),
                    None => return Err(FenError::UnexpectedPlacementChar(c)),
                },
            }
        }
        let count = squares.len();
        let board: [Option<Piece>; 64] = squares
            .try_into()
            .map_err(|_| FenError::WrongSquareCount(count))?;

        let side_to_move = match fields[1] {
            "w" => Colour::White,
            "b" => Colour::Black,
            field => return Err(FenError::InvalidSideToMove(field.to_string())),
        };

        let castling_rights = CastlingRights::from_fen_field(fields[2])
            .ok_or_else(|| FenError::InvalidCastlingRights(fields[2].to_string()))?;

        let en_passant = match fields[3] {
            "-" => None,
            field => {
                let square: Square = field
                    .parse()
                    .map_err(|_| FenError::InvalidEnPassant(field.to_string()))?;
                // The skipped square of a double push sits on rank 6 when
                // Black has just pushed, rank 3 when White has.
                let expected = match side_to_move {
                    Colour::White => Rank::Six,
                    Colour::Black => Rank::Three,
                };
                if square.rank() != expected {
                    return Err(FenError::InvalidEnPassant(field.to_string()));
                }
                Some(square)
            }
        };

        let halfmove_clock = fields[4]
            .parse()
            .map_err(|_| FenError::InvalidClock(fields[4].to_string()))?;
        let fullmove_number = fields[5]
            .parse()
            .map_err(|_| FenError::InvalidClock(fields[5].to_string()))?;

        Ok(Self {
            board,
            side_to_move,
            castling_rights,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }
}
impl std::fmt::Display for Fen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut empty_run = 0;
        for square in Square::all() {
            if square.index() > 0 && square.index() % 8 == 0 {
                if empty_run > 0 {
                    write!(f, "{empty_run}")?;
                    empty_run = 0;
                }
                write!(f, "/")?;
            }
            match self.board[square.index()] {
                Some(piece) => {
                    if empty_run > 0 {
                        write!(f, "{empty_run}")?;
                        empty_run = 0;
                    }
                    write!(f, "{piece}")?;
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            write!(f, "{empty_run}")?;
        }

        write!(
            f,
            " {} {} {} {} {}",
            if self.side_to_move.is_black() { 'b' } else { 'w' },
            self.castling_rights,
            match self.en_passant {
                Some(square) => square.to_string(),
                None => "-".to_string(),
            },
            self.halfmove_clock,
            self.fullmove_number,
        )
    }
}
impl std::fmt::Debug for Fen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    #[test]
    fn parse_start_position() {
        let fen: Fen = START_FEN.parse().unwrap();
        assert_eq!(fen.side_to_move, Colour::White);
        assert_eq!(fen.castling_rights, CastlingRights::full());
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert_eq!(
            fen.board[Square::A8.index()],
            Some(Piece::new(PieceKind::Rook, Colour::Black))
        );
        assert_eq!(
            fen.board[Square::E1.index()],
            Some(Piece::new(PieceKind::King, Colour::White))
        );
        assert_eq!(fen.board[Square::E4.index()], None);
    }

    #[test]
    fn display_round_trip() {
        for fen_str in [
            START_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pppp1ppp/8/8/3Pp3/8/PPP1PPPP/RNBQKBNR b KQkq d3 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 12 40",
        ] {
            let fen: Fen = fen_str.parse().unwrap();
            assert_eq!(fen.to_string(), fen_str);
        }
    }

    #[test]
    fn missing_fields() {
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -".parse::<Fen>(),
            Err(FenError::NotEnoughFields(4))
        );
        assert_eq!("".parse::<Fen>(), Err(FenError::NotEnoughFields(0)));
    }

    #[test]
    fn wrong_square_count() {
        // One pawn short on rank 7.
        assert_eq!(
            "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse::<Fen>(),
            Err(FenError::WrongSquareCount(63))
        );
        // A ninth rank.
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse::<Fen>(),
            Err(FenError::WrongSquareCount(72))
        );
    }

    #[test]
    fn bad_placement_character() {
        assert_eq!(
            "rnbqkbnr/ppppxppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse::<Fen>(),
            Err(FenError::UnexpectedPlacementChar('x'))
        );
    }

    #[test]
    fn non_numeric_clocks() {
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1".parse::<Fen>(),
            Err(FenError::InvalidClock("x".to_string()))
        );
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 one".parse::<Fen>(),
            Err(FenError::InvalidClock("one".to_string()))
        );
    }

    #[test]
    fn en_passant_must_sit_on_the_skipped_rank() {
        assert!(
            "rnbqkbnr/pppp1ppp/8/8/3Pp3/8/PPP1PPPP/RNBQKBNR b KQkq d3 0 3"
                .parse::<Fen>()
                .is_ok()
        );
        assert_eq!(
            "rnbqkbnr/pppp1ppp/8/8/3Pp3/8/PPP1PPPP/RNBQKBNR b KQkq d6 0 3".parse::<Fen>(),
            Err(FenError::InvalidEnPassant("d6".to_string()))
        );
        assert_eq!(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e7 0 1".parse::<Fen>(),
            Err(FenError::InvalidEnPassant("e7".to_string()))
        );
    }
}
