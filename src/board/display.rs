use std::fmt;

use super::{Board, BoardView, Coordinate, Squares};

/// Plain-text diagram: rank numbers on the left, files along the bottom,
/// FEN letters for pieces and `.` for empty squares.
impl<S: Squares> fmt::Display for Board<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        for y in 0..size {
            write!(f, "{} ", size - y)?;
            for x in 0..size {
                let c = match self.occupant(Coordinate::new(x, y)) {
                    Some(occupant) => occupant.kind.to_fen_char(occupant.team),
                    None => '.',
                };
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for x in 0..size {
            let file = (b'a' + x as u8) as char;
            write!(f, " {file}")?;
        }
        writeln!(f)
    }
}
