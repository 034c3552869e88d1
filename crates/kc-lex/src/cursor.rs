//! Character cursor with one character of pushback.
//!
//! The classification rule in §4.1 always needs to look one byte past the
//! end of a multi-char token (the byte that decided the run was over) and
//! feed it back into the outer dispatch loop; `Cursor` exposes exactly the
//! `advance`/`peek`/`back` trio that requires, tracking line/column as it
//! goes. Grounded in `faxc-lex`'s `Cursor`, trimmed to the byte-oriented
//! ASCII model this language's source format uses (§6: "Encoding is treated
//! as byte-oriented ASCII").

pub struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
    line: u32,
    column: u32,
    pushed_back: bool,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            position: 0,
            line: 1,
            column: 1,
            pushed_back: false,
        }
    }

    /// The current byte without consuming it, or `None` at end of input.
    pub fn current(&self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.bytes.len()
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Consumes and returns the current byte, advancing position and
    /// line/column bookkeeping.
    pub fn advance(&mut self) -> Option<u8> {
        debug_assert!(!self.pushed_back, "advance() called with pending pushback");
        let b = self.current()?;
        self.position += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(b)
    }

    /// Re-examines the current byte on the next call to `current`/`advance`
    /// by rewinding position and line/column by exactly one byte.
    ///
    /// Only one level of pushback is supported, matching the "exactly one
    /// character of pushback" requirement in §4.1.
    pub fn back(&mut self) {
        debug_assert!(self.position > 0, "cannot push back before the start");
        self.position -= 1;
        let rewound = self.bytes[self.position];
        if rewound == b'\n' {
            self.line -= 1;
            // Column after rewinding a newline is unrecoverable without a
            // full rescan; it is only used for error spans, so an
            // approximation of column 1 is acceptable here.
            self.column = 1;
        } else {
            self.column -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_walks_bytes_in_order() {
        let mut c = Cursor::new("ab");
        assert_eq!(c.advance(), Some(b'a'));
        assert_eq!(c.advance(), Some(b'b'));
        assert_eq!(c.advance(), None);
    }

    #[test]
    fn back_re_presents_the_same_byte() {
        let mut c = Cursor::new("xy");
        assert_eq!(c.advance(), Some(b'x'));
        assert_eq!(c.advance(), Some(b'y'));
        c.back();
        assert_eq!(c.current(), Some(b'y'));
    }

    #[test]
    fn tracks_line_and_column() {
        let mut c = Cursor::new("ab\ncd");
        assert_eq!((c.line(), c.column()), (1, 1));
        c.advance();
        c.advance();
        assert_eq!((c.line(), c.column()), (1, 3));
        c.advance(); // consumes '\n'
        assert_eq!((c.line(), c.column()), (2, 1));
    }
}
