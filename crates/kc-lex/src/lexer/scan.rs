//! Byte-run scanning helpers shared by the classification dispatch.

use super::Lexer;

pub(super) const SYMBOL_CHARS: &[u8] = b"!$%&-=~^|@+:*<>/?.";

pub(super) fn is_symbol_byte(b: u8) -> bool {
    SYMBOL_CHARS.contains(&b)
}

impl<'a> Lexer<'a> {
    /// Consumes the maximal run of bytes satisfying `is_member`, starting
    /// from (and including) the current byte. The byte that ends the run
    /// is pushed back so the outer dispatch loop sees it next — the "one
    /// character of pushback" the classification rule requires.
    pub(super) fn consume_run(&mut self, is_member: impl Fn(u8) -> bool) -> String {
        let mut buf = Vec::new();
        while let Some(b) = self.cursor.advance() {
            if is_member(b) {
                buf.push(b);
            } else {
                self.cursor.back();
                break;
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
