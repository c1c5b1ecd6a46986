/// Byte cursor over an ASCII temporal literal.
///
/// Only ever advances over ASCII bytes, so `pos` always sits on a char
/// boundary and `rest()` is safe on arbitrary UTF-8 input.
pub(crate) struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    /// Consume `b` if it is next.
    pub fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume between `min` and `max` ASCII digits (greedy).
    pub fn digits(&mut self, min: usize, max: usize) -> Option<&'a str> {
        let start = self.pos;
        while self.pos - start < max && self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos - start < min {
            self.pos = start;
            return None;
        }
        Some(&self.text[start..self.pos])
    }

    /// 1–2 digit field such as month, hour or minute.
    pub fn field(&mut self) -> Option<u32> {
        self.digits(1, 2).and_then(|d| d.parse().ok())
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_respect_bounds() {
        let mut s = Scanner::new("12345x");
        assert_eq!(s.digits(1, 2), Some("12"));
        assert_eq!(s.digits(4, 10), None);
        assert_eq!(s.pos(), 2);
        assert_eq!(s.digits(1, 10), Some("345"));
        assert!(!s.eat(b'y'));
        assert!(s.eat(b'x'));
        assert!(s.is_done());
    }

    #[test]
    fn rest_after_ascii_prefix_keeps_utf8() {
        let mut s = Scanner::new("12 Europe/Zürich");
        s.field();
        s.skip_whitespace();
        assert_eq!(s.rest(), "Europe/Zürich");
    }
}
