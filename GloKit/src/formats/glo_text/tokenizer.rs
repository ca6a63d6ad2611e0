//! Token scanner for the GLO text format
//!
//! Whitespace (space, tab, CR, LF) and `;` comments running to the end of the
//! line separate tokens. A token is either a double-quoted string, quotes
//! included, or a run of non-whitespace bytes.

use std::borrow::Cow;

use crate::error::{Error, Result};

/// One token and the line it starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Raw token bytes. Strings keep their surrounding quotes.
    pub text: &'a [u8],
    /// 1-based line number.
    pub line: usize,
}

impl Token<'_> {
    /// Whether this token is exactly `keyword`.
    pub fn is(&self, keyword: &str) -> bool {
        self.text == keyword.as_bytes()
    }

    pub fn is_string(&self) -> bool {
        self.text.first() == Some(&b'"')
    }

    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.text)
    }
}

/// Lazy tokenizer over a whole text buffer.
pub struct Tokenizer<'a> {
    data: &'a [u8],
    pos: usize,
    line: usize,
    peeked: Option<Option<Result<Token<'a>>>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            line: 1,
            peeked: None,
        }
    }

    /// Current line of the scanner, past any peeked token.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Option<&Result<Token<'a>>> {
        if self.peeked.is_none() {
            self.peeked = Some(self.scan());
        }
        self.peeked.as_ref().and_then(Option::as_ref)
    }

    fn skip_separators(&mut self) {
        while let Some(&byte) = self.data.get(self.pos) {
            match byte {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b';' => {
                    // Leave the newline for the next pass so the line count advances
                    while self.data.get(self.pos).is_some_and(|&b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn scan(&mut self) -> Option<Result<Token<'a>>> {
        self.skip_separators();
        let start = self.pos;
        let line = self.line;
        let first = *self.data.get(start)?;

        if first == b'"' {
            let Some(close) = self.data[start + 1..].iter().position(|&b| b == b'"') else {
                self.pos = self.data.len();
                return Some(Err(Error::parse(line, "unterminated string")));
            };
            let end = start + 1 + close + 1;
            let text = &self.data[start..end];
            self.line += text.iter().filter(|&&b| b == b'\n').count();
            self.pos = end;
            return Some(Ok(Token { text, line }));
        }

        let len = self.data[start..]
            .iter()
            .position(|&b| is_separator(b))
            .unwrap_or(self.data.len() - start);
        self.pos = start + len;
        Some(Ok(Token {
            text: &self.data[start..self.pos],
            line,
        }))
    }
}

fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.scan(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<String> {
        Tokenizer::new(input.as_bytes())
            .map(|token| token.unwrap().as_str().into_owned())
            .collect()
    }

    #[test]
    fn test_words_and_strings() {
        assert_eq!(
            texts("mesh \"Left Arm\" 0000 00ff {"),
            ["mesh", "\"Left Arm\"", "0000", "00ff", "{"]
        );
    }

    #[test]
    fn test_comments_and_lines() {
        let input = "; banner line\nobject {\n\t; inner\n\tanim \"a\"\r\n}\n";
        let tokens: Vec<Token> = Tokenizer::new(input.as_bytes())
            .map(Result::unwrap)
            .collect();
        let lines: Vec<(String, usize)> = tokens
            .iter()
            .map(|t| (t.as_str().into_owned(), t.line))
            .collect();
        assert_eq!(
            lines,
            [
                ("object".to_string(), 2),
                ("{".to_string(), 2),
                ("anim".to_string(), 4),
                ("\"a\"".to_string(), 4),
                ("}".to_string(), 5),
            ]
        );
    }

    #[test]
    fn test_comment_only_inside_separators() {
        // A ';' inside a word is part of the word
        assert_eq!(texts("a;b c"), ["a;b", "c"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(Tokenizer::new(b"").next().is_none());
        assert!(Tokenizer::new(b"  \n ; nothing\n").next().is_none());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut tokens = Tokenizer::new(b"vertex 1");
        assert!(tokens.peek().unwrap().as_ref().unwrap().is("vertex"));
        assert!(tokens.peek().unwrap().as_ref().unwrap().is("vertex"));
        assert!(tokens.next().unwrap().unwrap().is("vertex"));
        assert!(tokens.next().unwrap().unwrap().is("1"));
        assert!(tokens.peek().is_none());
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_unterminated_string() {
        let mut tokens = Tokenizer::new(b"\n\"open");
        let err = tokens.next().unwrap().unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_string_spanning_lines_advances_count() {
        let tokens: Vec<Token> = Tokenizer::new(b"\"a\nb\" next")
            .map(Result::unwrap)
            .collect();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
        assert!(tokens[1].is("next"));
    }
}
