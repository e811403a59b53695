use std::iter::Peekable;
use std::str::CharIndices;

/// Splits an instruction line into whitespace-separated tokens.
///
/// A `"` or `'` opens a quoted span that runs to the matching quote; spaces
/// inside it do not split. Quotes may start mid-token (`file="a b.ogg"`), and
/// they are kept in the token text. Use [`unquote`] on values.
pub struct Tokenizer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Tokenizer { src, chars: src.char_indices().peekable() }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if is_blank(c) {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    //Consume through the closing quote, or to the end if it never closes
    fn quoted(&mut self, quote: char) {
        for (_, c) in self.chars.by_ref() {
            if c == quote {
                return;
            }
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let &(start, _) = self.chars.peek()?;
        let mut end = self.src.len();
        while let Some(&(i, c)) = self.chars.peek() {
            if is_blank(c) {
                end = i;
                break;
            }
            self.chars.next();
            if c == '"' || c == '\'' {
                self.quoted(c);
            }
        }
        Some(&self.src[start..end])
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

pub fn tokenize(src: &str) -> Vec<&str> {
    Tokenizer::new(src).collect()
}

/// Strips one pair of matching outer quotes.
pub fn unquote(token: &str) -> &str {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &token[1..token.len() - 1];
        }
    }
    token
}

pub fn is_quoted(token: &str) -> bool {
    unquote(token).len() != token.len()
}

/// Splits `name=value` at the first `=` that is outside any quote.
/// Tokens that start with a quote are never named.
pub fn split_named(token: &str) -> Option<(&str, &str)> {
    if token.starts_with('"') || token.starts_with('\'') {
        return None;
    }
    let mut quote = None;
    for (i, c) in token.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '=') if i > 0 => return Some((&token[..i], &token[i + 1..])),
            _ => {}
        }
    }
    None
}
