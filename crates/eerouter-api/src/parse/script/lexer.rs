// Tokenizer for the network-status script.
//
// Covers the lexical grammar the parser needs: identifiers, numbers,
// string/template/regex literals, punctuators and comments. Every token
// records whether a line break preceded it, which drives semicolon
// insertion in the parser.

use crate::parse::ParseError;

/// Punctuators, longest first so the scanner takes the maximal munch.
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<", ">>", "**", "{", "}", "(", ")", "[", "]", ";", ",", ":", ".", "?", "=",
    "+", "-", "*", "/", "%", "<", ">", "!", "&", "|", "^", "~",
];

/// Keywords after which a `/` starts a regex literal rather than a division.
const REGEX_PREFIX_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "instanceof",
    "in",
    "of",
    "new",
    "delete",
    "void",
    "throw",
    "case",
    "do",
    "else",
];

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// String literal: source text including quotes, and the cooked value.
    Str {
        raw: String,
        value: String,
    },
    Num(String),
    Regex(String),
    /// Template literal body, escapes and substitutions left as written.
    Template(String),
    Punct(&'static str),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
    pub newline_before: bool,
}

pub fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer::new(src);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token(tokens.last())?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_ident_part(c: char) -> bool {
    is_ident_start(c) || c.is_alphanumeric() || c == '\u{200c}' || c == '\u{200d}'
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if is_line_terminator(c) {
            // `\r\n` counts as one line break.
            if !(c == '\r' && self.peek() == Some('\n')) {
                self.line += 1;
                self.column = 1;
            }
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    /// Skip whitespace and comments. Returns whether a line break was crossed.
    fn skip_trivia(&mut self) -> Result<bool, ParseError> {
        let mut newline = false;
        loop {
            match self.peek() {
                Some(c) if is_line_terminator(c) => {
                    newline = true;
                    self.bump();
                }
                Some(c) if c.is_whitespace() || c == '\u{feff}' => {
                    self.bump();
                }
                Some('/') if self.peek_nth(1) == Some('/') => self.skip_line(),
                Some('/') if self.peek_nth(1) == Some('*') => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(c) if is_line_terminator(c) => newline = true,
                            Some(_) => {}
                            None => return Err(self.error("unterminated block comment")),
                        }
                    }
                }
                Some('<') if self.rest().starts_with("<!--") => self.skip_line(),
                Some('-') if newline && self.rest().starts_with("-->") => self.skip_line(),
                Some('#') if self.pos == 0 && self.peek_nth(1) == Some('!') => self.skip_line(),
                _ => return Ok(newline),
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.peek() {
            if is_line_terminator(c) {
                break;
            }
            self.bump();
        }
    }

    fn next_token(&mut self, prev: Option<&Token>) -> Result<Token, ParseError> {
        let newline_before = self.skip_trivia()?;
        let (line, column) = (self.line, self.column);

        let kind = match self.peek() {
            None => TokenKind::Eof,
            Some(c) if is_ident_start(c) || c == '\\' => TokenKind::Ident(self.identifier()?),
            Some(c) if c.is_ascii_digit() => TokenKind::Num(self.number()),
            Some('.') if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                TokenKind::Num(self.number())
            }
            Some(q @ ('\'' | '"')) => self.string(q)?,
            Some('`') => TokenKind::Template(self.template()?),
            Some('/') if regex_allowed(prev) => TokenKind::Regex(self.regex()?),
            Some(c) => {
                let rest = self.rest();
                let punct = PUNCTUATORS
                    .iter()
                    .find(|p| rest.starts_with(**p))
                    .ok_or_else(|| self.error(format!("unexpected character `{c}`")))?;
                for _ in 0..punct.len() {
                    self.bump();
                }
                TokenKind::Punct(punct)
            }
        };

        Ok(Token {
            kind,
            line,
            column,
            newline_before,
        })
    }

    fn identifier(&mut self) -> Result<String, ParseError> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                // `\uXXXX` escapes are legal inside identifiers.
                self.bump();
                if self.bump() != Some('u') {
                    return Err(self.error("invalid escape in identifier"));
                }
                name.push(self.unicode_escape()?);
            } else if is_ident_part(c) {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Ok(name)
    }

    fn number(&mut self) -> String {
        let start = self.pos;
        let hex = self.rest().starts_with("0x") || self.rest().starts_with("0X");
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.bump();
            } else if (c == '+' || c == '-')
                && !hex
                && self.src[start..self.pos].ends_with(['e', 'E'])
            {
                self.bump();
            } else {
                break;
            }
        }
        self.src[start..self.pos].to_owned()
    }

    fn string(&mut self, quote: char) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            let c = match self.peek() {
                Some(c) if c != '\n' && c != '\r' => c,
                _ => return Err(self.error("unterminated string literal")),
            };
            self.bump();
            if c == quote {
                break;
            } else if c == '\\' {
                if let Some(c) = self.escape()? {
                    value.push(c);
                }
            } else {
                value.push(c);
            }
        }
        Ok(TokenKind::Str {
            raw: self.src[start..self.pos].to_owned(),
            value,
        })
    }

    /// Decode the escape after a backslash. `None` for line continuations.
    fn escape(&mut self) -> Result<Option<char>, ParseError> {
        let c = self
            .bump()
            .ok_or_else(|| self.error("unterminated string literal"))?;
        Ok(match c {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            'b' => Some('\u{8}'),
            'f' => Some('\u{c}'),
            'v' => Some('\u{b}'),
            '0' if !self.peek().is_some_and(|c| c.is_ascii_digit()) => Some('\0'),
            'x' => {
                let code = self.hex_digits(2)?;
                Some(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
            }
            'u' => Some(self.unicode_escape()?),
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
                None
            }
            c if is_line_terminator(c) => None,
            c => Some(c),
        })
    }

    /// Body of a `\u` escape: `XXXX` or `{X..}`.
    fn unicode_escape(&mut self) -> Result<char, ParseError> {
        let code = if self.peek() == Some('{') {
            self.bump();
            let mut code = 0u32;
            loop {
                match self.bump() {
                    Some('}') => break,
                    Some(c) => {
                        let digit = c
                            .to_digit(16)
                            .ok_or_else(|| self.error("invalid unicode escape"))?;
                        code = code.saturating_mul(16).saturating_add(digit);
                    }
                    None => return Err(self.error("invalid unicode escape")),
                }
            }
            code
        } else {
            self.hex_digits(4)?
        };
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32, ParseError> {
        let mut code = 0u32;
        for _ in 0..count {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn template(&mut self) -> Result<String, ParseError> {
        self.bump();
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Some('`') if depth == 0 => {
                    let body = self.src[start..self.pos].to_owned();
                    self.bump();
                    return Ok(body);
                }
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some('$') if self.peek_nth(1) == Some('{') => {
                    depth += 1;
                    self.bump();
                    self.bump();
                }
                Some('}') if depth > 0 => {
                    depth -= 1;
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.error("unterminated template literal")),
            }
        }
    }

    fn regex(&mut self) -> Result<String, ParseError> {
        let start = self.pos;
        self.bump();
        let mut in_class = false;
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(c) if is_line_terminator(c) => {
                    return Err(self.error("unterminated regular expression"));
                }
                Some(_) => {}
                None => return Err(self.error("unterminated regular expression")),
            }
        }
        while self.peek().is_some_and(is_ident_part) {
            self.bump();
        }
        Ok(self.src[start..self.pos].to_owned())
    }
}

/// Whether a `/` after `prev` begins a regex literal.
fn regex_allowed(prev: Option<&Token>) -> bool {
    match prev.map(|t| &t.kind) {
        None => true,
        Some(TokenKind::Punct(p)) => !matches!(*p, ")" | "]" | "}"),
        Some(TokenKind::Ident(name)) => REGEX_PREFIX_KEYWORDS.contains(&name.as_str()),
        Some(_) => false,
    }
}
