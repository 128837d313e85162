//! Properties lexical analyzer
//!
//! This module turns configuration text into a stream of tokens. Numeric and
//! boolean words are classified here and carry both their converted value and
//! the exact lexeme they were read from.

use crate::convert;
use crate::error::{LexError, Position, Span};
use std::borrow::Cow;

/// Properties token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    // Literals
    Word(&'a str),
    QuotedString(Cow<'a, str>),
    Integer { value: i64, text: &'a str },
    Float { value: f64, text: &'a str },
    Boolean { value: bool, text: &'a str },

    // Structural tokens
    Equals,      // =
    Comma,       // ,
    StructStart, // {
    StructEnd,   // }

    Eof,
}

impl<'a> Token<'a> {
    /// Returns a string representation of the token type for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Token::Word(_) => "word",
            Token::QuotedString(_) => "quoted string",
            Token::Integer { .. } => "integer",
            Token::Float { .. } => "float",
            Token::Boolean { .. } => "boolean",
            Token::Equals => "'='",
            Token::Comma => "','",
            Token::StructStart => "'{'",
            Token::StructEnd => "'}'",
            Token::Eof => "end of file",
        }
    }

    /// Text of a scalar token: the lexeme, or the unescaped content of a quoted string
    pub fn scalar_text(&self) -> Option<&str> {
        match self {
            Token::Word(text)
            | Token::Integer { text, .. }
            | Token::Float { text, .. }
            | Token::Boolean { text, .. } => Some(*text),
            Token::QuotedString(value) => Some(value.as_ref()),
            _ => None,
        }
    }

    /// Returns true for tokens that can name a property
    pub fn is_key(&self) -> bool {
        matches!(
            self,
            Token::Word(_) | Token::Integer { .. } | Token::Float { .. } | Token::Boolean { .. }
        )
    }
}

/// Classification of an unquoted run of characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Plain,
    Decimal,
    Octal,
    Binary,
    Hex,
    Float,
    Boolean(bool),
}

/// Classifies an unquoted word, numeric and boolean shapes first
pub fn classify_word(text: &str) -> WordClass {
    if is_hex_literal(text) {
        WordClass::Hex
    } else if is_binary_literal(text) {
        WordClass::Binary
    } else if is_octal_literal(text) {
        WordClass::Octal
    } else if is_decimal_literal(text) {
        WordClass::Decimal
    } else if is_float_literal(text) {
        WordClass::Float
    } else if let Some(value) = boolean_keyword(text) {
        WordClass::Boolean(value)
    } else {
        WordClass::Plain
    }
}

fn is_hex_literal(text: &str) -> bool {
    let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"));
    matches!(digits, Some(d) if !d.is_empty() && d.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn is_binary_literal(text: &str) -> bool {
    let digits = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B"));
    matches!(digits, Some(d) if !d.is_empty() && d.bytes().all(|b| b == b'0' || b == b'1'))
}

fn is_octal_literal(text: &str) -> bool {
    matches!(text.strip_prefix('0'), Some(d) if d.bytes().all(|b| (b'0'..=b'7').contains(&b)))
}

fn is_decimal_literal(text: &str) -> bool {
    let (signed, digits) = match text.as_bytes().first() {
        Some(b'+' | b'-') => (true, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    // unsigned leading zeros belong to octal
    signed || !digits.starts_with('0') || digits.len() == 1
}

fn is_float_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let count_digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let integer_digits = count_digits(i);
    i += integer_digits;

    let has_dot = bytes.get(i) == Some(&b'.');
    let mut fraction_digits = 0;
    if has_dot {
        i += 1;
        fraction_digits = count_digits(i);
        i += fraction_digits;
    }

    let mut has_exponent = false;
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exponent_digits = count_digits(i);
        if exponent_digits == 0 {
            return false;
        }
        i += exponent_digits;
        has_exponent = true;
    }

    if i != bytes.len() {
        return false;
    }
    if has_dot {
        integer_digits + fraction_digits > 0
    } else {
        integer_digits > 0 && has_exponent
    }
}

fn boolean_keyword(text: &str) -> Option<bool> {
    const KEYWORDS: [(&str, bool); 6] = [
        ("true", true),
        ("false", false),
        ("yes", true),
        ("no", false),
        ("on", true),
        ("off", false),
    ];
    KEYWORDS
        .iter()
        .find(|(keyword, _)| keyword.len() == text.len() && keyword.eq_ignore_ascii_case(text))
        .map(|(_, value)| *value)
}

/// Returns true when the character ends an unquoted word
#[inline(always)]
fn is_word_delimiter(ch: char, mode: LexMode) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n' | ',' | '{' | '}' | '"') || (ch == '=' && mode == LexMode::Key)
}

/// Returns true when `name` reads back as a single key token
pub(crate) fn is_valid_key(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('#')
        && !name.chars().any(|ch| is_word_delimiter(ch, LexMode::Key))
}

/// Whether the lexer is reading a key or the value after `=`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexMode {
    Key,
    Value,
}

/// Properties lexer for tokenizing configuration text
#[derive(Debug, Clone)]
pub struct PropertiesLexer<'a> {
    /// Input text being lexed
    input: &'a str,
    /// Position of the current character
    position: Position,
    /// Cached current character
    current_char: Option<char>,
    /// Key or value scanning
    mode: LexMode,
    /// Start position of the last produced token
    last_token_start: Position,
    /// End position (exclusive) of the last produced token
    last_token_end: Position,
    /// A comma lets a value continue on the next line
    last_was_comma: bool,
    /// Set once the iterator has yielded end of input or an error
    finished: bool,
}

impl<'a> PropertiesLexer<'a> {
    /// Creates a new lexer over the given text
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: Position::new(),
            current_char: input.chars().next(),
            mode: LexMode::Key,
            last_token_start: Position::new(),
            last_token_end: Position::new(),
            last_was_comma: false,
            finished: false,
        }
    }

    /// Returns the current position in the input
    #[inline(always)]
    pub fn current_position(&self) -> Position {
        self.position
    }

    /// Returns the underlying source text
    pub fn source(&self) -> &'a str {
        self.input
    }

    /// Start position of the last produced token
    pub fn last_token_start(&self) -> Position {
        self.last_token_start
    }

    /// Span of the last produced token
    pub fn last_token_span(&self) -> Span {
        Span::new(self.last_token_start, self.last_token_end)
    }

    #[inline(always)]
    fn record_token_span(&mut self, start: Position) {
        self.last_token_start = start;
        self.last_token_end = self.position;
    }

    #[inline(always)]
    fn peek_char(&self) -> Option<char> {
        self.input[self.position.offset..].chars().next()
    }

    /// Advances to the next character and returns it
    #[inline(always)]
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.current_char?;
        self.position.advance(ch);
        self.current_char = self.peek_char();
        Some(ch)
    }

    /// Skips blanks, line breaks and comments
    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.current_char {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    if self.mode == LexMode::Value && !self.last_was_comma {
                        self.mode = LexMode::Key;
                    }
                    self.advance();
                }
                '#' => self.skip_single_line_comment(),
                _ => break,
            }
        }
    }

    /// Skips a `#` comment up to, not including, the line break
    fn skip_single_line_comment(&mut self) {
        while let Some(ch) = self.current_char {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Returns the next token
    pub fn next_token(&mut self) -> Result<Token<'a>, LexError> {
        self.skip_whitespace_and_comments();
        let token_start = self.current_position();

        let token = match self.current_char {
            None => Token::Eof,
            Some('=') if self.mode == LexMode::Key => {
                self.advance();
                self.mode = LexMode::Value;
                Token::Equals
            }
            Some(',') => {
                self.advance();
                Token::Comma
            }
            Some('{') => {
                self.advance();
                self.mode = LexMode::Key;
                Token::StructStart
            }
            Some('}') => {
                self.advance();
                self.mode = LexMode::Key;
                Token::StructEnd
            }
            Some('"') => self.lex_quoted_string()?,
            Some(_) => self.lex_word(token_start)?,
        };

        self.record_token_span(token_start);
        self.last_was_comma = token == Token::Comma;
        Ok(token)
    }

    /// Lexes a double-quoted string, borrowing from the input when it has no escapes
    fn lex_quoted_string(&mut self) -> Result<Token<'a>, LexError> {
        let start_pos = self.current_position();

        // Skip opening quote
        self.advance();
        let content_start = self.position.offset;
        let mut has_escapes = false;

        loop {
            match self.current_char {
                None => return Err(LexError::UnterminatedString { position: start_pos }),
                Some('"') => break,
                Some('\\') => {
                    has_escapes = true;
                    self.advance();
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        let raw = &self.input[content_start..self.position.offset];
        // Skip closing quote
        self.advance();

        let value = if has_escapes {
            Cow::Owned(Self::unescape_string(raw))
        } else {
            Cow::Borrowed(raw)
        };
        Ok(Token::QuotedString(value))
    }

    /// Resolves backslash escapes; an unknown escape yields the escaped character itself
    pub fn unescape_string(input: &str) -> String {
        let mut result = String::with_capacity(input.len());
        let mut chars = input.chars();

        while let Some(ch) = chars.next() {
            if ch != '\\' {
                result.push(ch);
                continue;
            }
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('f') => result.push('\u{000C}'),
                Some('v') => result.push('\u{000B}'),
                Some(other) => result.push(other),
                None => result.push('\\'),
            }
        }

        result
    }

    /// Lexes an unquoted word and classifies it
    fn lex_word(&mut self, start_pos: Position) -> Result<Token<'a>, LexError> {
        let start_offset = self.position.offset;
        while let Some(ch) = self.current_char {
            if is_word_delimiter(ch, self.mode) {
                break;
            }
            self.advance();
        }
        let text = &self.input[start_offset..self.position.offset];

        let invalid_number = |radix: &str| LexError::InvalidNumber {
            text: text.to_string(),
            message: format!("{radix} integer does not fit into 64 bits"),
            position: start_pos,
        };

        let token = match classify_word(text) {
            WordClass::Plain => Token::Word(text),
            WordClass::Decimal => Token::Integer {
                value: convert::decimal_to_int(text).ok_or_else(|| invalid_number("decimal"))?,
                text,
            },
            WordClass::Octal => Token::Integer {
                value: convert::octal_to_int(text).ok_or_else(|| invalid_number("octal"))?,
                text,
            },
            WordClass::Binary => Token::Integer {
                value: convert::binary_to_int(text).ok_or_else(|| invalid_number("binary"))?,
                text,
            },
            WordClass::Hex => Token::Integer {
                value: convert::hex_to_int(text).ok_or_else(|| invalid_number("hexadecimal"))?,
                text,
            },
            WordClass::Float => Token::Float {
                value: convert::to_float(text).ok_or_else(|| LexError::InvalidNumber {
                    text: text.to_string(),
                    message: "malformed float literal".to_string(),
                    position: start_pos,
                })?,
                text,
            },
            WordClass::Boolean(value) => Token::Boolean { value, text },
        };
        Ok(token)
    }
}

impl<'a> Iterator for PropertiesLexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(Token::Eof) => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
