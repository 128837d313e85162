//! Properties parser for converting tokens into a property tree
//!
//! Recursive descent over the token stream of [`PropertiesLexer`]:
//!
//! ```text
//! config   := (property)*
//! property := KEY '=' value
//! value    := scalar | scalar (',' scalar)+ | '{' config '}'
//! ```

use crate::error::{ParseError, Position};
use crate::lexer::{PropertiesLexer, Token};
use crate::properties::Properties;
use crate::property::{Property, PropertyValue, ValueList};
use tracing::trace;

/// Configuration options for the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum structure nesting depth, unbounded when `None`
    pub max_depth: Option<usize>,
    /// Newline escape policy stamped on every parsed property
    pub escape_newlines: bool,
}

impl ParserConfig {
    /// Creates a new parser configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets whether `\n` and `\r` are escaped when parsed properties are rendered
    pub fn with_escape_newlines(mut self, escape: bool) -> Self {
        self.escape_newlines = escape;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            escape_newlines: true,
        }
    }
}

/// Properties parser
pub struct PropertiesParser<'a> {
    lexer: PropertiesLexer<'a>,
    current_token: Token<'a>,
    current_token_start: Position,
    config: ParserConfig,
    depth: usize,
}

impl<'a> PropertiesParser<'a> {
    /// Creates a new parser with default configuration
    pub fn new(input: &'a str) -> Result<Self, ParseError> {
        Self::with_config(input, ParserConfig::default())
    }

    /// Creates a new parser with custom configuration
    pub fn with_config(input: &'a str, config: ParserConfig) -> Result<Self, ParseError> {
        let mut lexer = PropertiesLexer::new(input);
        let current_token = lexer.next_token()?;
        let current_token_start = lexer.last_token_start();
        Ok(Self {
            lexer,
            current_token,
            current_token_start,
            config,
            depth: 0,
        })
    }

    /// Moves to the next token and returns the one just consumed
    fn advance_token(&mut self) -> Result<Token<'a>, ParseError> {
        let next = self.lexer.next_token()?;
        self.current_token_start = self.lexer.last_token_start();
        Ok(std::mem::replace(&mut self.current_token, next))
    }

    /// Expects a specific token and consumes it
    fn expect_token(&mut self, expected: &Token<'a>) -> Result<Token<'a>, ParseError> {
        if std::mem::discriminant(&self.current_token) == std::mem::discriminant(expected) {
            self.advance_token()
        } else {
            Err(self.unexpected(expected.type_name()))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = match self.current_token.scalar_text() {
            Some(text) => format!("{} '{}'", self.current_token.type_name(), text),
            None => self.current_token.type_name().to_string(),
        };
        ParseError::UnexpectedToken {
            token,
            expected: expected.to_string(),
            position: self.current_token_start,
        }
    }

    /// Parses the whole input into a new root level
    pub fn parse(mut self) -> Result<Properties, ParseError> {
        let mut root = Properties::new();
        self.parse_into(&mut root)?;
        Ok(root)
    }

    /// Parses the whole input, inserting every top-level property into `target`
    pub fn parse_into(&mut self, target: &mut Properties) -> Result<(), ParseError> {
        self.parse_level(target, None)
    }

    /// Parses properties until end of input, or until the `}` closing the structure `opened_by`
    fn parse_level(
        &mut self,
        target: &mut Properties,
        opened_by: Option<(&str, Position)>,
    ) -> Result<(), ParseError> {
        loop {
            if self.current_token.is_key() {
                self.parse_property(target)?;
                continue;
            }
            return match (&self.current_token, opened_by) {
                (Token::Eof, None) => Ok(()),
                (Token::Eof, Some((key, position))) => Err(ParseError::UnterminatedStruct {
                    key: key.to_string(),
                    position,
                }),
                (Token::StructEnd, Some(_)) => Ok(()),
                _ => Err(self.unexpected("property name")),
            };
        }
    }

    fn parse_property(&mut self, target: &mut Properties) -> Result<(), ParseError> {
        let key_start = self.current_token_start;
        let key = self
            .advance_token()?
            .scalar_text()
            .unwrap_or_default()
            .to_string();
        self.expect_token(&Token::Equals)?;

        if target.contains_property(&key) {
            return Err(ParseError::DuplicateKey {
                key,
                position: key_start,
            });
        }

        let (value, quoted) = self.parse_value(&key, key_start, target.struct_level())?;
        let property = Property::new(key, value)
            .with_quoted(quoted)
            .with_newline_escaped(self.config.escape_newlines);

        trace!(
            name = property.name(),
            kind = %property.kind(),
            level = target.struct_level(),
            "parsed property"
        );
        target.push_parsed(property);
        Ok(())
    }

    /// Parses a value; the flag tells whether it was a single quoted string
    fn parse_value(
        &mut self,
        key: &str,
        key_start: Position,
        level: usize,
    ) -> Result<(PropertyValue, bool), ParseError> {
        if self.current_token == Token::StructStart {
            let children = self.parse_struct(key, key_start, level)?;
            return Ok((PropertyValue::Struct(Box::new(children)), false));
        }

        let first = self.expect_scalar()?;
        if self.current_token != Token::Comma {
            return Ok(scalar_value(first));
        }

        let mut items = ValueList::new();
        items.push(first.scalar_text().unwrap_or_default().to_string());
        while self.current_token == Token::Comma {
            self.advance_token()?;
            let item = self.expect_scalar()?;
            items.push(item.scalar_text().unwrap_or_default().to_string());
        }
        Ok((PropertyValue::List(items), false))
    }

    fn expect_scalar(&mut self) -> Result<Token<'a>, ParseError> {
        if self.current_token.scalar_text().is_some() {
            self.advance_token()
        } else {
            Err(self.unexpected("value"))
        }
    }

    fn parse_struct(
        &mut self,
        key: &str,
        key_start: Position,
        level: usize,
    ) -> Result<Properties, ParseError> {
        let depth = self.depth + 1;
        if let Some(max_depth) = self.config.max_depth
            && depth > max_depth
        {
            return Err(ParseError::MaxDepthExceeded {
                position: self.current_token_start,
            });
        }

        self.expect_token(&Token::StructStart)?;

        let mut children = Properties::new();
        children.set_struct_level(level + 1);
        self.depth = depth;
        let result = self
            .parse_level(&mut children, Some((key, key_start)))
            .and_then(|()| self.expect_token(&Token::StructEnd));
        self.depth = depth - 1;

        result.map(|_| children)
    }
}

/// Converts a scalar token into a value and its quoting flag
fn scalar_value(token: Token<'_>) -> (PropertyValue, bool) {
    match token {
        Token::QuotedString(value) => (PropertyValue::String(value.into_owned()), true),
        Token::Integer { value, text } => (
            PropertyValue::Integer {
                value,
                text: text.to_string(),
            },
            false,
        ),
        Token::Float { value, text } => (
            PropertyValue::Float {
                value,
                text: text.to_string(),
            },
            false,
        ),
        Token::Boolean { value, text } => (
            PropertyValue::Boolean {
                value,
                text: text.to_string(),
            },
            false,
        ),
        other => (
            PropertyValue::String(other.scalar_text().unwrap_or_default().to_string()),
            false,
        ),
    }
}
