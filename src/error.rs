//! Error types and position tracking for properties parsing
//!
//! Lexical and grammar errors carry the [`Position`] where they were detected.
//! Everything a caller can hit is folded into [`PropertiesError`].

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Line, column and byte offset of a character in configuration text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, counted in characters)
    pub column: usize,
    /// Byte offset into the configuration text
    pub offset: usize,
}

impl Position {
    /// Position of the first character
    pub fn new() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Moves past `c`, starting a new line after `\n`
    pub fn advance(&mut self, c: char) {
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            _ => {
                self.column += 1;
            }
        }
        self.offset += c.len_utf8();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Range of configuration text covered by a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First character
    pub start: Position,
    /// End position of the span (exclusive)
    pub end: Position,
}

impl Span {
    /// Span from `start` up to `end`
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the source text covered by this span
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start.offset..self.end.offset).unwrap_or("")
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{}-{}",
                self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Main error type for every operation of this crate
#[derive(Debug, Error)]
pub enum PropertiesError {
    /// Lexical analysis error
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),

    /// Grammar error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Deserialization into a user type failed
    #[error("Serde error: {0}")]
    Serde(#[from] SerdeError),

    /// The configuration source failed while being read
    #[error("Error reading configuration: {source}")]
    Read {
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be opened
    #[error("Cannot open configuration file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Neither a file name nor an input stream was set before reading
    #[error("No configuration file name or input stream defined")]
    NoInputSource,

    /// A property was looked up that does not exist on this level
    #[error("Cannot find property {name}")]
    NotFound { name: String },

    /// A property with the same name already exists on this level
    #[error("Property already exists: {name}")]
    Duplicate { name: String },

    /// A property without a name was inserted
    #[error("Property name must not be empty")]
    EmptyName,

    /// A property name that would not read back as a single key
    #[error("Property name {name:?} contains a delimiter or starts a comment")]
    InvalidName { name: String },

    /// A float that has no integer counterpart
    #[error("Property {name} value {value} does not fit into an integer")]
    OutOfRange { name: String, value: f64 },

    /// A typed accessor was used on a property of another kind
    #[error("Property {name} is not a {expected} value (it is a {actual} property)")]
    WrongType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl PropertiesError {
    /// Returns true for [`PropertiesError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, PropertiesError::NotFound { .. })
    }

    /// Returns true for duplicate keys, whether raised by an insert or while parsing
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            PropertiesError::Duplicate { .. }
                | PropertiesError::Parse(ParseError::DuplicateKey { .. })
        )
    }

    /// Returns true for [`PropertiesError::WrongType`]
    pub fn is_wrong_type(&self) -> bool {
        matches!(self, PropertiesError::WrongType { .. })
    }

    /// Source position of lexical and grammar errors
    pub fn position(&self) -> Option<Position> {
        match self {
            PropertiesError::Lex(e) => Some(e.position()),
            PropertiesError::Parse(e) => Some(e.position()),
            _ => None,
        }
    }
}

/// Lexical analysis errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// Quoted string not closed before end of input
    #[error("Unterminated string at {position}")]
    UnterminatedString { position: Position },

    /// Integer literal outside the representable range
    #[error("Invalid number '{text}' at {position}: {message}")]
    InvalidNumber {
        text: String,
        message: String,
        position: Position,
    },
}

impl LexError {
    /// Position where the error was detected
    pub fn position(&self) -> Position {
        match self {
            LexError::UnterminatedString { position }
            | LexError::InvalidNumber { position, .. } => *position,
        }
    }
}

/// Grammar errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Lexical error surfaced while the parser pulled the next token
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Token does not fit the grammar at this point
    #[error("Unexpected token {token} at {position}, expected {expected}")]
    UnexpectedToken {
        token: String,
        expected: String,
        position: Position,
    },

    /// Same key twice on one structure level
    #[error("Duplicate key '{key}' at {position}")]
    DuplicateKey { key: String, position: Position },

    /// End of input before the closing '}' of a structure
    #[error("Structure '{key}' opened at {position} is not terminated")]
    UnterminatedStruct { key: String, position: Position },

    /// Configured nesting limit exceeded
    #[error("Maximum nesting depth exceeded at {position}")]
    MaxDepthExceeded { position: Position },
}

impl ParseError {
    /// Position where the error was detected
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position(),
            ParseError::UnexpectedToken { position, .. }
            | ParseError::DuplicateKey { position, .. }
            | ParseError::UnterminatedStruct { position, .. }
            | ParseError::MaxDepthExceeded { position } => *position,
        }
    }
}

/// Serde deserialization errors
#[derive(Debug, Error)]
pub enum SerdeError {
    /// Custom error from a `Deserialize` impl
    #[error("{0}")]
    Custom(String),

    /// Property kind does not fit the requested Rust type
    #[error("Type mismatch for '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },
}

impl serde::de::Error for PropertiesError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        PropertiesError::Serde(SerdeError::Custom(msg.to_string()))
    }
}

impl serde::de::Error for SerdeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        SerdeError::Custom(msg.to_string())
    }
}
