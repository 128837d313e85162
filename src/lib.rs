//! # typed-props
//!
//! A configuration file reader in the spirit of Java properties files, extended
//! with typed values, value lists and nested structures.
//!
//! ## Overview
//!
//! Every line of a configuration is a `name = value` pair. Values are read as
//! strings, integers, floats or booleans depending on how they are written,
//! comma separated values form lists, and `{ ... }` opens a nested level:
//!
//! ```text
//! # comment
//! title    = "Main window"
//! width    = 0x280
//! ratio    = 1.5e-1
//! visible  = Yes
//! fonts    = Arial, "Times New Roman"
//! position = {
//!     x = 10
//!     y = 20
//! }
//! ```
//!
//! ## Key Features
//!
//! - **Typed scalars**: decimal, octal (`0755`), hexadecimal (`0x1F`) and binary
//!   (`0b101`) integers, floats in several notations, and booleans
//!   (`true`/`false`/`yes`/`no`/`on`/`off`, any case)
//! - **Source fidelity**: scalars keep their original text, so rendering a tree
//!   writes numbers back the way they were read
//! - **Locale independent**: numbers are always read and written with a `.`
//!   decimal separator
//! - **Serde Integration**: deserialize a configuration straight into your own
//!   types with `#[derive(Deserialize)]`
//!
//! ## Basic Usage
//!
//! ```rust
//! use typed_props::Properties;
//!
//! let props: Properties = r#"
//!     name = "my-server"
//!     port = 8080
//!     debug = on
//! "#
//! .parse()?;
//!
//! assert_eq!(props.get_string("name", "")?, "my-server");
//! assert_eq!(props.get_int("port", 80)?, 8080);
//! assert_eq!(props.get_int("timeout", 30)?, 30);
//! assert!(props.get_bool("debug", false)?);
//! # Ok::<(), typed_props::PropertiesError>(())
//! ```
//!
//! ## Reading Files and Streams
//!
//! ```rust,no_run
//! use typed_props::Properties;
//!
//! let mut props = Properties::with_file_name("app.conf");
//! props.read_configuration()?;
//! for property in &props {
//!     println!("{} is a {}", property.name(), property.kind());
//! }
//! # Ok::<(), typed_props::PropertiesError>(())
//! ```
//!
//! ## Serde
//!
//! ```rust
//! use serde::Deserialize;
//! use typed_props::from_str;
//!
//! #[derive(Debug, Deserialize)]
//! struct Window {
//!     title: String,
//!     fonts: Vec<String>,
//!     position: Position,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Position {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let window: Window = from_str(
//!     "title = Main\nfonts = Arial, Helvetica\nposition = {\n x = 10\n y = 20\n}\n",
//! )?;
//! assert_eq!(window.fonts.len(), 2);
//! assert_eq!(window.position.y, 20);
//! # Ok::<(), typed_props::PropertiesError>(())
//! ```
//!
//! ## Error Handling
//!
//! Lexical and grammar errors report where they happened:
//!
//! ```rust
//! use typed_props::{LexError, Properties, PropertiesError};
//!
//! match "key = \"unterminated string".parse::<Properties>() {
//!     Err(PropertiesError::Lex(LexError::UnterminatedString { position })) => {
//!         assert_eq!(position.line, 1);
//!         assert_eq!(position.column, 7);
//!     }
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```

pub mod convert;
pub mod de;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod properties;
pub mod property;


// Re-export main types and functions
pub use de::{PropertiesDeserializer, PropertyDeserializer, from_properties, from_str};
pub use error::{LexError, ParseError, PropertiesError, SerdeError};
pub use lexer::{PropertiesLexer, Token};
pub use parser::{ParserConfig, PropertiesParser};
pub use properties::{InputSource, Properties};
pub use property::{Property, PropertyKind, PropertyValue, ValueList};

// Re-export position types
pub use error::{Position, Span};
