//! Property container and configuration source binding
//!
//! A [`Properties`] value is one level of the property tree: the root level
//! built by [`Properties::read_configuration`], or the children of a structure
//! property.

use crate::error::{ParseError, PropertiesError};
use crate::lexer::is_valid_key;
use crate::parser::{ParserConfig, PropertiesParser};
use crate::property::{Property, PropertyKind, PropertyValue};
use indexmap::IndexMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Where [`Properties::read_configuration`] takes its text from
pub enum InputSource {
    /// File opened and closed by the container
    File(PathBuf),
    /// Caller supplied stream, never closed by the container
    Stream(Box<dyn Read>),
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::File(path) => f.debug_tuple("File").field(path).finish(),
            InputSource::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// One level of the property tree
#[derive(Debug, Default)]
pub struct Properties {
    struct_level: usize,
    entries: IndexMap<String, Property>,
    source: Option<InputSource>,
    parser_config: ParserConfig,
}

impl Properties {
    /// Creates an empty root level without an input source
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a root level reading from the file at `path`
    pub fn with_file_name(path: impl Into<PathBuf>) -> Self {
        let mut properties = Self::new();
        properties.set_file_name(path);
        properties
    }

    /// Creates a root level reading from `stream`
    pub fn with_input_stream(stream: impl Read + 'static) -> Self {
        let mut properties = Self::new();
        properties.set_input_stream(stream);
        properties
    }

    /// Sets the parser configuration used by later reads
    pub fn with_parser_config(mut self, config: ParserConfig) -> Self {
        self.parser_config = config;
        self
    }

    pub fn set_parser_config(&mut self, config: ParserConfig) {
        self.parser_config = config;
    }

    pub fn parser_config(&self) -> &ParserConfig {
        &self.parser_config
    }

    /// Binds a file; replaces any stream set before
    pub fn set_file_name(&mut self, path: impl Into<PathBuf>) {
        self.source = Some(InputSource::File(path.into()));
    }

    /// Binds a stream; replaces any file name set before
    pub fn set_input_stream(&mut self, stream: impl Read + 'static) {
        self.source = Some(InputSource::Stream(Box::new(stream)));
    }

    /// Hands a bound stream back to the caller
    pub fn take_input_stream(&mut self) -> Option<Box<dyn Read>> {
        match self.source.take() {
            Some(InputSource::Stream(stream)) => Some(stream),
            other => {
                self.source = other;
                None
            }
        }
    }

    pub fn config_file_name(&self) -> Option<&Path> {
        match &self.source {
            Some(InputSource::File(path)) => Some(path),
            _ => None,
        }
    }

    /// True when the container opens and closes the configuration file itself
    pub fn is_config_file_managed_internally(&self) -> bool {
        matches!(self.source, Some(InputSource::File(_)))
    }

    /// Reads and parses the bound file or stream, replacing all entries
    pub fn read_configuration(&mut self) -> Result<(), PropertiesError> {
        self.entries.clear();

        let text = match self.source.as_mut() {
            None => return Err(PropertiesError::NoInputSource),
            Some(InputSource::File(path)) => {
                debug!(path = %path.display(), "reading configuration file");
                let mut file = File::open(&*path).map_err(|source| PropertiesError::Open {
                    path: path.clone(),
                    source,
                })?;
                read_text(&mut file)?
            }
            Some(InputSource::Stream(stream)) => {
                debug!("reading configuration stream");
                read_text(stream)?
            }
        };

        self.parse_text(&text)
    }

    /// Reads and parses everything `reader` yields, replacing all entries
    pub fn read_configuration_from<R: Read>(&mut self, mut reader: R) -> Result<(), PropertiesError> {
        self.entries.clear();
        debug!("reading configuration from reader");
        let text = read_text(&mut reader)?;
        self.parse_text(&text)
    }

    /// Parses configuration text, replacing all entries
    pub fn parse_str(&mut self, text: &str) -> Result<(), PropertiesError> {
        self.entries.clear();
        self.parse_text(text)
    }

    fn parse_text(&mut self, text: &str) -> Result<(), PropertiesError> {
        let result = PropertiesParser::with_config(text, self.parser_config)
            .and_then(|mut parser| parser.parse_into(self));
        match result {
            Ok(()) => {
                debug!(properties = self.entries.len(), "configuration read");
                Ok(())
            }
            Err(e) => {
                self.entries.clear();
                Err(match e {
                    ParseError::Lex(lex) => PropertiesError::Lex(lex),
                    other => PropertiesError::Parse(other),
                })
            }
        }
    }

    pub fn struct_level(&self) -> usize {
        self.struct_level
    }

    /// Sets the level of this container and, recursively, of everything it owns
    pub fn set_struct_level(&mut self, level: usize) {
        self.struct_level = level;
        for property in self.entries.values_mut() {
            property.set_struct_level(level);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Properties of this level in insertion order
    pub fn iter(&self) -> indexmap::map::Values<'_, String, Property> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains_property(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Looks a property up on this level only
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.entries.get(name)
    }

    /// Looks a property up on this level only, failing when it is absent
    pub fn search_property(&self, name: &str) -> Result<&Property, PropertiesError> {
        self.get(name).ok_or_else(|| PropertiesError::NotFound {
            name: name.to_string(),
        })
    }

    /// Takes ownership of `property` and stamps this level on it
    ///
    /// The name must read back as one key: no blanks, `=`, `,`, braces or
    /// quotes, and no leading `#`.
    pub fn insert_property(&mut self, property: Property) -> Result<(), PropertiesError> {
        if property.name().is_empty() {
            return Err(PropertiesError::EmptyName);
        }
        if !is_valid_key(property.name()) {
            return Err(PropertiesError::InvalidName {
                name: property.name().to_string(),
            });
        }
        if self.contains_property(property.name()) {
            return Err(PropertiesError::Duplicate {
                name: property.name().to_string(),
            });
        }
        self.push_parsed(property);
        Ok(())
    }

    /// Inserts a property whose name the parser has already checked
    pub(crate) fn push_parsed(&mut self, mut property: Property) {
        property.set_struct_level(self.struct_level);
        self.entries.insert(property.name().to_string(), property);
    }

    /// Removes a property, keeping the order of the remaining ones
    pub fn delete_property(&mut self, name: &str) -> Option<Property> {
        self.entries.shift_remove(name)
    }

    pub fn get_bool(&self, name: &str, default: bool) -> Result<bool, PropertiesError> {
        match self.get(name) {
            None => Ok(default),
            Some(property) => match property.value() {
                PropertyValue::Boolean { value, .. } => Ok(*value),
                _ => Err(property.wrong_type(PropertyKind::Boolean)),
            },
        }
    }

    pub fn get_float(&self, name: &str, default: f64) -> Result<f64, PropertiesError> {
        match self.get(name) {
            None => Ok(default),
            Some(property) => match property.value() {
                PropertyValue::Float { value, .. } => Ok(*value),
                _ => Err(property.wrong_type(PropertyKind::Float)),
            },
        }
    }

    pub fn get_int(&self, name: &str, default: i64) -> Result<i64, PropertiesError> {
        match self.get(name) {
            None => Ok(default),
            Some(property) => match property.value() {
                PropertyValue::Integer { value, .. } => Ok(*value),
                _ => Err(property.wrong_type(PropertyKind::Integer)),
            },
        }
    }

    /// Textual value of any non-structure property
    pub fn get_string<'a>(
        &'a self,
        name: &str,
        default: &'a str,
    ) -> Result<&'a str, PropertiesError> {
        match self.get(name) {
            None => Ok(default),
            Some(property) => property.string_value(),
        }
    }

    /// Renders this level as configuration text
    pub fn write_out(&self) -> String {
        self.to_string()
    }

    /// Writes the rendered configuration to `writer`
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

fn read_text(reader: &mut dyn Read) -> Result<String, PropertiesError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| PropertiesError::Read { source })?;
    Ok(text)
}

impl PartialEq for Properties {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Display for Properties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for property in self.entries.values() {
            writeln!(f, "{property}")?;
        }
        Ok(())
    }
}

impl FromStr for Properties {
    type Err = PropertiesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut properties = Properties::new();
        properties.parse_str(s)?;
        Ok(properties)
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = &'a Property;
    type IntoIter = indexmap::map::Values<'a, String, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
