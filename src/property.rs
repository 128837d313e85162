//! Property nodes and their typed values
//!
//! A [`Property`] is one `name = value` entry of a configuration level. Scalars
//! keep the exact text they were read from next to their converted value, so
//! rendering reproduces the source form. Lists and structures render lazily
//! and memoize the result until they are appended to.

use crate::convert::float_to_text;
use crate::error::PropertiesError;
use crate::lexer::{WordClass, classify_word};
use crate::properties::Properties;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::cell::OnceCell;
use std::fmt;

/// Items of a list property
pub type ValueList = SmallVec<[String; 4]>;

/// Kind of a property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    String,
    Integer,
    Float,
    Boolean,
    List,
    Struct,
}

impl PropertyKind {
    /// Human readable kind name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            PropertyKind::String => "String",
            PropertyKind::Integer => "Integer",
            PropertyKind::Float => "Float",
            PropertyKind::Boolean => "Boolean",
            PropertyKind::List => "List",
            PropertyKind::Struct => "Struct",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed value of a property
#[derive(Debug, PartialEq)]
pub enum PropertyValue {
    /// Unquoted word or unescaped quoted text
    String(String),
    Integer { value: i64, text: String },
    Float { value: f64, text: String },
    Boolean { value: bool, text: String },
    List(ValueList),
    Struct(Box<Properties>),
}

impl PropertyValue {
    /// Returns the kind of this value
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Integer { .. } => PropertyKind::Integer,
            PropertyValue::Float { .. } => PropertyKind::Float,
            PropertyValue::Boolean { .. } => PropertyKind::Boolean,
            PropertyValue::List(_) => PropertyKind::List,
            PropertyValue::Struct(_) => PropertyKind::Struct,
        }
    }

    /// Source text of a scalar value
    pub fn scalar_text(&self) -> Option<&str> {
        match self {
            PropertyValue::String(text)
            | PropertyValue::Integer { text, .. }
            | PropertyValue::Float { text, .. }
            | PropertyValue::Boolean { text, .. } => Some(text),
            PropertyValue::List(_) | PropertyValue::Struct(_) => None,
        }
    }
}

/// A named node of the property tree
#[derive(Debug)]
pub struct Property {
    name: String,
    value: PropertyValue,
    struct_level: usize,
    quoted: bool,
    newline_escaped: bool,
    cached_text: OnceCell<String>,
}

impl Property {
    /// Creates a property from a name and a value
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value,
            struct_level: 0,
            quoted: false,
            newline_escaped: true,
            cached_text: OnceCell::new(),
        }
    }

    /// Unquoted string property
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, PropertyValue::String(value.into()))
    }

    /// Integer property, its text is the decimal form of `value`
    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self::new(
            name,
            PropertyValue::Integer {
                value,
                text: value.to_string(),
            },
        )
    }

    /// Float property, its text always reads back as a float
    pub fn float(name: impl Into<String>, value: f64) -> Self {
        Self::new(
            name,
            PropertyValue::Float {
                value,
                text: float_to_text(value),
            },
        )
    }

    /// Boolean property written as `true` or `false`
    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self::new(
            name,
            PropertyValue::Boolean {
                value,
                text: value.to_string(),
            },
        )
    }

    /// List property from string items
    pub fn list<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            PropertyValue::List(items.into_iter().map(Into::into).collect()),
        )
    }

    /// Structure property owning `children`
    pub fn structure(name: impl Into<String>, children: Properties) -> Self {
        let mut property = Self::new(name, PropertyValue::Struct(Box::new(children)));
        property.set_struct_level(0);
        property
    }

    /// Marks the value as quoted in its source form
    pub fn with_quoted(mut self, quoted: bool) -> Self {
        self.quoted = quoted;
        self
    }

    /// Sets whether line breaks are escaped when rendering
    pub fn with_newline_escaped(mut self, escaped: bool) -> Self {
        self.set_newline_escaped(escaped);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn kind(&self) -> PropertyKind {
        self.value.kind()
    }

    pub fn struct_level(&self) -> usize {
        self.struct_level
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    pub fn is_newline_escaped(&self) -> bool {
        self.newline_escaped
    }

    /// Changes the newline escape policy used when rendering this property
    pub fn set_newline_escaped(&mut self, escaped: bool) {
        if self.newline_escaped != escaped {
            self.newline_escaped = escaped;
            self.cached_text.take();
        }
    }

    /// Sets the nesting level, children of a structure get `level + 1`
    pub fn set_struct_level(&mut self, level: usize) {
        self.struct_level = level;
        if let PropertyValue::Struct(children) = &mut self.value {
            children.set_struct_level(level + 1);
        }
        self.cached_text.take();
    }

    pub(crate) fn wrong_type(&self, expected: PropertyKind) -> PropertiesError {
        PropertiesError::WrongType {
            name: self.name.clone(),
            expected: expected.name(),
            actual: self.kind().name(),
        }
    }

    /// Textual form of any non-structure value
    ///
    /// Scalars return their source text, lists their rendered item list.
    pub fn string_value(&self) -> Result<&str, PropertiesError> {
        match &self.value {
            PropertyValue::Struct(_) => Err(self.wrong_type(PropertyKind::String)),
            PropertyValue::List(_) => Ok(self.lazy_text()),
            scalar => Ok(scalar.scalar_text().unwrap_or_default()),
        }
    }

    /// Integer value; a float is rounded to the nearest integer
    ///
    /// Fails with [`PropertiesError::OutOfRange`] for a float that is not finite
    /// or lies outside the `i64` range.
    pub fn int_value(&self) -> Result<i64, PropertiesError> {
        match &self.value {
            PropertyValue::Integer { value, .. } => Ok(*value),
            PropertyValue::Float { value, .. } => {
                let rounded = value.round();
                // i64::MIN is exactly -2^63, i64::MAX rounds up to 2^63
                if rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
                    Ok(rounded as i64)
                } else {
                    Err(PropertiesError::OutOfRange {
                        name: self.name.clone(),
                        value: *value,
                    })
                }
            }
            _ => Err(self.wrong_type(PropertyKind::Integer)),
        }
    }

    /// Float value; an integer is converted
    pub fn float_value(&self) -> Result<f64, PropertiesError> {
        match &self.value {
            PropertyValue::Float { value, .. } => Ok(*value),
            PropertyValue::Integer { value, .. } => Ok(*value as f64),
            _ => Err(self.wrong_type(PropertyKind::Float)),
        }
    }

    pub fn bool_value(&self) -> Result<bool, PropertiesError> {
        match &self.value {
            PropertyValue::Boolean { value, .. } => Ok(*value),
            _ => Err(self.wrong_type(PropertyKind::Boolean)),
        }
    }

    pub fn list_values(&self) -> Result<&[String], PropertiesError> {
        match &self.value {
            PropertyValue::List(items) => Ok(items),
            _ => Err(self.wrong_type(PropertyKind::List)),
        }
    }

    /// Child level of a structure property
    pub fn struct_value(&self) -> Result<&Properties, PropertiesError> {
        match &self.value {
            PropertyValue::Struct(children) => Ok(children),
            _ => Err(self.wrong_type(PropertyKind::Struct)),
        }
    }

    /// Appends an item to a list property
    pub fn append_string(&mut self, item: impl Into<String>) -> Result<(), PropertiesError> {
        match &mut self.value {
            PropertyValue::List(items) => {
                items.push(item.into());
                self.cached_text.take();
                Ok(())
            }
            _ => Err(self.wrong_type(PropertyKind::List)),
        }
    }

    /// Adds a child to a structure property
    pub fn add_property(&mut self, property: Property) -> Result<(), PropertiesError> {
        match &mut self.value {
            PropertyValue::Struct(children) => {
                children.insert_property(property)?;
                self.cached_text.take();
                Ok(())
            }
            _ => Err(self.wrong_type(PropertyKind::Struct)),
        }
    }

    /// Memoized text of a list or structure
    fn lazy_text(&self) -> &str {
        self.cached_text.get_or_init(|| match &self.value {
            PropertyValue::List(items) => items
                .iter()
                .map(|item| quote_text(item, self.newline_escaped))
                .collect::<Vec<_>>()
                .join(", "),
            PropertyValue::Struct(children) => {
                format!("{{\n{}{}}}", children, indent(self.struct_level))
            }
            scalar => scalar.scalar_text().unwrap_or_default().to_string(),
        })
    }

    /// Right-hand side of the rendered `name = value` line
    pub fn render_value(&self) -> Cow<'_, str> {
        match &self.value {
            PropertyValue::String(text) if self.quoted || needs_quoting(text) => {
                Cow::Owned(quote_text(text, self.newline_escaped))
            }
            PropertyValue::List(_) | PropertyValue::Struct(_) => Cow::Borrowed(self.lazy_text()),
            scalar => Cow::Borrowed(scalar.scalar_text().unwrap_or_default()),
        }
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value == other.value
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} = {}",
            indent(self.struct_level),
            self.name,
            self.render_value()
        )
    }
}

fn indent(level: usize) -> String {
    "\t".repeat(level)
}

/// Escapes text for use inside double quotes
pub fn escape_text(text: &str, escape_newlines: bool) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\u{000C}' => escaped.push_str("\\f"),
            '\t' => escaped.push_str("\\t"),
            '\u{000B}' => escaped.push_str("\\v"),
            '\n' if escape_newlines => escaped.push_str("\\n"),
            '\r' if escape_newlines => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn quote_text(text: &str, escape_newlines: bool) -> String {
    format!("\"{}\"", escape_text(text, escape_newlines))
}

/// An unquoted string must read back as one plain word
fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || text.starts_with('#')
        || text
            .chars()
            .any(|ch| matches!(ch, ' ' | '\t' | '\r' | '\n' | ',' | '{' | '}' | '"'))
        || classify_word(text) != WordClass::Plain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_constructors() {
        let p = Property::integer("port", 8080);
        assert_eq!(p.kind(), PropertyKind::Integer);
        assert_eq!(p.string_value().unwrap(), "8080");

        let p = Property::float("ratio", 2.0);
        assert_eq!(p.string_value().unwrap(), "2.0");

        let p = Property::boolean("enabled", false);
        assert_eq!(p.render_value(), "false");
    }

    #[test]
    fn test_numeric_cross_access() {
        assert_eq!(Property::float("f", 2.5).int_value().unwrap(), 3);
        assert_eq!(Property::float("f", -2.4).int_value().unwrap(), -2);
        assert_eq!(Property::integer("i", 7).float_value().unwrap(), 7.0);
        assert!(Property::string("s", "x").int_value().unwrap_err().is_wrong_type());
        assert!(Property::integer("i", 1).bool_value().is_err());
    }

    #[test]
    fn test_float_outside_integer_range() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 9.3e18, -1e19] {
            match Property::float("f", value).int_value() {
                Err(PropertiesError::OutOfRange { name, .. }) => assert_eq!(name, "f"),
                other => panic!("expected range error for {value}, got {other:?}"),
            }
        }
        assert_eq!(
            Property::float("f", -9223372036854775808.0).int_value().unwrap(),
            i64::MIN
        );
        assert_eq!(
            Property::float("f", 9.2e18).int_value().unwrap(),
            9_200_000_000_000_000_000
        );
    }

    #[test]
    fn test_list_text_is_quoted_and_cached() {
        let mut p = Property::list("l", ["item1", " item 2 ", "item3"]);
        assert_eq!(p.string_value().unwrap(), r#""item1", " item 2 ", "item3""#);

        p.append_string("a\"b").unwrap();
        assert_eq!(
            p.string_value().unwrap(),
            r#""item1", " item 2 ", "item3", "a\"b""#
        );
        assert_eq!(p.list_values().unwrap().len(), 4);
    }

    #[test]
    fn test_struct_text_and_levels() {
        let mut children = Properties::new();
        children.insert_property(Property::integer("x", 1)).unwrap();
        let mut p = Property::structure("s", children);
        p.set_struct_level(1);

        assert!(p.string_value().unwrap_err().is_wrong_type());
        assert_eq!(p.render_value(), "{\n\t\tx = 1\n\t}");

        p.add_property(Property::string("y", "z")).unwrap();
        assert_eq!(p.render_value(), "{\n\t\tx = 1\n\t\ty = z\n\t}");
        assert_eq!(p.struct_value().unwrap().len(), 2);
    }

    #[test]
    fn test_appends_need_matching_kind() {
        let mut p = Property::string("s", "v");
        assert!(p.append_string("x").is_err());
        assert!(p.add_property(Property::integer("i", 1)).is_err());
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a\"b\\c\td", true), "a\\\"b\\\\c\\td");
        assert_eq!(escape_text("l1\nl2\r", true), "l1\\nl2\\r");
        assert_eq!(escape_text("l1\nl2", false), "l1\nl2");
        assert_eq!(escape_text("\u{000C}\u{000B}", true), "\\f\\v");
    }

    #[test]
    fn test_unquoted_strings_that_would_change_meaning() {
        assert_eq!(Property::string("s", "plain").render_value(), "plain");
        assert_eq!(Property::string("s", "a=b").render_value(), "a=b");
        assert_eq!(Property::string("s", "two words").render_value(), "\"two words\"");
        assert_eq!(Property::string("s", "42").render_value(), "\"42\"");
        assert_eq!(Property::string("s", "on").render_value(), "\"on\"");
        assert_eq!(Property::string("s", "").render_value(), "\"\"");
        assert_eq!(Property::string("s", "#x").render_value(), "\"#x\"");
    }

    #[test]
    fn test_newline_policy() {
        let mut p = Property::string("s", "a\nb").with_quoted(true);
        assert_eq!(p.render_value(), "\"a\\nb\"");
        p.set_newline_escaped(false);
        assert_eq!(p.render_value(), "\"a\nb\"");
        assert!(!p.is_newline_escaped());
    }

    #[test]
    fn test_display_line() {
        let mut p = Property::float("pi", 3.25);
        p.set_struct_level(2);
        assert_eq!(p.to_string(), "\t\tpi = 3.25");
    }
}
