//! Serde deserializer implementation over a parsed property tree
//!
//! Allows configuration text to be deserialized directly into Rust types using
//! the standard serde derive macros. Structures map to structs and maps, lists
//! to sequences, and scalars to their natural Rust types. Any scalar can also
//! be read as a string, in which case its source text is used.

use crate::convert;
use crate::error::{PropertiesError, SerdeError};
use crate::lexer::{WordClass, classify_word};
use crate::properties::Properties;
use crate::property::{Property, PropertyValue};
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, DeserializeOwned, DeserializeSeed, Visitor};
use serde::Deserialize;

/// Deserializer for one level of the property tree
pub struct PropertiesDeserializer<'de> {
    properties: &'de Properties,
}

impl<'de> PropertiesDeserializer<'de> {
    /// Creates a deserializer over `properties`
    pub fn new(properties: &'de Properties) -> Self {
        Self { properties }
    }
}

impl<'de> de::Deserializer<'de> for PropertiesDeserializer<'de> {
    type Error = PropertiesError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(PropertiesMapAccess::new(self.properties))
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct enum
        identifier ignored_any
    }
}

/// Deserializer for a single property value
pub struct PropertyDeserializer<'de> {
    property: &'de Property,
}

impl<'de> PropertyDeserializer<'de> {
    /// Creates a deserializer over the value of `property`
    pub fn new(property: &'de Property) -> Self {
        Self { property }
    }

    fn type_mismatch(&self, expected: &str) -> PropertiesError {
        PropertiesError::Serde(SerdeError::TypeMismatch {
            name: self.property.name().to_string(),
            expected: expected.to_string(),
            found: self.property.kind().name().to_string(),
        })
    }
}

impl<'de> de::Deserializer<'de> for PropertyDeserializer<'de> {
    type Error = PropertiesError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.property.value() {
            PropertyValue::String(s) => visitor.visit_borrowed_str(s),
            PropertyValue::Integer { value, .. } => visitor.visit_i64(*value),
            PropertyValue::Float { value, .. } => visitor.visit_f64(*value),
            PropertyValue::Boolean { value, .. } => visitor.visit_bool(*value),
            PropertyValue::List(items) => {
                visitor.visit_seq(ListSeqAccess::new(items.iter().map(String::as_str)))
            }
            PropertyValue::Struct(children) => {
                visitor.visit_map(PropertiesMapAccess::new(children))
            }
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.property.value() {
            PropertyValue::Boolean { value, .. } => visitor.visit_bool(*value),
            _ => Err(self.type_mismatch("boolean")),
        }
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.property.int_value() {
            Ok(value) => visitor.visit_i64(value),
            Err(_) => Err(self.type_mismatch("integer")),
        }
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_i64(visitor)
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.property.float_value() {
            Ok(value) => visitor.visit_f64(value),
            Err(_) => Err(self.type_mismatch("float")),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.property.string_value() {
            Ok(text) => visitor.visit_borrowed_str(text),
            Err(_) => Err(self.type_mismatch("string")),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.property.value() {
            PropertyValue::List(items) => {
                visitor.visit_seq(ListSeqAccess::new(items.iter().map(String::as_str)))
            }
            PropertyValue::Struct(_) => Err(self.type_mismatch("list")),
            // A lone scalar is a one element list
            scalar => {
                let text = scalar.scalar_text().unwrap_or_default();
                visitor.visit_seq(ListSeqAccess::new(std::iter::once(text)))
            }
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.property.value() {
            PropertyValue::Struct(children) => {
                visitor.visit_map(PropertiesMapAccess::new(children))
            }
            _ => Err(self.type_mismatch("structure")),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.property.value() {
            PropertyValue::Struct(children) if children.len() == 1 => {
                match children.iter().next() {
                    Some(variant) => visitor.visit_enum(PropertyEnumAccess { variant }),
                    None => Err(self.type_mismatch("enum")),
                }
            }
            PropertyValue::Struct(_) | PropertyValue::List(_) => Err(self.type_mismatch("enum")),
            scalar => {
                let name = scalar.scalar_text().unwrap_or_default();
                visitor.visit_enum(BorrowedStrDeserializer::<PropertiesError>::new(name))
            }
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    serde::forward_to_deserialize_any! {
        i128 u128 bytes byte_buf unit unit_struct ignored_any
    }
}

/// Map access over the entries of one level
struct PropertiesMapAccess<'de> {
    iter: indexmap::map::Values<'de, String, Property>,
    current: Option<&'de Property>,
    len: usize,
}

impl<'de> PropertiesMapAccess<'de> {
    fn new(properties: &'de Properties) -> Self {
        Self {
            iter: properties.iter(),
            current: None,
            len: properties.len(),
        }
    }
}

impl<'de> de::MapAccess<'de> for PropertiesMapAccess<'de> {
    type Error = PropertiesError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(property) => {
                self.current = Some(property);
                seed.deserialize(BorrowedStrDeserializer::new(property.name()))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current.take() {
            Some(property) => seed.deserialize(PropertyDeserializer::new(property)),
            None => Err(PropertiesError::Serde(SerdeError::Custom(
                "No value available for map entry".to_string(),
            ))),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len)
    }
}

/// Sequence access over list items
struct ListSeqAccess<I> {
    items: I,
}

impl<I> ListSeqAccess<I> {
    fn new(items: I) -> Self {
        Self { items }
    }
}

impl<'de, I> de::SeqAccess<'de> for ListSeqAccess<I>
where
    I: ExactSizeIterator<Item = &'de str>,
{
    type Error = PropertiesError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.items.next() {
            Some(item) => seed.deserialize(ItemDeserializer(item)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

/// Deserializer for one list item
///
/// Items are stored as text; when the target type asks for anything other than
/// a string the text is classified the same way the lexer classifies words.
struct ItemDeserializer<'de>(&'de str);

impl<'de> de::Deserializer<'de> for ItemDeserializer<'de> {
    type Error = PropertiesError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        let text = self.0;
        let integer = match classify_word(text) {
            WordClass::Decimal => convert::decimal_to_int(text),
            WordClass::Octal => convert::octal_to_int(text),
            WordClass::Binary => convert::binary_to_int(text),
            WordClass::Hex => convert::hex_to_int(text),
            WordClass::Float => {
                return match convert::to_float(text) {
                    Some(value) => visitor.visit_f64(value),
                    None => visitor.visit_borrowed_str(text),
                };
            }
            WordClass::Boolean(value) => return visitor.visit_bool(value),
            WordClass::Plain => None,
        };
        match integer {
            Some(value) => visitor.visit_i64(value),
            None => visitor.visit_borrowed_str(text),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.0)
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.0)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_enum(BorrowedStrDeserializer::<PropertiesError>::new(self.0))
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char
        bytes byte_buf unit unit_struct newtype_struct seq tuple tuple_struct
        map struct identifier ignored_any
    }
}

/// Enum access for a structure holding exactly one property
struct PropertyEnumAccess<'de> {
    variant: &'de Property,
}

impl<'de> de::EnumAccess<'de> for PropertyEnumAccess<'de> {
    type Error = PropertiesError;
    type Variant = PropertyDeserializer<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let name = seed.deserialize(BorrowedStrDeserializer::<PropertiesError>::new(
            self.variant.name(),
        ))?;
        Ok((name, PropertyDeserializer::new(self.variant)))
    }
}

impl<'de> de::VariantAccess<'de> for PropertyDeserializer<'de> {
    type Error = PropertiesError;

    fn unit_variant(self) -> Result<(), Self::Error> {
        Err(PropertiesError::Serde(SerdeError::Custom(
            "Expected unit variant, found data".to_string(),
        )))
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_map(self, visitor)
    }
}

/// Deserializes a parsed tree into `T`
pub fn from_properties<'de, T>(properties: &'de Properties) -> Result<T, PropertiesError>
where
    T: Deserialize<'de>,
{
    T::deserialize(PropertiesDeserializer::new(properties))
}

/// Parses configuration text and deserializes it into `T`
pub fn from_str<T>(s: &str) -> Result<T, PropertiesError>
where
    T: DeserializeOwned,
{
    let properties: Properties = s.parse()?;
    from_properties(&properties)
}
