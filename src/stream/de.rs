// Author: Dustin Pilgrim
// License: MIT

use std::iter::Peekable;

use serde::de::{
    self, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, VariantAccess,
    Visitor,
};
use serde::Deserialize;

use super::{Event, EventStream};
use crate::ast::{self, Node, Resolved, ScalarStyle};
use crate::YamlError;

/// Decode a node (and its descendants) into `T` without going through text.
///
/// # Examples
/// ```
/// use yamledit::{parser, stream};
///
/// let doc = parser::parse_str("x: 1\ny: [2, 3]\n").unwrap().unwrap();
/// let pair: std::collections::BTreeMap<String, serde_yaml::Value> = stream::from_node(&doc.root).unwrap();
/// assert_eq!(pair.len(), 2);
/// ```
pub fn from_node<'a, T: Deserialize<'a>>(node: &'a Node) -> Result<T, YamlError> {
    from_events(EventStream::document(node))
}

/// Decode `T` from an event stream, wrapped in stream/document markers or not.
pub fn from_events<'a, T: Deserialize<'a>>(events: EventStream<'a>) -> Result<T, YamlError> {
    let mut deserializer = Deserializer::new(events);
    deserializer.skip_preamble();
    let value = T::deserialize(&mut deserializer)?;
    deserializer.finish()?;
    Ok(value)
}

/// A `serde` deserializer fed by an [`EventStream`].
pub struct Deserializer<'a> {
    events: Peekable<EventStream<'a>>,
}

impl<'a> Deserializer<'a> {
    pub fn new(events: EventStream<'a>) -> Self {
        Self { events: events.peekable() }
    }

    fn peek(&mut self) -> Result<Event<'a>, YamlError> {
        self.events
            .peek()
            .copied()
            .ok_or_else(|| YamlError::decode("Unexpected end of event stream"))
    }

    fn next(&mut self) -> Result<Event<'a>, YamlError> {
        self.events
            .next()
            .ok_or_else(|| YamlError::decode("Unexpected end of event stream"))
    }

    fn skip_preamble(&mut self) {
        while matches!(self.events.peek(), Some(Event::StreamStart | Event::DocumentStart)) {
            self.events.next();
        }
    }

    fn finish(&mut self) -> Result<(), YamlError> {
        for event in self.events.by_ref() {
            match event {
                Event::DocumentEnd | Event::StreamEnd => {}
                other => {
                    return Err(YamlError::decode(format!("Trailing event after value: {:?}", other)));
                }
            }
        }
        Ok(())
    }

    /// Consume a scalar, failing with `expected` in the message otherwise.
    fn scalar(&mut self, expected: &str) -> Result<(&'a str, ScalarStyle, Option<&'a str>), YamlError> {
        match self.next()? {
            Event::Scalar { value, style, tag, .. } => Ok((value, style, tag)),
            other => Err(YamlError::decode(format!("Expected {}, found {}", expected, describe(&other)))),
        }
    }

    fn expect(&mut self, wanted: Event<'static>) -> Result<(), YamlError> {
        let event = self.next()?;
        let same = matches!(
            (&event, &wanted),
            (Event::SequenceStart { .. }, Event::SequenceStart { .. })
                | (Event::SequenceEnd, Event::SequenceEnd)
                | (Event::MappingStart { .. }, Event::MappingStart { .. })
                | (Event::MappingEnd, Event::MappingEnd)
        );
        if same {
            Ok(())
        } else {
            Err(YamlError::decode(format!("Expected {}, found {}", describe(&wanted), describe(&event))))
        }
    }

    /// Consume one complete node.
    fn skip_node(&mut self) -> Result<(), YamlError> {
        let mut depth = 0usize;
        loop {
            match self.next()? {
                Event::SequenceStart { .. } | Event::MappingStart { .. } => depth += 1,
                Event::SequenceEnd | Event::MappingEnd => depth = depth.saturating_sub(1),
                Event::Scalar { .. } => {}
                other => return Err(YamlError::decode(format!("Unexpected {}", describe(&other)))),
            }
            if depth == 0 {
                return Ok(());
            }
        }
    }

    fn peek_is_null(&mut self) -> Result<bool, YamlError> {
        Ok(match self.peek()? {
            Event::Scalar { value, style, tag, .. } => {
                matches!(ast::resolve_scalar(value, style, tag), Resolved::Null)
            }
            _ => false,
        })
    }
}

fn describe(event: &Event<'_>) -> String {
    match event {
        Event::Scalar { value, .. } => format!("scalar '{}'", value),
        Event::SequenceStart { .. } => "sequence".into(),
        Event::SequenceEnd => "end of sequence".into(),
        Event::MappingStart { .. } => "mapping".into(),
        Event::MappingEnd => "end of mapping".into(),
        Event::StreamStart | Event::DocumentStart => "start of document".into(),
        Event::DocumentEnd | Event::StreamEnd => "end of document".into(),
    }
}

macro_rules! deserialize_integer {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
            let (text, _, _) = self.scalar(stringify!($ty))?;
            let value = ast::parse_int(text)
                .and_then(|n| <$ty>::try_from(n).ok())
                .ok_or_else(|| {
                    YamlError::decode(format!("Invalid {} value '{}'", stringify!($ty), text))
                })?;
            visitor.$visit(value)
        }
    };
}

impl<'de> de::Deserializer<'de> for &mut Deserializer<'de> {
    type Error = YamlError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        match self.peek()? {
            Event::Scalar { value, style, tag, .. } => {
                self.next()?;
                match ast::resolve_scalar(value, style, tag) {
                    Resolved::Null => visitor.visit_unit(),
                    Resolved::Bool(b) => visitor.visit_bool(b),
                    Resolved::Int(n) => visitor.visit_i64(n),
                    Resolved::UInt(n) => visitor.visit_u64(n),
                    Resolved::Float(x) => visitor.visit_f64(x),
                    Resolved::Str(s) => visitor.visit_borrowed_str(s),
                }
            }
            Event::SequenceStart { .. } => self.deserialize_seq(visitor),
            Event::MappingStart { .. } => self.deserialize_map(visitor),
            other => Err(YamlError::decode(format!("Unexpected {}", describe(&other)))),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        let (text, _, _) = self.scalar("bool")?;
        match ast::parse_bool(text) {
            Some(b) => visitor.visit_bool(b),
            None => Err(YamlError::decode(format!("Invalid bool value '{}'", text))),
        }
    }

    deserialize_integer!(deserialize_i8, visit_i8, i8);
    deserialize_integer!(deserialize_i16, visit_i16, i16);
    deserialize_integer!(deserialize_i32, visit_i32, i32);
    deserialize_integer!(deserialize_i64, visit_i64, i64);
    deserialize_integer!(deserialize_i128, visit_i128, i128);
    deserialize_integer!(deserialize_u8, visit_u8, u8);
    deserialize_integer!(deserialize_u16, visit_u16, u16);
    deserialize_integer!(deserialize_u32, visit_u32, u32);
    deserialize_integer!(deserialize_u64, visit_u64, u64);
    deserialize_integer!(deserialize_u128, visit_u128, u128);

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        let (text, _, _) = self.scalar("float")?;
        let value = ast::parse_float(text)
            .or_else(|| ast::parse_int(text).map(|n| n as f64))
            .ok_or_else(|| YamlError::decode(format!("Invalid float value '{}'", text)))?;
        visitor.visit_f64(value)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        let (text, _, _) = self.scalar("char")?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(YamlError::decode(format!("Expected a single character, found '{}'", text))),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        let (text, _, _) = self.scalar("string")?;
        visitor.visit_borrowed_str(text)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        let (text, _, _) = self.scalar("bytes")?;
        visitor.visit_borrowed_bytes(text.as_bytes())
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        if self.peek_is_null()? {
            self.next()?;
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        if self.peek_is_null()? {
            self.next()?;
            visitor.visit_unit()
        } else {
            let event = self.peek()?;
            Err(YamlError::decode(format!("Expected null, found {}", describe(&event))))
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, YamlError> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, YamlError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        self.expect(Event::SequenceStart {
            anchor: None,
            tag: None,
            style: Default::default(),
        })?;
        let value = visitor.visit_seq(SeqReader { de: &mut *self })?;
        self.expect(Event::SequenceEnd)?;
        Ok(value)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, YamlError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, YamlError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        self.expect(Event::MappingStart {
            anchor: None,
            tag: None,
            style: Default::default(),
        })?;
        let value = visitor.visit_map(MapReader { de: &mut *self })?;
        self.expect(Event::MappingEnd)?;
        Ok(value)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, YamlError> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, YamlError> {
        match self.peek()? {
            Event::Scalar { value, .. } => {
                self.next()?;
                visitor.visit_enum(value.into_deserializer())
            }
            Event::MappingStart { .. } => {
                self.next()?;
                let value = visitor.visit_enum(EnumReader { de: &mut *self })?;
                self.expect(Event::MappingEnd)?;
                Ok(value)
            }
            other => Err(YamlError::decode(format!(
                "Expected enum as scalar or single-key mapping, found {}",
                describe(&other)
            ))),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, YamlError> {
        self.skip_node()?;
        visitor.visit_unit()
    }
}

struct SeqReader<'r, 'de> {
    de: &'r mut Deserializer<'de>,
}

impl<'de> SeqAccess<'de> for SeqReader<'_, 'de> {
    type Error = YamlError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>, YamlError> {
        if matches!(self.de.peek()?, Event::SequenceEnd) {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }
}

struct MapReader<'r, 'de> {
    de: &'r mut Deserializer<'de>,
}

impl<'de> MapAccess<'de> for MapReader<'_, 'de> {
    type Error = YamlError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>, YamlError> {
        if matches!(self.de.peek()?, Event::MappingEnd) {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, YamlError> {
        seed.deserialize(&mut *self.de)
    }
}

/// `{Variant: payload}` form of an externally tagged enum.
struct EnumReader<'r, 'de> {
    de: &'r mut Deserializer<'de>,
}

impl<'r, 'de> EnumAccess<'de> for EnumReader<'r, 'de> {
    type Error = YamlError;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self), YamlError> {
        let variant = seed.deserialize(&mut *self.de)?;
        Ok((variant, self))
    }
}

impl<'de> VariantAccess<'de> for EnumReader<'_, 'de> {
    type Error = YamlError;

    fn unit_variant(self) -> Result<(), YamlError> {
        de::Deserialize::deserialize(&mut *self.de)
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, YamlError> {
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, YamlError> {
        de::Deserializer::deserialize_seq(&mut *self.de, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, YamlError> {
        de::Deserializer::deserialize_map(&mut *self.de, visitor)
    }
}
