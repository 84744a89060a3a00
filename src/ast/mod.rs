//! Typed AST produced by [`crate::parser`].
//!
//! `entry | field | value` is the shape; a `value` is a nonempty sequence
//! of `simple-value`s, each a string literal, number literal, or macro
//! reference until the post-processor collapses them.

use crate::ascii::fold_case;

/// The metatype is a pure function of the
/// case-folded entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum EntryMetatype {
    Comment,
    Preamble,
    MacroDef,
    Regular,
}

pub fn metatype_for(entry_type: &str) -> EntryMetatype {
    match fold_case(entry_type).as_str() {
        "comment" => EntryMetatype::Comment,
        "preamble" => EntryMetatype::Preamble,
        "string" => EntryMetatype::MacroDef,
        _ => EntryMetatype::Regular,
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum SimpleValue {
    StringLiteral(String),
    NumberLiteral(String),
    MacroReference(String),
}

impl SimpleValue {
    pub fn as_text(&self) -> &str {
        match self {
            SimpleValue::StringLiteral(s) => s,
            SimpleValue::NumberLiteral(s) => s,
            SimpleValue::MacroReference(s) => s,
        }
    }
}

/// A nonempty ordered sequence of [`SimpleValue`]s, joined by `#` prior to
/// post-processing.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Value {
    pub parts: Vec<SimpleValue>,
}

impl Value {
    pub fn new(parts: Vec<SimpleValue>) -> Self {
        debug_assert!(!parts.is_empty(), "a value must have at least one simple-value");
        Self { parts }
    }

    /// True once every part has been reduced to a single string literal by
    /// `EXPAND|PASTE` post-processing.
    pub fn is_fully_expanded(&self) -> bool {
        self.parts.len() == 1 && matches!(self.parts[0], SimpleValue::StringLiteral(_))
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Field {
    pub name: String,
    pub value: Value,
}

impl Field {
    pub fn new(name: String, value: Value) -> Self {
        Self { name: fold_case(&name), value }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Entry {
    pub entry_type: String,
    pub metatype: EntryMetatype,
    pub cite_key: Option<String>,
    pub fields: Vec<Field>,
    /// Set when this entry was only partially parsed due to a recovered
    /// syntax error: never a valid, usable entry.
    pub error: bool,
}

impl Entry {
    pub fn new(entry_type: String, cite_key: Option<String>, fields: Vec<Field>) -> Self {
        let metatype = metatype_for(&entry_type);
        Self {
            entry_type: fold_case(&entry_type),
            metatype,
            cite_key,
            fields,
            error: false,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        let name = fold_case(name);
        self.fields.iter().find(|f| f.name == name)
    }
}
