// crates/character-client/src/record.rs
// ============================================================================
// Module: Character Record
// Description: The seven-field character record and its field catalog.
// Purpose: Give payload builders and response checks a shared vocabulary.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A character record has exactly seven keys. `name` identifies the record;
//! the other six hold free-form JSON values. [`Character`] models a well-formed
//! record, while [`Character::without`] produces the raw maps used to test
//! rejection of incomplete payloads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Fields
// ============================================================================

/// Number of keys every stored record carries.
pub const FIELD_COUNT: usize = 7;

/// Keys of a character record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterField {
    /// Unique identifier of the record.
    Name,
    /// Education text.
    Education,
    /// Height value.
    Height,
    /// Identity text.
    Identity,
    /// Other aliases.
    OtherAliases,
    /// Universe the character belongs to.
    Universe,
    /// Weight value.
    Weight,
}

impl CharacterField {
    /// All fields in canonical order.
    pub const ALL: [Self; FIELD_COUNT] = [
        Self::Name,
        Self::Education,
        Self::Height,
        Self::Identity,
        Self::OtherAliases,
        Self::Universe,
        Self::Weight,
    ];

    /// Returns the wire key for the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Education => "education",
            Self::Height => "height",
            Self::Identity => "identity",
            Self::OtherAliases => "other_aliases",
            Self::Universe => "universe",
            Self::Weight => "weight",
        }
    }

    /// Parses a wire key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == key)
    }

    /// Fields that can change without changing the record identity.
    pub fn attributes() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|field| *field != Self::Name)
    }
}

impl fmt::Display for CharacterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Record
// ============================================================================

/// A complete character record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Character {
    /// Unique identifier.
    pub name: String,
    /// Education value.
    pub education: Value,
    /// Height value.
    pub height: Value,
    /// Identity value.
    pub identity: Value,
    /// Other aliases value.
    pub other_aliases: Value,
    /// Universe value.
    pub universe: Value,
    /// Weight value.
    pub weight: Value,
}

impl Character {
    /// Returns the default sample record: empty text fields and zero measures.
    #[must_use]
    pub fn template(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            education: Value::String(String::new()),
            height: Value::from(0),
            identity: Value::String(String::new()),
            other_aliases: Value::String(String::new()),
            universe: Value::String(String::new()),
            weight: Value::from(0),
        }
    }

    /// Decodes a record from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error when a key is missing, unknown, or `name` is not a string.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Returns the value stored under `field`.
    #[must_use]
    pub fn get(&self, field: CharacterField) -> Value {
        match field {
            CharacterField::Name => Value::String(self.name.clone()),
            CharacterField::Education => self.education.clone(),
            CharacterField::Height => self.height.clone(),
            CharacterField::Identity => self.identity.clone(),
            CharacterField::OtherAliases => self.other_aliases.clone(),
            CharacterField::Universe => self.universe.clone(),
            CharacterField::Weight => self.weight.clone(),
        }
    }

    /// Returns a mutable handle to a non-identity field, or `None` for `name`.
    pub fn attribute_mut(&mut self, field: CharacterField) -> Option<&mut Value> {
        match field {
            CharacterField::Name => None,
            CharacterField::Education => Some(&mut self.education),
            CharacterField::Height => Some(&mut self.height),
            CharacterField::Identity => Some(&mut self.identity),
            CharacterField::OtherAliases => Some(&mut self.other_aliases),
            CharacterField::Universe => Some(&mut self.universe),
            CharacterField::Weight => Some(&mut self.weight),
        }
    }

    /// Returns a copy with one non-identity field replaced.
    #[must_use]
    pub fn with_attribute(mut self, field: CharacterField, value: Value) -> Self {
        if let Some(slot) = self.attribute_mut(field) {
            *slot = value;
        }
        self
    }

    /// Returns the record as a JSON object with all seven keys.
    #[must_use]
    pub fn to_map(&self) -> Map<String, Value> {
        CharacterField::ALL
            .into_iter()
            .map(|field| (field.as_str().to_string(), self.get(field)))
            .collect()
    }

    /// Returns the record as a JSON object with `field` removed.
    #[must_use]
    pub fn without(&self, field: CharacterField) -> Map<String, Value> {
        let mut map = self.to_map();
        map.remove(field.as_str());
        map
    }
}

/// Returns true when the object's key set is exactly the seven record fields.
#[must_use]
pub fn has_exact_fields(object: &Map<String, Value>) -> bool {
    object.len() == FIELD_COUNT
        && CharacterField::ALL.into_iter().all(|field| object.contains_key(field.as_str()))
}
