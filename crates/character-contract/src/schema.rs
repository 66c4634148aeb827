// crates/character-contract/src/schema.rs
// ============================================================================
// Module: Record Schemas
// Description: JSON Schemas for character records and listings.
// Purpose: Check record completeness with a declarative schema.
// Dependencies: character-client, jsonschema, serde_json
// ============================================================================

//! ## Overview
//! A stored record must carry exactly the seven record fields, with `name`
//! a string and every other value free-form. The listing envelope is an
//! object whose `result` is an array of objects; whether each entry is a
//! complete record is judged separately, entry by entry.

use character_client::CharacterField;
use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::failure::ContractFailure;

/// Builds the schema of one stored record.
#[must_use]
pub fn record_schema() -> Value {
    let properties: Map<String, Value> = CharacterField::ALL
        .into_iter()
        .map(|field| {
            let rule = match field {
                CharacterField::Name => json!({ "type": "string" }),
                _ => json!({}),
            };
            (field.as_str().to_string(), rule)
        })
        .collect();
    let required: Vec<&str> = CharacterField::ALL.into_iter().map(CharacterField::as_str).collect();
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

/// Builds the schema of the `GET /characters` body.
#[must_use]
pub fn collection_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["result"],
        "properties": {
            "result": { "type": "array", "items": { "type": "object" } }
        },
    })
}

/// Compiled validators for record and listing shapes.
pub struct RecordShape {
    /// Validator for one record.
    record: Validator,
    /// Validator for a whole listing.
    collection: Validator,
}

impl RecordShape {
    /// Compiles both schemas.
    ///
    /// # Errors
    ///
    /// Returns [`ContractFailure::Invariant`] when a schema does not compile.
    pub fn new() -> Result<Self, ContractFailure> {
        Ok(Self {
            record: compile(&record_schema())?,
            collection: compile(&collection_schema())?,
        })
    }

    /// Checks one record, returning the first violation.
    ///
    /// # Errors
    ///
    /// Returns the validator message for the first violation.
    pub fn check_record(&self, value: &Value) -> Result<(), String> {
        self.record.validate(value).map_err(|err| err.to_string())
    }

    /// Checks a listing envelope, returning the first violation.
    ///
    /// # Errors
    ///
    /// Returns the validator message for the first violation.
    pub fn check_collection(&self, value: &Value) -> Result<(), String> {
        self.collection.validate(value).map_err(|err| err.to_string())
    }
}

/// Compiles one schema under draft 2020-12.
fn compile(schema: &Value) -> Result<Validator, ContractFailure> {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(schema)
        .map_err(|err| ContractFailure::Invariant(format!("record schema does not compile: {err}")))
}
