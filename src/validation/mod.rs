//! JSON Schema validation of request bodies and query strings.
use anyhow::Context;
use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Request shapes with a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    UserCreate,
    UserUpdate,
    UserSignin,
    PropertyCreate,
    PropertyUpdate,
    PropertySearch,
    MessageCreate,
    MessageUpdate,
    MessageSearch,
}

impl Schema {
    pub const ALL: [Schema; 9] = [
        Schema::UserCreate,
        Schema::UserUpdate,
        Schema::UserSignin,
        Schema::PropertyCreate,
        Schema::PropertyUpdate,
        Schema::PropertySearch,
        Schema::MessageCreate,
        Schema::MessageUpdate,
        Schema::MessageSearch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Schema::UserCreate => "userCreate",
            Schema::UserUpdate => "userUpdate",
            Schema::UserSignin => "userSignin",
            Schema::PropertyCreate => "propertyCreate",
            Schema::PropertyUpdate => "propertyUpdate",
            Schema::PropertySearch => "propertySearch",
            Schema::MessageCreate => "messageCreate",
            Schema::MessageUpdate => "messageUpdate",
            Schema::MessageSearch => "messageSearch",
        }
    }

    /// Looks a schema up by its published name, with or without `.json`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_suffix(".json").unwrap_or(name);
        Self::ALL.into_iter().find(|schema| schema.name() == name)
    }

    /// The schema as a JSON document.
    pub fn document(self) -> serde_json::Result<Value> {
        serde_json::from_str(self.source())
    }

    fn source(self) -> &'static str {
        match self {
            Schema::UserCreate => include_str!("schemas/user_create.json"),
            Schema::UserUpdate => include_str!("schemas/user_update.json"),
            Schema::UserSignin => include_str!("schemas/user_signin.json"),
            Schema::PropertyCreate => include_str!("schemas/property_create.json"),
            Schema::PropertyUpdate => include_str!("schemas/property_update.json"),
            Schema::PropertySearch => include_str!("schemas/property_search.json"),
            Schema::MessageCreate => include_str!("schemas/message_create.json"),
            Schema::MessageUpdate => include_str!("schemas/message_update.json"),
            Schema::MessageSearch => include_str!("schemas/message_search.json"),
        }
    }
}

/// First schema violation found in a request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationFailure {
    pub message: String,
    /// Name of the offending property, when there is one
    pub argument: Option<String>,
}

/// Every request schema, compiled once at startup.
pub struct Validators {
    compiled: HashMap<Schema, Validator>,
}

impl fmt::Debug for Validators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validators")
            .field("schemas", &self.compiled.len())
            .finish()
    }
}

impl Validators {
    pub fn compile() -> anyhow::Result<Self> {
        let mut compiled = HashMap::new();
        for schema in Schema::ALL {
            let document = schema
                .document()
                .with_context(|| format!("parsing {} schema", schema.name()))?;
            let validator = jsonschema::validator_for(&document)
                .map_err(|e| anyhow::anyhow!("compiling {} schema: {e}", schema.name()))?;
            compiled.insert(schema, validator);
        }
        tracing::debug!(schemas = compiled.len(), "compiled request schemas");
        Ok(Self { compiled })
    }

    pub fn validate(&self, schema: Schema, instance: &Value) -> Result<(), ValidationFailure> {
        let Some(validator) = self.compiled.get(&schema) else {
            return Err(ValidationFailure {
                message: format!("no schema named {}", schema.name()),
                argument: None,
            });
        };
        let Some(error) = validator.iter_errors(instance).next() else {
            return Ok(());
        };
        let argument = match &error.kind {
            ValidationErrorKind::Required { property } => property.as_str().map(str::to_string),
            _ => error
                .instance_path
                .to_string()
                .rsplit('/')
                .find(|segment| !segment.is_empty() && segment.parse::<usize>().is_err())
                .map(str::to_string),
        };
        let failure = ValidationFailure {
            message: format!("{}: {}", schema.name(), error),
            argument,
        };
        tracing::debug!(schema = schema.name(), error = %failure, "request failed validation");
        Err(failure)
    }

    /// Validates query string parameters, all of which arrive as strings.
    pub fn validate_params(
        &self,
        schema: Schema,
        params: &HashMap<String, String>,
    ) -> Result<(), ValidationFailure> {
        let object: Map<String, Value> = params
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        self.validate(schema, &Value::Object(object))
    }
}
