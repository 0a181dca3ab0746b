//! Structured output - one JSON document constrained to a schema.
//!
//! The schema is embedded, pretty-printed, in a system instruction, and the
//! request asks for a `json_object` response format. No tools are involved.
//!
//! - [`request_structured`] derives the schema from a Rust type, validates
//!   the reply against it (types, required fields, declared ranges) and
//!   deserializes it.
//! - [`request_json`] takes a bare schema description and returns the parsed
//!   JSON as is.
//!
//! Parse and validation failures are returned; nothing is retried here.

pub mod schemas;

use jsonschema::{Draft, JSONSchema};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::llm::LlmProvider;
use crate::types::{ChatRequest, GenerationParams, Message, ResponseFormat};

pub use schemas::{ProductRecommendation, ProductRecommendations, ResponseItem, StructuredResponse};

/// JSON Schema for `T`, as a JSON value.
pub fn schema_for<T: JsonSchema>() -> Result<Value> {
    let schema = schemars::schema_for!(T);
    serde_json::to_value(&schema).map_err(|e| Error::Schema(format!("Failed to serialize schema: {}", e)))
}

/// System instruction embedding `schema`.
pub fn system_instruction(schema: &Value) -> Result<String> {
    let pretty = serde_json::to_string_pretty(schema)
        .map_err(|e| Error::Schema(format!("Failed to serialize schema: {}", e)))?;
    Ok(format!(
        "You are an AI assistant that always responds in JSON format according to this schema:\n\
         {}\n\n\
         Your response must be valid JSON that conforms to this schema and can be parsed by a standard JSON parser.\n\
         Do not add any explanatory text before or after the JSON.\n\
         Include the current time in ISO format as the timestamp (the current time is {}).",
        pretty,
        chrono::Local::now().to_rfc3339()
    ))
}

fn build_request(query: &str, schema: &Value, params: &GenerationParams) -> Result<ChatRequest> {
    let messages = vec![
        Message::system(system_instruction(schema)?),
        Message::user(query),
    ];
    Ok(ChatRequest::new(messages, params).with_response_format(ResponseFormat::JsonObject))
}

async fn fetch_document(
    provider: &dyn LlmProvider,
    query: &str,
    schema: &Value,
    params: &GenerationParams,
) -> Result<Value> {
    let request = build_request(query, schema, params)?;
    let response = provider.chat_completion(&request).await?;
    let content = response
        .content
        .ok_or_else(|| Error::InvalidResponse("Structured response has no content".to_string()))?;
    serde_json::from_str(content.trim()).map_err(Error::InvalidJson)
}

/// Ask for a `T`, validate the reply against `T`'s schema and deserialize it.
pub async fn request_structured<T>(
    provider: &dyn LlmProvider,
    query: &str,
    params: &GenerationParams,
) -> Result<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema_name = T::schema_name();
    let schema = schema_for::<T>()?;
    let result = match fetch_document(provider, query, &schema, params).await {
        Ok(document) => validate::<T>(document),
        Err(e) => Err(e),
    };
    match result {
        Ok(value) => {
            tracing::info!(schema = %schema_name, "Successfully validated response");
            Ok(value)
        }
        Err(e) => {
            tracing::error!(schema = %schema_name, "Error requesting structured output: {}", e);
            Err(e)
        }
    }
}

/// Ask for JSON following a free-form `schema` and return it unvalidated.
pub async fn request_json(
    provider: &dyn LlmProvider,
    query: &str,
    schema: &Value,
    params: &GenerationParams,
) -> Result<Value> {
    let document = fetch_document(provider, query, schema, params)
        .await
        .inspect_err(|e| tracing::error!("Error requesting structured output: {}", e))?;
    tracing::info!("Returning unvalidated JSON response");
    Ok(document)
}

/// Validate `document` against `T`'s schema, then deserialize it.
///
/// Every schema violation is reported with its JSON pointer.
pub fn validate<T>(document: Value) -> Result<T>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema_name = T::schema_name();
    let schema = schema_for::<T>()?;
    let compiled = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&schema)
        .map_err(|e| Error::Schema(format!("Failed to compile schema {}: {}", schema_name, e)))?;

    let violations: Vec<String> = match compiled.validate(&document) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|e| describe(&e.instance_path.to_string(), &e.to_string())).collect(),
    };
    if !violations.is_empty() {
        return Err(Error::SchemaValidation {
            schema: schema_name,
            violations,
        });
    }

    serde_json::from_value(document).map_err(|e| Error::SchemaValidation {
        schema: schema_name,
        violations: vec![e.to_string()],
    })
}

fn describe(path: &str, message: &str) -> String {
    if path.is_empty() {
        format!("(root): {}", message)
    } else {
        format!("{}: {}", path, message)
    }
}
