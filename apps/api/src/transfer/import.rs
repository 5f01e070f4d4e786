use serde_json::Value;
use thiserror::Error;

use crate::models::resume::ResumeDocument;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("the file is empty")]
    Empty,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object at the top level")]
    NotAnObject,

    #[error("'{0}' is missing or has the wrong type")]
    MissingField(&'static str),

    #[error("upload could not be read: {0}")]
    Upload(String),

    #[error("no 'file' field in the upload")]
    NoFile,
}

/// Top-level keys that must be arrays.
const ARRAY_FIELDS: [&str; 3] = ["experience", "education", "skills"];

/// Parses an exported resume file. Only the shape is checked: `personalInfo`
/// must be an object and the collections must be arrays. Everything else
/// is taken as-is, with missing entry fields defaulted.
pub fn parse_import(bytes: &[u8]) -> Result<ResumeDocument, ImportError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ImportError::Empty);
    }

    let value: Value = serde_json::from_slice(bytes)?;
    let object = value.as_object().ok_or(ImportError::NotAnObject)?;

    if !object.get("personalInfo").is_some_and(Value::is_object) {
        return Err(ImportError::MissingField("personalInfo"));
    }
    for field in ARRAY_FIELDS {
        if !object.get(field).is_some_and(Value::is_array) {
            return Err(ImportError::MissingField(field));
        }
    }

    Ok(serde_json::from_value(value)?)
}
