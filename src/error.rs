use thiserror::Error;

pub type Result<T, E = AdapterError> = std::result::Result<T, E>;

/// Boxed error raised by a caller-supplied option function.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// A field received a value outside its closed set, or one that cannot
    /// be coerced to the field's type.
    #[error("invalid {field} `{value}`: expected {expected}")]
    Validation {
        field: &'static str,
        value: String,
        expected: String,
    },

    #[error("missing required field `{field}` in {context}")]
    MissingField {
        field: &'static str,
        context: &'static str,
    },

    /// A record field that must be a mapping held something else at
    /// serialization time.
    #[error("field `{field}` of {record} `{id}` must be a mapping, found {found}")]
    Shape {
        record: &'static str,
        id: String,
        field: &'static str,
        found: &'static str,
    },

    #[error("edge endpoint `{0}` is not a vertex of the graph")]
    Reference(String),

    /// Error returned by a caller's `node_options`/`link_options` function,
    /// passed through untouched.
    #[error(transparent)]
    Callback(CallbackError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AdapterError {
    pub fn callback<E>(err: E) -> Self
    where
        E: Into<CallbackError>,
    {
        Self::Callback(err.into())
    }

    pub(crate) fn invalid_choice(field: &'static str, value: impl Into<String>, choices: &[&str]) -> Self {
        Self::Validation {
            field,
            value: value.into(),
            expected: format!("one of {}", choices.join(", ")),
        }
    }

    pub(crate) fn not_positive(field: &'static str, value: impl Into<String>) -> Self {
        Self::Validation {
            field,
            value: value.into(),
            expected: "a positive integer".to_string(),
        }
    }

    pub(crate) fn not_finite(field: &'static str, value: impl Into<String>) -> Self {
        Self::Validation {
            field,
            value: value.into(),
            expected: "a finite number".to_string(),
        }
    }

    pub(crate) fn not_integer(field: &'static str, value: impl Into<String>) -> Self {
        Self::Validation {
            field,
            value: value.into(),
            expected: "an integer".to_string(),
        }
    }
}
