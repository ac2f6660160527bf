//! Custom error types for the missing-value regression experiment.
//!
//! This module provides the error hierarchy using `thiserror` so that every
//! stage (generation, splitting, imputation, fitting, scoring) reports what
//! went wrong with enough context to act on.
//!
//! Errors are serializable as `{ code, message }` pairs, which keeps them easy
//! to assert on in tests and to log in a structured way.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the experiment.
#[derive(Error, Debug)]
pub enum NanRegressionError {
    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An operation received no rows to work with.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Two inputs that must agree in size do not.
    #[error("Shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: String, found: String },

    /// A model that cannot handle missing values was given some.
    #[error("Input contains {count} missing value(s); {model} does not accept missing values")]
    MissingValuesInInput { model: String, count: usize },

    /// A column has no observed values to derive a statistic from.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// Imputation failed.
    #[error("Failed to impute missing values in column '{column}': {reason}")]
    ImputationFailed { column: String, reason: String },

    /// A model was used before `fit` was called.
    #[error("{0} has not been fitted")]
    NotFitted(String),

    /// The normal equations could not be solved.
    #[error("Linear system is singular: {0}")]
    SingularMatrix(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<NanRegressionError>,
    },
}

impl NanRegressionError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        NanRegressionError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::EmptyInput(_) => "EMPTY_INPUT",
            Self::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            Self::MissingValuesInInput { .. } => "MISSING_VALUES_IN_INPUT",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::ImputationFailed { .. } => "IMPUTATION_FAILED",
            Self::NotFitted(_) => "NOT_FITTED",
            Self::SingularMatrix(_) => "SINGULAR_MATRIX",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is caused by bad input data rather than a bug or
    /// a numeric failure.
    pub fn is_data_error(&self) -> bool {
        match self {
            Self::EmptyInput(_)
            | Self::ShapeMismatch { .. }
            | Self::MissingValuesInInput { .. }
            | Self::NoValidValues(_) => true,
            Self::WithContext { source, .. } => source.is_data_error(),
            _ => false,
        }
    }
}

impl Serialize for NanRegressionError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("NanRegressionError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl From<crate::config::ConfigValidationError> for NanRegressionError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        NanRegressionError::InvalidConfig(err.to_string())
    }
}

/// Result type alias for experiment operations.
pub type Result<T> = std::result::Result<T, NanRegressionError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| NanRegressionError::Polars(e).with_context(context))
    }
}
