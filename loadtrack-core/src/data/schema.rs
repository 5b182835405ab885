//! Expected schema for the load dataset.

use polars::prelude::*;

/// Canonical column layout: `DATE, HOUR, LOAD, PREDICTED_LOAD, ERROR`.
///
/// `DATE` arrives as a string column and is parsed to a calendar date during
/// record conversion; the three measure columns tolerate nulls (converted to
/// NaN downstream), `DATE` and `HOUR` do not.
pub struct LoadSchema;

impl LoadSchema {
    /// Get the canonical dataset schema.
    pub fn schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("DATE".into(), DataType::String),
            Field::new("HOUR".into(), DataType::Int64),
            Field::new("LOAD".into(), DataType::Float64),
            Field::new("PREDICTED_LOAD".into(), DataType::Float64),
            Field::new("ERROR".into(), DataType::Float64),
        ])
    }

    /// Validate a DataFrame against the schema.
    pub fn validate(df: &DataFrame) -> Result<(), SchemaError> {
        let expected = Self::schema();
        let actual = df.schema();

        for field in expected.iter_fields() {
            if !actual.contains(field.name()) {
                return Err(SchemaError::MissingColumn(field.name().to_string()));
            }
        }

        for field in expected.iter_fields() {
            let actual_dtype = actual
                .get(field.name())
                .ok_or_else(|| SchemaError::MissingColumn(field.name().to_string()))?;
            if actual_dtype != field.dtype() {
                return Err(SchemaError::TypeMismatch {
                    column: field.name().to_string(),
                    expected: field.dtype().clone(),
                    actual: actual_dtype.clone(),
                });
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required column: {0}")]
    MissingColumn(String),

    #[error("type mismatch in column {column}: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        column: String,
        expected: DataType,
        actual: DataType,
    },
}
