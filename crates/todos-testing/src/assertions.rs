//! Test assertion utilities and helpers
//!
//! Assertions over decoded JSON bodies. Every helper returns a
//! [`TestResult`] so checks can propagate failures with `?`.

use serde_json::Value as JsonValue;

use crate::{TestError, TestResult};

/// Collection of test assertions
pub struct TestAssertions;

impl TestAssertions {
    /// Assert that two JSON values are equal
    pub fn assert_json_eq(actual: &JsonValue, expected: &JsonValue) -> TestResult<()> {
        if actual != expected {
            return Err(TestError::assertion(format!(
                "JSON assertion failed:\nExpected: {}\nActual: {}",
                pretty(expected),
                pretty(actual)
            )));
        }
        Ok(())
    }

    /// Assert that JSON contains expected fields/values
    pub fn assert_json_contains(actual: &JsonValue, expected: &JsonValue) -> TestResult<()> {
        if !json_contains(actual, expected) {
            return Err(TestError::assertion(format!(
                "JSON does not contain expected values:\nExpected to contain: {}\nActual: {}",
                pretty(expected),
                pretty(actual)
            )));
        }
        Ok(())
    }

    /// Assert that a JSON object has a field and return its value
    pub fn assert_has_field<'a>(actual: &'a JsonValue, field: &str) -> TestResult<&'a JsonValue> {
        if !actual.is_object() {
            return Err(TestError::UnexpectedShape {
                expected: format!("object with field '{}'", field),
                body: actual.to_string(),
            });
        }

        actual.get(field).ok_or_else(|| TestError::MissingField {
            field: field.to_string(),
            body: actual.to_string(),
        })
    }

    /// Assert that a JSON object field equals an expected value
    pub fn assert_field_eq(actual: &JsonValue, field: &str, expected: &JsonValue) -> TestResult<()> {
        let value = Self::assert_has_field(actual, field)?;
        if value != expected {
            return Err(TestError::FieldMismatch {
                field: field.to_string(),
                expected: expected.to_string(),
                actual: value.to_string(),
                body: actual.to_string(),
            });
        }
        Ok(())
    }

    /// Assert that a JSON value is an array and return its items
    pub fn assert_is_array(actual: &JsonValue) -> TestResult<&Vec<JsonValue>> {
        actual.as_array().ok_or_else(|| TestError::UnexpectedShape {
            expected: "array".to_string(),
            body: actual.to_string(),
        })
    }

    /// Assert an HTTP status code
    pub fn assert_status(actual: u16, expected: u16) -> TestResult<()> {
        if actual != expected {
            return Err(TestError::UnexpectedStatus {
                expected,
                actual,
                body: String::new(),
            });
        }
        Ok(())
    }
}

fn pretty(value: &JsonValue) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Helper function for JSON containment checking
pub(crate) fn json_contains(actual: &JsonValue, expected: &JsonValue) -> bool {
    match (actual, expected) {
        (JsonValue::Object(actual_map), JsonValue::Object(expected_map)) => {
            expected_map.iter().all(|(key, expected_value)| {
                actual_map
                    .get(key)
                    .is_some_and(|actual_value| json_contains(actual_value, expected_value))
            })
        }
        (JsonValue::Array(actual_arr), JsonValue::Array(expected_arr)) => {
            // Every expected item must appear somewhere in the actual array
            expected_arr.iter().all(|expected_item| {
                actual_arr
                    .iter()
                    .any(|actual_item| json_contains(actual_item, expected_item))
            })
        }
        _ => actual == expected,
    }
}

/// Macros for common assertions
#[macro_export]
macro_rules! assert_json_eq {
    ($actual:expr, $expected:expr) => {
        $crate::assertions::TestAssertions::assert_json_eq($actual, $expected)?
    };
}

#[macro_export]
macro_rules! assert_json_contains {
    ($actual:expr, $expected:expr) => {
        $crate::assertions::TestAssertions::assert_json_contains($actual, $expected)?
    };
}

#[macro_export]
macro_rules! assert_has_field {
    ($actual:expr, $field:expr) => {
        $crate::assertions::TestAssertions::assert_has_field($actual, $field)?
    };
}

#[macro_export]
macro_rules! assert_field_eq {
    ($actual:expr, $field:expr, $expected:expr) => {
        $crate::assertions::TestAssertions::assert_field_eq($actual, $field, $expected)?
    };
}

#[macro_export]
macro_rules! assert_is_array {
    ($actual:expr) => {
        $crate::assertions::TestAssertions::assert_is_array($actual)?
    };
}
