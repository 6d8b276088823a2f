//! Typed access to loosely typed command arguments.
//!
//! Callers send JSON maps. [`Fields`] reads them with the coercions the
//! bridge accepts: integers where floats are expected, and `0`/`1` where
//! flags are expected. `null` is treated as absent.

use serde_json::{Map, Value};

use super::errors::DispatchError;

/// Borrowed view over an argument map.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Wraps an argument map.
    #[must_use]
    pub const fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// Returns the raw value under `key`, treating `null` as absent.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    /// Reads an optional flag. Booleans are taken as-is; integers are `true`
    /// only when equal to `1`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if the value is neither a boolean nor an
    /// integer.
    pub fn optional_flag(&self, key: &str) -> Result<Option<bool>, DispatchError> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Bool(flag)) => Ok(Some(*flag)),
            Some(Value::Number(number)) if number.is_i64() || number.is_u64() => {
                Ok(Some(number.as_i64() == Some(1)))
            }
            Some(_) => Err(DispatchError::wrong_type(key, "a boolean or 0/1")),
        }
    }

    /// Reads a required flag.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if the flag is missing or malformed.
    pub fn flag(&self, key: &str) -> Result<bool, DispatchError> {
        self.optional_flag(key)?
            .ok_or_else(|| DispatchError::missing(key))
    }

    /// Reads an optional integer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if the value is not an integer.
    pub fn optional_int(&self, key: &str) -> Result<Option<i64>, DispatchError> {
        self.value(key)
            .map(|value| {
                value
                    .as_i64()
                    .ok_or_else(|| DispatchError::wrong_type(key, "an integer"))
            })
            .transpose()
    }

    /// Reads a required integer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if the value is missing or not an integer.
    pub fn int(&self, key: &str) -> Result<i64, DispatchError> {
        self.optional_int(key)?
            .ok_or_else(|| DispatchError::missing(key))
    }

    /// Reads a required integer that must fit the platform's 32-bit ids.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if the value is missing, not an integer, or
    /// out of range.
    pub fn int32(&self, key: &str) -> Result<i32, DispatchError> {
        let value = self.int(key)?;
        i32::try_from(value).map_err(|_| DispatchError::wrong_type(key, "a 32-bit integer"))
    }

    /// Reads a required number, accepting integers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if the value is missing or not numeric.
    pub fn number(&self, key: &str) -> Result<f64, DispatchError> {
        self.value(key)
            .ok_or_else(|| DispatchError::missing(key))?
            .as_f64()
            .ok_or_else(|| DispatchError::wrong_type(key, "a number"))
    }

    /// Reads an optional string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if the value is not a string.
    pub fn optional_string(&self, key: &str) -> Result<Option<&'a str>, DispatchError> {
        self.value(key)
            .map(|value| {
                value
                    .as_str()
                    .ok_or_else(|| DispatchError::wrong_type(key, "a string"))
            })
            .transpose()
    }

    /// Reads a required string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if the value is missing or not a string.
    pub fn string(&self, key: &str) -> Result<&'a str, DispatchError> {
        self.optional_string(key)?
            .ok_or_else(|| DispatchError::missing(key))
    }

    /// Reads an optional nested map.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` if the value is not an object.
    pub fn optional_object(&self, key: &str) -> Result<Option<Self>, DispatchError> {
        self.value(key)
            .map(|value| {
                value
                    .as_object()
                    .map(Fields::new)
                    .ok_or_else(|| DispatchError::wrong_type(key, "an object"))
            })
            .transpose()
    }
}
