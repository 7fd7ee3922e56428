//! Header resolution and cell parsing shared by the table readers

use crate::SchemaError;
use csv::StringRecord;
use std::collections::HashMap;

/// Column name → index lookup for one CSV header
pub(crate) struct Header {
    indices: HashMap<String, usize>,
}

impl Header {
    pub(crate) fn new(record: &StringRecord) -> Self {
        let indices = record
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_string(), i))
            .collect();
        Self { indices }
    }

    pub(crate) fn optional(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub(crate) fn required(&self, name: &'static str) -> Result<usize, SchemaError> {
        self.optional(name).ok_or(SchemaError::MissingColumn(name))
    }

    /// First present column among aliases
    pub(crate) fn required_any(&self, names: &[&'static str]) -> Result<usize, SchemaError> {
        names
            .iter()
            .find_map(|name| self.optional(name))
            .ok_or(SchemaError::MissingColumn(names[0]))
    }
}

/// One data record with its source line, for error reporting
pub(crate) struct Row<'a> {
    record: &'a StringRecord,
    line: u64,
}

impl<'a> Row<'a> {
    pub(crate) fn new(record: &'a StringRecord) -> Self {
        let line = record.position().map_or(0, |p| p.line());
        Self { record, line }
    }

    fn cell(&self, idx: usize) -> &str {
        self.record.get(idx).unwrap_or("").trim()
    }

    fn invalid(&self, column: &'static str, value: &str) -> SchemaError {
        SchemaError::InvalidValue {
            column,
            line: self.line,
            value: value.to_string(),
        }
    }

    pub(crate) fn text(&self, idx: usize) -> String {
        self.cell(idx).to_string()
    }

    /// Required float; an empty cell reads as NaN and propagates downstream
    pub(crate) fn float(&self, idx: usize, column: &'static str) -> Result<f64, SchemaError> {
        let raw = self.cell(idx);
        if raw.is_empty() {
            return Ok(f64::NAN);
        }
        raw.parse::<f64>().map_err(|_| self.invalid(column, raw))
    }

    /// Optional float; absent column, empty cell and NaN all read as `None`
    pub(crate) fn opt_float(
        &self,
        idx: Option<usize>,
        column: &'static str,
    ) -> Result<Option<f64>, SchemaError> {
        let Some(idx) = idx else { return Ok(None) };
        let raw = self.cell(idx);
        if raw.is_empty() {
            return Ok(None);
        }
        let value = raw.parse::<f64>().map_err(|_| self.invalid(column, raw))?;
        Ok((!value.is_nan()).then_some(value))
    }

    /// Integer cell; accepts `"3.0"` as written by float-typed producers
    pub(crate) fn opt_int(
        &self,
        idx: Option<usize>,
        column: &'static str,
    ) -> Result<Option<i64>, SchemaError> {
        let Some(idx) = idx else { return Ok(None) };
        let raw = self.cell(idx);
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(value) = raw.parse::<i64>() {
            return Ok(Some(value));
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_nan() => Ok(None),
            Ok(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
                Ok(Some(value as i64))
            }
            _ => Err(self.invalid(column, raw)),
        }
    }

    pub(crate) fn int(&self, idx: usize, column: &'static str) -> Result<i64, SchemaError> {
        self.opt_int(Some(idx), column)?
            .ok_or_else(|| self.invalid(column, self.cell(idx)))
    }

    pub(crate) fn opt_bool(
        &self,
        idx: Option<usize>,
        column: &'static str,
    ) -> Result<Option<bool>, SchemaError> {
        let Some(idx) = idx else { return Ok(None) };
        let raw = self.cell(idx);
        match raw.to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(self.invalid(column, raw)),
        }
    }
}
