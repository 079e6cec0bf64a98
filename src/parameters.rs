//! Typed parameters of a test function.
//!
//! A test function declares its parameters once, at construction, as an
//! ordered list of keywords with typed default values. Later updates may
//! change a value but not its type, and unknown keywords are rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Vector(Vec<f64>),
    Text(String),
    Flag(bool),
}

impl ParamValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Number(_) => "number",
            ParamValue::Vector(_) => "vector",
            ParamValue::Text(_) => "text",
            ParamValue::Flag(_) => "flag",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            ParamValue::Vector(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ParamValue::Flag(v) => Some(*v),
            _ => None,
        }
    }

    fn same_type(&self, other: &ParamValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(v: Vec<f64>) -> Self {
        ParamValue::Vector(v)
    }
}

impl From<&[f64]> for ParamValue {
    fn from(v: &[f64]) -> Self {
        ParamValue::Vector(v.to_vec())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Flag(v)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Vector(v) => write!(f, "{v:?}"),
            ParamValue::Text(v) => f.write_str(v),
            ParamValue::Flag(v) => write!(f, "{v}"),
        }
    }
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct FunParam {
    pub keyword: String,
    pub value: ParamValue,
    pub description: Option<String>,
}

/// Ordered, schema-checked parameter mapping.
///
/// # Examples
/// ```
/// use uqtestfuns::FunParams;
///
/// let mut params = FunParams::new()
///     .declare("a", 7.0, Some("amplitude of the second term"))
///     .declare("b", 0.1, None);
/// params.set("b", 0.05).unwrap();
/// assert_eq!(params.number("b").unwrap(), 0.05);
/// assert!(params.set("b", "large").is_err());
/// assert!(params.set("c", 1.0).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunParams {
    entries: Vec<FunParam>,
}

impl FunParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `keyword` with its default value. Declaring an existing
    /// keyword again replaces it.
    pub fn declare(
        mut self,
        keyword: impl Into<String>,
        value: impl Into<ParamValue>,
        description: Option<&str>,
    ) -> Self {
        let param = FunParam {
            keyword: keyword.into(),
            value: value.into(),
            description: description.map(str::to_string),
        };
        match self.entries.iter_mut().find(|e| e.keyword == param.keyword) {
            Some(existing) => *existing = param,
            None => self.entries.push(param),
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunParam> {
        self.entries.iter()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.keyword.as_str())
    }

    pub fn get(&self, keyword: &str) -> Option<&ParamValue> {
        self.entry(keyword).map(|e| &e.value)
    }

    /// Replaces the value of a declared parameter.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if `keyword` is not declared or `value`
    /// has a different type than the declared one.
    pub fn set(&mut self, keyword: &str, value: impl Into<ParamValue>) -> Result<()> {
        let value = value.into();
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.keyword == keyword)
            .ok_or_else(|| unknown(keyword))?;
        if !entry.value.same_type(&value) {
            return Err(Error::InvalidParameter(format!(
                "parameter '{keyword}' expects a {}, got a {}",
                entry.value.type_name(),
                value.type_name()
            )));
        }
        entry.value = value;
        Ok(())
    }

    pub fn number(&self, keyword: &str) -> Result<f64> {
        let value = self.require(keyword)?;
        value.as_number().ok_or_else(|| wrong_type(keyword, "number", value))
    }

    pub fn vector(&self, keyword: &str) -> Result<&[f64]> {
        let value = self.require(keyword)?;
        value.as_vector().ok_or_else(|| wrong_type(keyword, "vector", value))
    }

    pub fn text(&self, keyword: &str) -> Result<&str> {
        let value = self.require(keyword)?;
        value.as_text().ok_or_else(|| wrong_type(keyword, "text", value))
    }

    pub fn flag(&self, keyword: &str) -> Result<bool> {
        let value = self.require(keyword)?;
        value.as_flag().ok_or_else(|| wrong_type(keyword, "flag", value))
    }

    fn entry(&self, keyword: &str) -> Option<&FunParam> {
        self.entries.iter().find(|e| e.keyword == keyword)
    }

    fn require(&self, keyword: &str) -> Result<&ParamValue> {
        self.get(keyword).ok_or_else(|| unknown(keyword))
    }
}

fn unknown(keyword: &str) -> Error {
    Error::InvalidParameter(format!("unknown parameter '{keyword}'"))
}

fn wrong_type(keyword: &str, expected: &str, got: &ParamValue) -> Error {
    Error::InvalidParameter(format!(
        "parameter '{keyword}' is a {}, not a {expected}",
        got.type_name()
    ))
}

impl fmt::Display for FunParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.entries {
            write!(f, "{} = {}", e.keyword, e.value)?;
            if let Some(d) = &e.description {
                write!(f, "  ({d})")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
