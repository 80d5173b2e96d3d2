//! Adapters that turn external input shapes into [`RawCounters`].
//!
//! Form pairs, spreadsheet rows and JSON objects all land on the same
//! fixed-shape record; missing counters default to zero and anything that is
//! not a non-negative whole number is rejected.
use std::io::Read;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::counters::{CounterField, RawCounters};
use crate::error::{InvalidInput, SourceError};
use crate::numbers::{integral_f64_to_u64, u64_to_i64};

/// Column or key names that carry a subject's display name.
const NAME_KEYS: [&str; 4] = ["name", "player", "player name", "subject"];

/// A named raw counter record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Display name, when the input supplied one.
    pub name: Option<String>,
    pub counters: RawCounters,
}

impl Subject {
    #[must_use]
    pub const fn new(name: Option<String>, counters: RawCounters) -> Self {
        Self { name, counters }
    }
}

/// Anything that can produce subjects for analysis.
pub trait CounterSource {
    type Error: std::error::Error + Send + Sync + 'static + From<InvalidInput>;

    /// Read every subject the source holds, in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or holds invalid counters.
    fn subjects(&mut self) -> Result<Vec<Subject>, Self::Error>;
}

/// Whether a value such as `12.0` counts as a whole number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    /// Only integer literals, as a web form submits them.
    IntegerOnly,
    /// Integral decimals too, as spreadsheets export them.
    AllowIntegralDecimal,
}

fn is_name_key(key: &str) -> bool {
    let key = key.trim();
    NAME_KEYS.iter().any(|name| name.eq_ignore_ascii_case(key))
}

/// Parse one counter value. Blank input counts as zero, and so does `-0`.
///
/// # Errors
///
/// Returns [`InvalidInput::Negative`] or [`InvalidInput::NotAnInteger`].
pub fn parse_counter_value(
    field: CounterField,
    raw: &str,
    style: NumberStyle,
) -> Result<u64, InvalidInput> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if let Ok(value) = trimmed.parse::<u64>() {
        return Ok(value);
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        if value == 0 {
            return Ok(0);
        }
        return Err(InvalidInput::Negative {
            field: field.key(),
            value,
        });
    }
    if matches!(style, NumberStyle::AllowIntegralDecimal)
        && let Ok(value) = trimmed.parse::<f64>()
    {
        if let Some(whole) = integral_f64_to_u64(value) {
            return Ok(whole);
        }
        if let Some(magnitude) = integral_f64_to_u64(-value) {
            return Err(InvalidInput::Negative {
                field: field.key(),
                value: -u64_to_i64(magnitude),
            });
        }
    }
    Err(InvalidInput::NotAnInteger {
        field: field.key(),
        raw: trimmed.to_string(),
    })
}

/// Build counters from form-style name/value pairs.
///
/// Keys match form keys or spreadsheet columns; unknown keys are ignored and
/// missing counters stay zero. A repeated key keeps its last value.
///
/// # Errors
///
/// Returns an error for the first value that is negative or not an integer.
pub fn counters_from_pairs<I, K, V>(pairs: I) -> Result<RawCounters, InvalidInput>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut counters = RawCounters::default();
    for (key, value) in pairs {
        if let Some(field) = CounterField::from_name(key.as_ref()) {
            let parsed = parse_counter_value(field, value.as_ref(), NumberStyle::IntegerOnly)?;
            counters.set(field, parsed);
        }
    }
    Ok(counters)
}

/// Split a `key=value` assignment and resolve its field.
///
/// # Errors
///
/// Returns [`InvalidInput::UnknownField`] if the key names no counter or the
/// text has no `=`, and a value error if the value does not parse.
pub fn parse_assignment(text: &str) -> Result<(CounterField, u64), InvalidInput> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| InvalidInput::UnknownField(text.trim().to_string()))?;
    let field = CounterField::from_name(key)
        .ok_or_else(|| InvalidInput::UnknownField(key.trim().to_string()))?;
    let value = parse_counter_value(field, value, NumberStyle::IntegerOnly)?;
    Ok((field, value))
}

/// A single subject given as name/value pairs.
#[derive(Debug, Clone, Default)]
pub struct PairSource {
    name: Option<String>,
    pairs: Vec<(String, String)>,
}

impl PairSource {
    #[must_use]
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            pairs: Vec::new(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl CounterSource for PairSource {
    type Error = SourceError;

    fn subjects(&mut self) -> Result<Vec<Subject>, Self::Error> {
        let counters = counters_from_pairs(self.pairs.iter().map(|(k, v)| (k, v)))?;
        Ok(vec![Subject::new(self.name.clone(), counters)])
    }
}

/// Spreadsheet rows in CSV form; one subject per data row.
pub struct TabularSource<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TabularSource<R> {
    pub fn new(input: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(input);
        Self { reader }
    }
}

impl<'a> TabularSource<&'a [u8]> {
    #[must_use]
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

enum Column {
    Name,
    Counter(CounterField),
    Ignored,
}

impl<R: Read> CounterSource for TabularSource<R> {
    type Error = SourceError;

    fn subjects(&mut self) -> Result<Vec<Subject>, Self::Error> {
        let columns: Vec<Column> = self
            .reader
            .headers()?
            .iter()
            .map(|header| {
                if is_name_key(header) {
                    Column::Name
                } else {
                    CounterField::from_name(header).map_or(Column::Ignored, Column::Counter)
                }
            })
            .collect();

        let mut subjects = Vec::new();
        for record in self.reader.records() {
            let record = record?;
            let mut name = None;
            let mut counters = RawCounters::default();
            for (column, cell) in columns.iter().zip(record.iter()) {
                match column {
                    Column::Name if !cell.is_empty() => name = Some(cell.to_string()),
                    Column::Counter(field) => {
                        let value =
                            parse_counter_value(*field, cell, NumberStyle::AllowIntegralDecimal)?;
                        counters.set(*field, value);
                    }
                    Column::Name | Column::Ignored => {}
                }
            }
            subjects.push(Subject::new(name, counters));
        }
        Ok(subjects)
    }
}

/// A JSON object, or an array of objects, keyed by form key or column.
#[derive(Debug, Clone)]
pub struct JsonSource {
    document: String,
}

impl JsonSource {
    #[must_use]
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }

    /// Read the whole document from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the reader fails.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, SourceError> {
        let mut document = String::new();
        reader.read_to_string(&mut document)?;
        Ok(Self::new(document))
    }
}

fn counter_from_json(field: CounterField, value: &Value) -> Result<u64, InvalidInput> {
    match value {
        Value::Null => Ok(0),
        Value::Number(number) => {
            if let Some(whole) = number.as_u64() {
                return Ok(whole);
            }
            if let Some(negative) = number.as_i64() {
                return Err(InvalidInput::Negative {
                    field: field.key(),
                    value: negative,
                });
            }
            parse_counter_value(field, &number.to_string(), NumberStyle::AllowIntegralDecimal)
        }
        Value::String(text) => {
            parse_counter_value(field, text, NumberStyle::AllowIntegralDecimal)
        }
        other => Err(InvalidInput::NotAnInteger {
            field: field.key(),
            raw: other.to_string(),
        }),
    }
}

/// Numeric and boolean names are kept as their JSON text; `null` means unnamed.
fn name_from_json(value: &Value) -> Result<Option<String>, InvalidInput> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Number(_) | Value::Bool(_) => Ok(Some(value.to_string())),
        other => Err(InvalidInput::InvalidName(other.to_string())),
    }
}

fn subject_from_json(object: &serde_json::Map<String, Value>) -> Result<Subject, InvalidInput> {
    let mut name = None;
    let mut counters = RawCounters::default();
    for (key, value) in object {
        if is_name_key(key) {
            name = name_from_json(value)?;
        } else if let Some(field) = CounterField::from_name(key) {
            counters.set(field, counter_from_json(field, value)?);
        }
    }
    Ok(Subject::new(name, counters))
}

impl CounterSource for JsonSource {
    type Error = SourceError;

    fn subjects(&mut self) -> Result<Vec<Subject>, Self::Error> {
        match serde_json::from_str::<Value>(&self.document)? {
            Value::Object(object) => Ok(vec![subject_from_json(&object)?]),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Object(object) => Ok(subject_from_json(object)?),
                    _ => Err(SourceError::JsonShape),
                })
                .collect(),
            _ => Err(SourceError::JsonShape),
        }
    }
}
