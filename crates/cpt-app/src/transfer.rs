//! Bulk export and import of the problem collection.
//!
//! A snapshot is a UTF-8 JSON array whose elements have the shape of a
//! [`Problem`]. Import is a structural gate only: it rejects anything that is
//! not a list of records and leaves field validation to the store's create
//! path.

use chrono::NaiveDate;
use cpt_store::Problem;
use serde_json::{Map, Value};

use crate::error::AppError;

/// One problem-shaped record of an imported snapshot
pub type ImportRecord = Map<String, Value>;

/// Structurally valid import file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    records: Vec<ImportRecord>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ImportRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ImportRecord> {
        self.records
    }

    /// Read every record as a full [`Problem`], ids included.
    pub fn to_problems(&self) -> Result<Vec<Problem>, AppError> {
        self.records
            .iter()
            .map(|record| Ok(serde_json::from_value(Value::Object(record.clone()))?))
            .collect()
    }
}

/// Serialize the full collection, in order, as a pretty-printed JSON array.
pub fn export(problems: &[Problem]) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(problems)?)
}

/// Parse an import file.
///
/// Fails with [`AppError::ImportFormat`] when the text is not JSON, when its
/// root is not an array, or when an element is not an object. Nothing is
/// partially accepted.
pub fn import(input: &str) -> Result<Snapshot, AppError> {
    let root: Value = serde_json::from_str(input)
        .map_err(|e| AppError::ImportFormat(format!("not valid JSON: {e}")))?;

    let Value::Array(elements) = root else {
        return Err(AppError::ImportFormat(format!(
            "expected a list of problems at the top level, found {}",
            kind(&root)
        )));
    };

    let records = elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| match element {
            Value::Object(record) => Ok(record),
            other => Err(AppError::ImportFormat(format!(
                "element {index} is {}, expected a problem record",
                kind(&other)
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Snapshot { records })
}

/// Conventional export file name, sortable by date.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("problem-tracker-{}.json", date.format("%Y-%m-%d"))
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
