//! Task normalizer
//!
//! Turns a column-oriented [`RawTask`] into rows of named fields. The first raw
//! data row is a template and never reaches the processors.

use crate::admin::RawTask;
use crate::errors::ExportError;
use indexmap::IndexMap;

/// Column flags shared by every row of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnInfo {
    pub mutable: bool,
    pub required: bool,
}

/// One cell of a task row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub mutable: bool,
    pub required: bool,
    pub value: Option<String>,
}

impl Field {
    /// Value, or an empty string when absent
    pub fn text(&self) -> String {
        self.value.clone().unwrap_or_default()
    }
}

/// Named fields of one task row, in column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRow {
    fields: IndexMap<String, Field>,
}

impl TaskRow {
    pub fn get(&self, column: &str) -> Option<&Field> {
        self.fields.get(column)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }
}

/// A normalized deployment task, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    name: String,
    column_names: Vec<String>,
    column_info: IndexMap<String, ColumnInfo>,
    rows: Vec<TaskRow>,
}

impl Task {
    /// Normalize a raw task record
    ///
    /// Flag sequences and data rows must line up with the column names; any
    /// length mismatch is reported against the task name.
    pub fn normalize(raw: &RawTask) -> Result<Self, ExportError> {
        let context = format!("task {}", raw.name);
        let width = raw.column_names.len();
        if raw.mutable_columns.len() != width || raw.required_columns.len() != width {
            return Err(ExportError::schema_mismatch(
                context,
                format!(
                    "{} column names but {} mutable and {} required flags",
                    width,
                    raw.mutable_columns.len(),
                    raw.required_columns.len()
                ),
            ));
        }

        let column_info: IndexMap<String, ColumnInfo> = raw
            .column_names
            .iter()
            .zip(raw.mutable_columns.iter().zip(&raw.required_columns))
            .map(|(name, (&mutable, &required))| (name.clone(), ColumnInfo { mutable, required }))
            .collect();

        let mut rows = Vec::with_capacity(raw.task_data.len().saturating_sub(1));
        for (index, values) in raw.task_data.iter().enumerate().skip(1) {
            if values.len() != width {
                return Err(ExportError::schema_mismatch(
                    context,
                    format!("row {} has {} values for {} columns", index, values.len(), width),
                ));
            }
            let fields = raw
                .column_names
                .iter()
                .zip(values)
                .zip(raw.mutable_columns.iter().zip(&raw.required_columns))
                .map(|((name, value), (&mutable, &required))| {
                    let field = Field {
                        mutable,
                        required,
                        value: value.clone(),
                    };
                    (name.clone(), field)
                })
                .collect();
            rows.push(TaskRow { fields });
        }

        Ok(Task {
            name: raw.name.clone(),
            column_names: raw.column_names.clone(),
            column_info,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn column_info(&self, column: &str) -> Option<&ColumnInfo> {
        self.column_info.get(column)
    }

    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    /// Field of a row, a missing column is a schema mismatch for this task
    pub fn field<'r>(&self, row: &'r TaskRow, column: &str) -> Result<&'r Field, ExportError> {
        row.get(column).ok_or_else(|| {
            ExportError::schema_mismatch(
                format!("task {}", self.name),
                format!("no column named {}", column),
            )
        })
    }

    /// Field value of a row, empty when absent
    pub fn text(&self, row: &TaskRow, column: &str) -> Result<String, ExportError> {
        self.field(row, column).map(Field::text)
    }
}
