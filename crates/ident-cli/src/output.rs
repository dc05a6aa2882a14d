//! Output formatting for CLI commands.
//!
//! Show-style commands produce a [`Record`] (sorted field/value pairs),
//! list-style commands a [`Listing`] (fixed columns, one row per resource).
//! Both render as a bordered table, JSON, or bare values.

use std::collections::BTreeMap;
use std::io::Write;

use ident_client::Resource;
use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles table, JSON and value output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
    columns: Vec<String>,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self {
            format,
            columns: Vec::new(),
        }
    }

    /// Restrict records and listings to the named fields or columns.
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => value.write_table(writer)?,
            Format::Value => value.write_values(writer)?,
        }
        Ok(())
    }

    /// Write a record after applying the column selection.
    ///
    /// # Errors
    ///
    /// Returns an error if no selected column exists or writing fails.
    pub fn write_record<W: Write>(&self, writer: &mut W, record: Record) -> Result<(), CliError> {
        let record = record.select(&self.columns)?;
        self.write(writer, &record)
    }

    /// Write a listing after applying the column selection.
    ///
    /// # Errors
    ///
    /// Returns an error if no selected column exists or writing fails.
    pub fn write_listing<W: Write>(&self, writer: &mut W, listing: Listing) -> Result<(), CliError> {
        let listing = listing.select(&self.columns)?;
        self.write(writer, &listing)
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types with human-readable renderings.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;

    /// Write bare values without headers or borders.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_values<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// One resource as sorted field/value pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Build a record from a resource's attributes.
    #[must_use]
    pub fn from_resource<T: Resource>(resource: &T) -> Self {
        Self::from(resource.to_record())
    }

    fn select(self, columns: &[String]) -> Result<Self, CliError> {
        if columns.is_empty() {
            return Ok(self);
        }
        let fields: Vec<_> = self
            .fields
            .into_iter()
            .filter(|(name, _)| columns.contains(name))
            .collect();
        if fields.is_empty() {
            return Err(unknown_columns(columns));
        }
        Ok(Self { fields })
    }
}

impl From<BTreeMap<String, Value>> for Record {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self {
            fields: map.into_iter().collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl TableDisplay for Record {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let rows: Vec<Vec<String>> = self
            .fields
            .iter()
            .map(|(name, value)| vec![name.clone(), cell(value)])
            .collect();
        write_grid(writer, &["Field", "Value"], &rows)
    }

    fn write_values<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        for (_, value) in &self.fields {
            writeln!(writer, "{}", cell(value))?;
        }
        Ok(())
    }
}

/// Many resources under fixed column headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    noun: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Listing {
    /// Build a listing. Each header maps to the attribute named by its
    /// lowercase, underscore-joined form (`Sid ID` reads `sid_id`); a
    /// missing attribute renders empty.
    #[must_use]
    pub fn from_resources<T: Resource>(columns: &[&str], resources: &[T]) -> Self {
        let keys: Vec<String> = columns.iter().map(|c| attribute_name(c)).collect();
        let rows = resources
            .iter()
            .map(|resource| {
                let record = resource.to_record();
                keys.iter()
                    .map(|key| record.get(key).cloned().unwrap_or_else(|| Value::String(String::new())))
                    .collect()
            })
            .collect();

        Self {
            noun: T::KIND.collection().to_string(),
            columns: columns.iter().map(ToString::to_string).collect(),
            rows,
        }
    }

    fn select(self, columns: &[String]) -> Result<Self, CliError> {
        if columns.is_empty() {
            return Ok(self);
        }
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| columns.contains(name))
            .map(|(i, _)| i)
            .collect();
        if keep.is_empty() {
            return Err(unknown_columns(columns));
        }

        let pick = |row: &Vec<Value>| keep.iter().map(|&i| row[i].clone()).collect::<Vec<_>>();
        Ok(Self {
            noun: self.noun,
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self.rows.iter().map(pick).collect(),
        })
    }
}

impl Serialize for Listing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Row<'a>(&'a [String], &'a [Value]);

        impl Serialize for Row<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (column, value) in self.0.iter().zip(self.1) {
                    map.serialize_entry(column, value)?;
                }
                map.end()
            }
        }

        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Row(&self.columns, row))?;
        }
        seq.end()
    }
}

impl TableDisplay for Listing {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.rows.is_empty() {
            writeln!(writer, "No {} found", self.noun)?;
            return Ok(());
        }

        let headers: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(cell).collect())
            .collect();
        write_grid(writer, &headers, &rows)
    }

    fn write_values<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(cell).collect();
            writeln!(writer, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Plain informational message.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message text.
    pub message: String,
}

impl Message {
    /// Create an informational message.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl TableDisplay for Message {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}", self.message)?;
        Ok(())
    }

    fn write_values<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}", self.message)?;
        Ok(())
    }
}

/// Render a JSON value as a single display cell.
#[must_use]
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) if items.iter().all(is_scalar) => {
            items.iter().map(cell).collect::<Vec<_>>().join(", ")
        }
        other => other.to_string(),
    }
}

const fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn attribute_name(column: &str) -> String {
    column.to_lowercase().replace(' ', "_")
}

fn unknown_columns(columns: &[String]) -> CliError {
    CliError::InvalidArgument(format!("no recognized column names in {columns:?}"))
}

/// Write an ASCII grid with a header row.
fn write_grid<W: Write>(writer: &mut W, headers: &[&str], rows: &[Vec<String>]) -> Result<(), CliError> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let border: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .collect::<String>()
        + "+";

    let write_row = |writer: &mut W, cells: &[&str]| -> std::io::Result<()> {
        for (value, width) in cells.iter().zip(&widths) {
            write!(writer, "| {value:<width$} ")?;
        }
        writeln!(writer, "|")
    };

    writeln!(writer, "{border}")?;
    write_row(&mut *writer, headers)?;
    writeln!(writer, "{border}")?;
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        write_row(&mut *writer, &cells)?;
    }
    writeln!(writer, "{border}")?;
    Ok(())
}
