//! Command results and how they are printed
//!
//! List commands produce a [`Table`], show commands a key/value [`Detail`],
//! mutation commands nothing at all.

use crate::error::{ApiError, Result};
use crate::resource::Resource;
use clap::ValueEnum;
use prettytable::{Cell, Row, Table as PrettyTable};
use serde_json::{Map, Value};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    /// Bare values, one row per line
    Value,
}

/// Ordered columns plus rows of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// One row per resource, one cell per column
    pub fn from_resources(columns: &[String], resources: &[Resource]) -> Self {
        let rows = resources
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| r.attr_display(&column_field(c)))
                    .collect()
            })
            .collect();

        Self {
            columns: columns.to_vec(),
            rows,
        }
    }
}

/// Key/value pairs sorted by key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub fields: Vec<(String, String)>,
}

impl Detail {
    pub fn from_map(info: &Map<String, Value>) -> Self {
        let mut fields: Vec<(String, String)> = info
            .iter()
            .map(|(k, v)| (k.clone(), cell(v)))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    Table(Table),
    Detail(Detail),
    Nothing,
}

/// Attribute name behind a column header: "Created At" -> "created_at"
pub fn column_field(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse `key[:asc|desc],...` into (field, ascending) pairs
pub fn parse_sort(order: &str) -> Result<Vec<(String, bool)>> {
    order.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|item| {
            let (key, direction) = match item.split_once(':') {
                Some((k, d)) => (k.trim(), d.trim()),
                None => (item, "asc"),
            };
            if key.is_empty() {
                return Err(ApiError::command(format!("Invalid sort key in '{}'", order)));
            }
            match direction {
                "asc" => Ok((key.to_string(), true)),
                "desc" => Ok((key.to_string(), false)),
                other => Err(ApiError::command(format!(
                    "Unknown sort direction '{}', must be 'asc' or 'desc'",
                    other
                ))),
            }
        })
        .collect()
}

/// Finite numeric value of a cell; words such as `nan` or `inf` stay text
fn numeric(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Total order over cells: numbers first in numeric order, then text
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (numeric(a), numeric(b)) {
        (Some(na), Some(nb)) => na.total_cmp(&nb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Sort resources by a `key[:direction]` list, first key most significant
pub fn sort_items(items: &mut [Resource], order: &str) -> Result<()> {
    let keys = parse_sort(order)?;

    items.sort_by(|a, b| {
        for (key, ascending) in &keys {
            let cmp = compare_cells(&a.attr_display(key), &b.attr_display(key));
            let cmp = if *ascending { cmp } else { cmp.reverse() };
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    });

    Ok(())
}

/// Render a command result in the requested format
pub fn render(output: &CommandOutput, format: OutputFormat) -> Result<String> {
    let text = match (output, format) {
        (CommandOutput::Nothing, _) => String::new(),
        (CommandOutput::Table(table), OutputFormat::Table) => {
            prettytable_grid(&table.columns, &table.rows)
        }
        (CommandOutput::Detail(detail), OutputFormat::Table) => {
            let rows: Vec<Vec<String>> = detail
                .fields
                .iter()
                .map(|(k, v)| vec![k.clone(), v.clone()])
                .collect();
            prettytable_grid(&["Field".to_string(), "Value".to_string()], &rows)
        }
        (CommandOutput::Table(table), OutputFormat::Value) => table
            .rows
            .iter()
            .map(|row| format!("{}\n", row.join(" ")))
            .collect(),
        (CommandOutput::Detail(detail), OutputFormat::Value) => detail
            .fields
            .iter()
            .map(|(_, v)| format!("{}\n", v))
            .collect(),
        (output, OutputFormat::Json) => {
            let mut text = serde_json::to_string_pretty(&to_json(output))
                .map_err(|e| ApiError::command(format!("Failed to render JSON: {}", e)))?;
            text.push('\n');
            text
        }
        (output, OutputFormat::Yaml) => serde_yaml::to_string(&to_json(output))
            .map_err(|e| ApiError::command(format!("Failed to render YAML: {}", e)))?,
    };
    Ok(text)
}

fn to_json(output: &CommandOutput) -> Value {
    match output {
        CommandOutput::Nothing => Value::Null,
        CommandOutput::Table(table) => Value::Array(
            table
                .rows
                .iter()
                .map(|row| {
                    let obj: Map<String, Value> = table
                        .columns
                        .iter()
                        .cloned()
                        .zip(row.iter().cloned().map(Value::String))
                        .collect();
                    Value::Object(obj)
                })
                .collect(),
        ),
        CommandOutput::Detail(detail) => Value::Object(
            detail
                .fields
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        ),
    }
}

/// Grid with a title row, drawn by prettytable
fn prettytable_grid(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut table = PrettyTable::new();
    table.set_titles(Row::new(columns.iter().map(|c| Cell::new(c)).collect()));
    for row in rows {
        table.add_row(Row::new(row.iter().map(|c| Cell::new(c)).collect()));
    }
    table.to_string()
}
