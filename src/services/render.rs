// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Rendering of scrape results for the command-line client.

use crate::models::scrape::{ExtractedRecord, ResponseStatus, ScrapeResponse};
use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for the terminal
    Table,
    /// Pretty-printed JSON array of records
    Json,
    /// CSV with one column per field
    Csv,
}

/// One-line outcome shown above the results.
pub fn summary(response: &ScrapeResponse) -> String {
    match response.status {
        ResponseStatus::Success => format!("Successfully scraped {} items.", response.count),
        ResponseStatus::Warning => match &response.message {
            Some(message) => format!("Warning: {message}"),
            None => "Warning: no items found. Check your selectors.".to_string(),
        },
    }
}

pub fn render(response: &ScrapeResponse, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(&response.data)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(&response.data).context("Failed to encode records as JSON")
        }
        OutputFormat::Csv => render_csv(&response.data),
    }
}

/// Union of record keys in first-seen order.
fn columns(records: &[ExtractedRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for key in records.iter().flat_map(|record| record.keys()) {
        if !columns.contains(key) {
            columns.push(key.clone());
        }
    }
    columns
}

/// Cell text; `null` and missing keys are empty.
fn cell(record: &ExtractedRecord, column: &str) -> String {
    match record.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn render_csv(records: &[ExtractedRecord]) -> Result<String> {
    let columns = columns(records);
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|column| cell(record, column)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn render_table(records: &[ExtractedRecord]) -> String {
    let columns = columns(records);
    if columns.is_empty() {
        return String::new();
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| columns.iter().map(|column| cell(record, column)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(text, &width)| format!("{text:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(columns.as_slice())];
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(rows.iter().map(|row| format_row(row.as_slice())));
    lines.join("\n")
}
