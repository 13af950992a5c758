// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Selector-driven record extraction over a parsed document.
//!
//! `scraper::Html` is not `Send`, so every function here parses and drops the
//! document synchronously; callers hand in the page source after the fetch
//! has completed.

use crate::models::scrape::{ExtractedRecord, FieldSpec};
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

/// Outcome of running a container selector over a page
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// One record per matched container, in document order
    Records(Vec<ExtractedRecord>),
    NoContainersMatched,
}

/// Resolve containers and extract every field from each of them.
pub fn extract_records(html: &str, containers: &Selector, fields: &[FieldSpec]) -> Extraction {
    let document = Html::parse_document(html);

    let records: Vec<ExtractedRecord> = document
        .select(containers)
        .map(|container| assemble_record(container, fields))
        .collect();

    if records.is_empty() {
        Extraction::NoContainersMatched
    } else {
        Extraction::Records(records)
    }
}

/// Build the record for one container.
///
/// Every field gets a key; misses are `null`. A repeated `field_name` keeps its
/// first position and takes the last value.
pub fn assemble_record(container: ElementRef<'_>, fields: &[FieldSpec]) -> ExtractedRecord {
    let mut record = Map::new();
    for field in fields {
        let value = extract_field(container, field).map_or(Value::Null, Value::String);
        record.insert(field.field_name.clone(), value);
    }
    record
}

/// Value of one field within a container, `None` when the selector or the
/// requested attribute is missing.
pub fn extract_field(container: ElementRef<'_>, field: &FieldSpec) -> Option<String> {
    let target = container.select(&field.selector).next()?;

    match field.extraction_type.attribute_name() {
        None => Some(element_text(target)),
        Some(name) => target.value().attr(name).map(str::to_string),
    }
}

/// Text of an element and its descendants with whitespace runs collapsed.
pub fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the first element matching `selector`, if any.
pub fn first_match_text(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    let text = document.select(selector).next().map(element_text);
    text
}

/// Texts of every element matching `selector`, in document order.
pub fn all_match_texts(html: &str, selector: &Selector) -> Vec<String> {
    let document = Html::parse_document(html);
    let texts = document.select(selector).map(element_text).collect();
    texts
}
