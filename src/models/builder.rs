// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Immutable request builder used by the command-line client.
//!
//! Every edit returns a new builder and leaves the original untouched, so a
//! caller can keep earlier states around (e.g. to show a diff or undo).

use crate::models::scrape::{FieldDefinition, FieldsInput, ScrapeRequest};

const NAMED_KINDS: [&str; 5] = ["text", "href", "src", "alt", "data-id"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBuilder {
    url: String,
    container_selector: String,
    fields: Vec<FieldDefinition>,
}

impl RequestBuilder {
    pub fn new(url: &str, container_selector: &str) -> Self {
        Self {
            url: url.to_string(),
            container_selector: container_selector.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn with_url(&self, url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..self.clone()
        }
    }

    pub fn with_container(&self, container_selector: &str) -> Self {
        Self {
            container_selector: container_selector.to_string(),
            ..self.clone()
        }
    }

    /// Append a field.
    pub fn with_field(&self, field: FieldDefinition) -> Self {
        let mut fields = self.fields.clone();
        fields.push(field);
        Self {
            fields,
            ..self.clone()
        }
    }

    /// Replace the field at `index`; out-of-range indices leave the fields unchanged.
    pub fn replace_field(&self, index: usize, field: FieldDefinition) -> Self {
        let fields = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, existing)| if i == index { field.clone() } else { existing.clone() })
            .collect();
        Self {
            fields,
            ..self.clone()
        }
    }

    /// Drop the field at `index`; out-of-range indices leave the fields unchanged.
    pub fn without_field(&self, index: usize) -> Self {
        let fields = self
            .fields
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, field)| field.clone())
            .collect();
        Self {
            fields,
            ..self.clone()
        }
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn build(&self) -> ScrapeRequest {
        ScrapeRequest {
            url: self.url.clone(),
            container_selector: self.container_selector.clone(),
            fields: FieldsInput::List(self.fields.clone()),
        }
    }

    /// Pretty-printed JSON payload this builder would send.
    pub fn preview(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.build())
    }
}

/// Parse a `name=selector[@kind]` command-line field.
///
/// `kind` is one of the named extraction types; any other value after `@` is
/// read as an attribute name (`tip=span@title`). Without `@` the field
/// extracts text.
pub fn parse_field_arg(arg: &str) -> Result<FieldDefinition, String> {
    let (name, rest) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=selector[@kind], got '{arg}'"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("field name is empty in '{arg}'"));
    }

    let (selector, kind) = match rest.rsplit_once('@') {
        Some((selector, kind)) => (selector.trim(), Some(kind.trim())),
        None => (rest.trim(), None),
    };
    if selector.is_empty() {
        return Err(format!("selector is empty in '{arg}'"));
    }

    let field = match kind {
        None => FieldDefinition::text(name, selector),
        Some(kind) if NAMED_KINDS.contains(&kind) => {
            FieldDefinition::of_type(name, selector, kind)
        }
        Some("") => return Err(format!("extraction kind is empty in '{arg}'")),
        Some(attribute) => FieldDefinition {
            attribute: Some(attribute.to_string()),
            ..FieldDefinition::of_type(name, selector, "attribute")
        },
    };

    Ok(field)
}
