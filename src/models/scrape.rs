// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Wire types for the scrape endpoints and their normalized, validated forms.
//!
//! Request bodies are deserialized into loosely-typed wire structs and then
//! normalized into jobs (`ScrapeJob`, `SelectorJob`) holding a parsed URL and
//! compiled selectors. Nothing downstream of normalization sees raw strings.

use crate::models::error::ScrapeError;
use scraper::Selector;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use url::Url;
use utoipa::ToSchema;

/// One extracted record: `field_name -> string | null`, in field order.
pub type ExtractedRecord = Map<String, Value>;

// ---------------------------------------------------------------------------
// Extraction types
// ---------------------------------------------------------------------------

/// Rule for turning a matched element into a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionType {
    /// Whitespace-collapsed, trimmed text of the element and its descendants
    Text,
    Href,
    Src,
    Alt,
    DataId,
    /// Any attribute, named explicitly by the caller
    Attribute(String),
}

impl ExtractionType {
    /// Resolve the wire pair `extraction_type` / `attribute`.
    pub fn parse(kind: &str, attribute: Option<&str>) -> Result<Self, ScrapeError> {
        match kind {
            "text" => Ok(ExtractionType::Text),
            "href" => Ok(ExtractionType::Href),
            "src" => Ok(ExtractionType::Src),
            "alt" => Ok(ExtractionType::Alt),
            "data-id" => Ok(ExtractionType::DataId),
            "attribute" => match attribute.map(str::trim) {
                Some(name) if !name.is_empty() => Ok(ExtractionType::Attribute(name.to_string())),
                _ => Err(ScrapeError::Validation(
                    "extraction_type 'attribute' requires a non-empty 'attribute' name".to_string(),
                )),
            },
            other => Err(ScrapeError::Validation(format!(
                "Unknown extraction_type '{other}'; expected one of: text, href, src, alt, data-id, attribute"
            ))),
        }
    }

    /// Attribute read by this extraction, `None` for text.
    pub fn attribute_name(&self) -> Option<&str> {
        match self {
            ExtractionType::Text => None,
            ExtractionType::Href => Some("href"),
            ExtractionType::Src => Some("src"),
            ExtractionType::Alt => Some("alt"),
            ExtractionType::DataId => Some("data-id"),
            ExtractionType::Attribute(name) => Some(name.as_str()),
        }
    }
}

impl fmt::Display for ExtractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionType::Text => write!(f, "text"),
            ExtractionType::Href => write!(f, "href"),
            ExtractionType::Src => write!(f, "src"),
            ExtractionType::Alt => write!(f, "alt"),
            ExtractionType::DataId => write!(f, "data-id"),
            ExtractionType::Attribute(_) => write!(f, "attribute"),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Field definition as sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldDefinition {
    /// Key of the value in each output record
    pub field_name: String,
    /// CSS selector evaluated relative to the container
    pub selector: String,
    /// One of: text, href, src, alt, data-id, attribute (default: text)
    #[serde(default = "default_extraction_type")]
    pub extraction_type: String,
    /// Attribute name, required when `extraction_type` is `attribute`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

fn default_extraction_type() -> String {
    "text".to_string()
}

impl FieldDefinition {
    pub fn text(field_name: &str, selector: &str) -> Self {
        Self {
            field_name: field_name.to_string(),
            selector: selector.to_string(),
            extraction_type: default_extraction_type(),
            attribute: None,
        }
    }

    pub fn of_type(field_name: &str, selector: &str, extraction_type: &str) -> Self {
        Self {
            extraction_type: extraction_type.to_string(),
            ..Self::text(field_name, selector)
        }
    }
}

/// Both accepted shapes of the `fields` list.
///
/// Older clients send a plain object `{"title": "h1", "price": ".price"}`;
/// newer ones send a list of [`FieldDefinition`]s.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldsInput {
    List(Vec<FieldDefinition>),
    Selectors(Map<String, Value>),
}

// Dispatch on the JSON shape so a bad list entry reports its own error
// instead of "did not match any variant".
impl<'de> Deserialize<'de> for FieldsInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => serde_json::from_value(Value::Array(items))
                .map(FieldsInput::List)
                .map_err(|e| de::Error::custom(format!("invalid field definition: {e}"))),
            Value::Object(map) => Ok(FieldsInput::Selectors(map)),
            _ => Err(de::Error::custom(
                "expected a list of field definitions or a {field_name: selector} object",
            )),
        }
    }
}

impl Default for FieldsInput {
    fn default() -> Self {
        FieldsInput::List(Vec::new())
    }
}

/// Request body of `POST /scrape/advanced`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScrapeRequest {
    /// Absolute http(s) URL of the page to scrape
    pub url: String,
    /// CSS selector matching one element per record
    pub container_selector: String,
    /// Field definitions; also accepted as `data_fields`, or as a
    /// `{field_name: selector}` object for text-only extraction
    #[serde(default, alias = "data_fields")]
    #[schema(value_type = Vec<FieldDefinition>)]
    pub fields: FieldsInput,
}

/// Request body of `POST /scrape` and `POST /scrape/all`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SelectorRequest {
    pub url: String,
    pub css_selector: String,
}

// ---------------------------------------------------------------------------
// Normalized jobs
// ---------------------------------------------------------------------------

/// A validated field: compiled selector and resolved extraction type
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field_name: String,
    pub selector: Selector,
    pub extraction_type: ExtractionType,
}

/// A validated `ScrapeRequest`, ready for the pipeline
#[derive(Debug, Clone)]
pub struct ScrapeJob {
    pub url: Url,
    /// Selector source, kept for user-facing messages
    pub container_selector: String,
    pub containers: Selector,
    pub fields: Vec<FieldSpec>,
}

/// A validated `SelectorRequest`
#[derive(Debug, Clone)]
pub struct SelectorJob {
    pub url: Url,
    pub css_selector: String,
    pub selector: Selector,
}

impl ScrapeRequest {
    /// Validate the request and compile its selectors.
    pub fn normalize(self) -> Result<ScrapeJob, ScrapeError> {
        let url = parse_target_url(&self.url)?;
        let containers = parse_selector(&self.container_selector, "container_selector")?;
        let fields = normalize_fields(self.fields)?;

        Ok(ScrapeJob {
            url,
            container_selector: self.container_selector,
            containers,
            fields,
        })
    }
}

impl SelectorRequest {
    pub fn normalize(self) -> Result<SelectorJob, ScrapeError> {
        let url = parse_target_url(&self.url)?;
        let selector = parse_selector(&self.css_selector, "css_selector")?;

        Ok(SelectorJob {
            url,
            css_selector: self.css_selector,
            selector,
        })
    }
}

fn normalize_fields(fields: FieldsInput) -> Result<Vec<FieldSpec>, ScrapeError> {
    match fields {
        FieldsInput::List(definitions) => definitions
            .into_iter()
            .map(|definition| {
                let selector = parse_selector(
                    &definition.selector,
                    &format!("selector of field '{}'", definition.field_name),
                )?;
                let extraction_type = ExtractionType::parse(
                    &definition.extraction_type,
                    definition.attribute.as_deref(),
                )?;
                Ok(FieldSpec {
                    field_name: definition.field_name,
                    selector,
                    extraction_type,
                })
            })
            .collect(),
        FieldsInput::Selectors(map) => map
            .into_iter()
            .map(|(field_name, value)| {
                let Value::String(source) = value else {
                    return Err(ScrapeError::Validation(format!(
                        "selector of field '{field_name}' must be a string"
                    )));
                };
                let selector =
                    parse_selector(&source, &format!("selector of field '{field_name}'"))?;
                Ok(FieldSpec {
                    field_name,
                    selector,
                    extraction_type: ExtractionType::Text,
                })
            })
            .collect(),
    }
}

/// Parse an absolute `http`/`https` URL.
pub fn parse_target_url(raw: &str) -> Result<Url, ScrapeError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ScrapeError::Validation(format!("Invalid URL '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ScrapeError::Validation(format!(
            "Invalid URL '{raw}': unsupported scheme '{scheme}', expected http or https"
        ))),
    }
}

/// Compile a CSS selector; `what` names the offending request key in errors.
pub fn parse_selector(source: &str, what: &str) -> Result<Selector, ScrapeError> {
    if source.trim().is_empty() {
        return Err(ScrapeError::Validation(format!("{what} must not be empty")));
    }

    Selector::parse(source)
        .map_err(|e| ScrapeError::Validation(format!("Invalid {what} '{source}': {e}")))
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Warning,
}

/// Response body of `POST /scrape/advanced`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScrapeResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of matched containers
    pub count: usize,
    /// One record per container, in document order
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<ExtractedRecord>,
}

impl ScrapeResponse {
    pub fn success(data: Vec<ExtractedRecord>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            count: data.len(),
            data,
        }
    }

    pub fn no_containers(container_selector: &str) -> Self {
        Self {
            status: ResponseStatus::Warning,
            message: Some(no_match_message("containers", container_selector)),
            count: 0,
            data: Vec::new(),
        }
    }
}

/// Response body of `POST /scrape`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SingleScrapeResponse {
    pub status: ResponseStatus,
    /// Text of the first matching element
    pub data: String,
}

/// Response body of `POST /scrape/all`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MultiScrapeResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub count: usize,
    pub data: Vec<String>,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

pub fn no_match_message(what: &str, selector: &str) -> String {
    format!("No {what} found for selector: '{selector}'")
}
