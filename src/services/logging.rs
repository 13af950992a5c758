// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Tracing setup and log redaction helpers.

use tracing_subscriber::EnvFilter;
use url::Url;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "scrape_agent=info,tower_http=info";

/// Install the global tracing subscriber. `RUST_LOG` overrides `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Anonymize a target URL for logging.
/// Drops credentials, query string and fragment, which may carry tokens:
/// "https://user:pw@example.com/p?token=abc" -> "https://example.com/p"
pub fn anonymize_url(url: &Url) -> String {
    let mut clean = url.clone();
    // Only fails for cannot-be-a-base URLs, which carry no credentials
    let _ = clean.set_username("");
    let _ = clean.set_password(None);
    clean.set_query(None);
    clean.set_fragment(None);
    clean.to_string()
}
