// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use clap::Args;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Server configuration.
///
/// Every option can also be supplied through its environment variable, which is
/// how the container deployment configures the service.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    #[arg(long, env = "SCRAPE_BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Timeout for fetching a target page, in seconds
    #[arg(long, env = "SCRAPE_FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_secs: u64,

    /// User-Agent sent to target sites
    #[arg(long, env = "SCRAPE_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Accept-Language sent to target sites
    #[arg(long, env = "SCRAPE_ACCEPT_LANGUAGE", default_value = DEFAULT_ACCEPT_LANGUAGE)]
    pub accept_language: String,
}

/// Outbound request settings used by the fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

impl From<&ServerConfig> for FetchSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.fetch_timeout_secs),
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
        }
    }
}
