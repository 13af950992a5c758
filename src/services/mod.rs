// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod client;
pub mod extractor;
pub mod fetcher;
pub mod logging;
pub mod render;
pub mod scrape;
