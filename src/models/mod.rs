// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod builder;
pub mod error;
pub mod scrape;
pub mod settings;
pub mod version;
