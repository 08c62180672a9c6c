//! Process-wide hierarchy
//!
//! Created on first use by [`get_logger`]; torn down explicitly with
//! [`shutdown`]. Nothing drains it automatically at process exit, so call
//! `shutdown` before returning from `main`.

use super::config::BasicConfig;
use super::error::Result;
use super::hierarchy::Hierarchy;
use super::logger::Logger;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Hierarchy> = OnceLock::new();

pub fn global() -> &'static Hierarchy {
    GLOBAL.get_or_init(Hierarchy::new)
}

/// Process-wide logger called `name`; `""` is the root
pub fn get_logger(name: &str) -> Logger {
    global().get_logger(name)
}

pub fn root_logger() -> Logger {
    global().root()
}

/// Configure the process-wide root logger, see [`Hierarchy::basic_config`]
pub fn basic_config(config: BasicConfig) -> Result<()> {
    global().basic_config(config)
}

/// Drain every pending record and close all handlers, see [`Hierarchy::shutdown`]
pub fn shutdown() {
    if let Some(hierarchy) = GLOBAL.get() {
        hierarchy.shutdown();
    }
}
