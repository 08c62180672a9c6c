//! Basic logger usage example
//!
//! Configures the root logger for stderr with level and pattern coloring
//! and logs at every level.
//!
//! Run with: cargo run --example basic_usage

use colored::Color;
use logtree::prelude::*;
use logtree::{info, warning, PatternColor};
use std::collections::HashMap;

fn main() -> Result<()> {
    println!("=== logtree - Basic Usage Example ===\n");

    logtree::basic_config(
        BasicConfig::new()
            .level(Level::Debug)
            .writer(std::io::stderr())
            .format(Template::parse("{level<7} {name<8} {message}")?),
    )?;

    let root = logtree::root_logger();

    println!("1. Logging at different levels:");
    root.debug("This is a debug message");
    root.info("This is an info message");
    root.warning("This is a warning message");
    root.error("This is an error message");
    root.fatal("This is a fatal message");

    println!("\n2. Turning on coloring:");
    let handler = root.handlers().remove(0);
    handler.update_formatter(|f| -> Result<()> {
        f.enable_level_coloring(true);
        f.set_pattern_coloring(
            HashMap::from([
                ("quoted".to_string(), Style::fg(Color::Red)),
                ("number".to_string(), Style::fg(Color::Cyan)),
            ]),
            vec![
                PatternColor::parse("quoted", r#"('[^']+'|"[^"]+")"#)?,
                PatternColor::parse("number", r"\b\d+\b")?,
            ],
        );
        f.enable_pattern_coloring(true);
        Ok(())
    })?;

    let port = 8080;
    info!(root, "Server listening on port {}", port);
    warning!(root, "Config key 'timeout' missing, using {} ms", 500);

    println!("\n3. Raising the level:");
    root.set_level(Level::Error);
    root.info("Filtered out");
    root.error("Still visible");

    logtree::shutdown();
    println!("\n=== Example completed successfully ===");
    Ok(())
}
