//! File logging example
//!
//! Demonstrates truncating and appending file output, the start header and
//! configuration loaded from JSON.
//!
//! Run with: cargo run --example file_logging

use logtree::prelude::*;
use logtree::BasicConfigFile;
use std::fs;

fn main() -> Result<()> {
    println!("=== logtree - File Logging Example ===\n");

    let dir = std::env::temp_dir().join("logtree-demo");
    fs::create_dir_all(&dir)?;
    let path = dir.join("app.log");

    println!("1. Fresh file with a start header: {}", path.display());
    logtree::basic_config(
        BasicConfig::new()
            .level(Level::Info)
            .file_name(&path)
            .write_start_header(true),
    )?;
    let log = logtree::get_logger("");
    for i in 0..3 {
        log.info(format_args!("first run, record {}", i));
    }
    logtree::shutdown();

    println!("2. Appending a second run, configured from JSON");
    let json = format!(
        r#"{{ "level": "DEBUG", "file_name": {}, "file_append": true,
             "write_start_header": true, "format": "{{level<5}} | {{message}}" }}"#,
        serde_json::to_string(&path)?
    );
    logtree::basic_config(BasicConfigFile::from_json(&json)?.into_basic_config()?)?;
    log.debug("second run");
    logtree::shutdown();

    println!("\n--- {} ---", path.display());
    print!("{}", fs::read_to_string(&path)?);

    Ok(())
}
