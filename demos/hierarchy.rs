//! Logger hierarchy example
//!
//! Shows level inheritance along dotted names, per-logger handlers and
//! many threads logging through one delivery worker.
//!
//! Run with: cargo run --example hierarchy

use logtree::prelude::*;
use std::thread;

fn main() -> Result<()> {
    println!("=== logtree - Hierarchy Example ===\n");

    let hierarchy = Hierarchy::new();
    let console = Handler::stream(std::io::stdout())
        .with_formatter(Formatter::new("[{name<12}] {level<7} {message}")?)
        .into_shared();

    let app = hierarchy.get_logger("app");
    let db = hierarchy.get_logger("app.db");
    let http = hierarchy.get_logger("app.http");
    for logger in [&app, &db, &http] {
        logger.add_handler(console.clone());
    }

    println!("1. app at INFO, children inherit it:");
    app.set_level(Level::Info);
    db.debug("hidden");
    db.info("connected");
    http.info("listening");

    println!("2. app.db overrides with DEBUG:");
    db.set_level(Level::Debug);
    db.debug("query plan cached");
    http.debug("hidden");

    println!("3. Eight threads logging concurrently:");
    let workers: Vec<_> = (0..8)
        .map(|t| {
            let logger = hierarchy.get_logger(&format!("app.worker{}", t));
            logger.add_handler(console.clone());
            thread::spawn(move || {
                for job in 0..3 {
                    logtree::info!(logger, "finished job {}", job);
                }
            })
        })
        .collect();
    for worker in workers {
        let _ = worker.join();
    }

    hierarchy.shutdown();
    println!(
        "\nDelivered {} records, {} dropped",
        hierarchy.metrics().total_logged(),
        hierarchy.metrics().dropped_count()
    );
    Ok(())
}
