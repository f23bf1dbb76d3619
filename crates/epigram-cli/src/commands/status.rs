//! Status command handler

use anyhow::Result;

use epigram_core::QuoteStore;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &QuoteStore, output: &Output) -> Result<()> {
    let config = store.config();
    let quote_count = store.all().len();
    let category_count = store.categories().len();
    let last_sync = store.last_sync();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "counts": {
                        "quotes": quote_count,
                        "categories": category_count
                    },
                    "sync": {
                        "enabled": config.sync_enabled,
                        "server_url": config.server_url,
                        "interval_secs": config.sync_interval_secs,
                        "last_sync": last_sync.map(|t| t.to_rfc3339())
                    },
                    "storage": {
                        "data_dir": config.data_dir,
                        "last_write_ok": store.last_persist_error().is_none()
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", quote_count);
        }
        OutputFormat::Human => {
            println!("epigram Status");
            println!("==============");
            println!();
            println!("Collection:");
            println!("  Quotes:     {}", quote_count);
            println!("  Categories: {}", category_count);
            println!();
            println!("Sync:");
            println!(
                "  Status:   {}",
                if config.sync_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            println!("  Server:   {}", config.server_url);
            println!("  Interval: {}s", config.sync_interval_secs);
            match last_sync {
                Some(at) => println!("  Last:     {}", at.format("%Y-%m-%d %H:%M:%S")),
                None => println!("  Last:     never"),
            }
            println!();
            println!("Storage:");
            println!("  Data dir: {}", config.data_dir.display());
            if let Some(e) = store.last_persist_error() {
                println!("  ⚠ Last write was skipped: {}", e);
            }
        }
    }

    Ok(())
}
