// Run with: cargo run -p loctally-core --example debug_scan -- /path/to/scan
// Registered in loctally-core/Cargo.toml: [[example]] name = "debug_scan" path = "../debug_scan.rs"

use loctally_core::{ScanConfig, ScanMessage, Scanner};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn main() {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    println!("Scanning: {:?}", path);

    let config = ScanConfig {
        per_extension: true,
        poll_interval: Duration::from_millis(100),
        ..ScanConfig::default()
    };
    let scanner = Scanner::new(config);
    let (rx, handle) = scanner.scan(path);

    let start = Instant::now();
    let mut last_completed = 0u64;
    let mut stuck_count = 0;

    for msg in rx {
        match msg {
            ScanMessage::Progress(p) => {
                // Check if we're stuck (no directory finished since last tick)
                if p.completed_dirs == last_completed {
                    stuck_count += 1;
                } else {
                    stuck_count = 0;
                }
                last_completed = p.completed_dirs;

                println!(
                    "[{:>6.1}s] discovered={:<8} completed={:<8} pending={:<6} files={:<8} stuck={}",
                    start.elapsed().as_secs_f64(),
                    p.discovered_dirs,
                    p.completed_dirs,
                    p.pending_dirs(),
                    p.files_counted,
                    stuck_count,
                );
            }
            ScanMessage::Started(root) => {
                println!("[{:>6.1}s] STARTED {:?}", start.elapsed().as_secs_f64(), root);
            }
            ScanMessage::Completed => {
                println!("[{:>6.1}s] COMPLETED", start.elapsed().as_secs_f64());
            }
            ScanMessage::Failed(e) => {
                println!("[{:>6.1}s] ERROR: {}", start.elapsed().as_secs_f64(), e);
            }
        }
    }

    match handle.join().unwrap() {
        Ok(report) => {
            println!(
                "\nFinal: {:?}, {} files, {} lines ({} blank, {} comment)",
                report.status,
                loctally_core::format_count(report.file_count),
                loctally_core::format_count(report.totals.total),
                loctally_core::format_count(report.totals.blank),
                loctally_core::format_count(report.totals.comment),
            );
            for bucket in report.extensions.values() {
                println!("  {:<16} {:>8} files {:>10} lines", bucket.extension, bucket.files, bucket.lines.total);
            }
        }
        Err(e) => println!("\nFailed: {}", e),
    }
}
