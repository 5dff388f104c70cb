// Entry point and high-level CLI flow.
//
// The Rust binary mirrors the behavior of the original JavaScript tooling:
// - Option [1] converts the workbook to the dashboard JSON once, printing a
//   per-department preview.
// - Option [2] keeps running, polling the workbook's modification time and
//   re-running the full conversion whenever the file changes.
mod assemble;
mod config;
mod loader;
mod output;
mod schema;
mod types;
mod util;

use config::Config;
use loader::WorkbookFile;
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::thread;
use std::time::SystemTime;
use types::Document;

/// Read a single line of input after printing the common "Enter choice:"
/// prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after a one-shot conversion.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// One full conversion: read the workbook, assemble the document, write the
/// JSON. Nothing is written when the workbook cannot be read.
fn run_convert(cfg: &Config) -> Result<Document, Box<dyn Error>> {
    let mut book = WorkbookFile::open(&cfg.workbook_path)?;
    let doc = assemble::build_document(&mut book, cfg)?;
    output::write_json(&cfg.output_path, &doc)?;
    Ok(doc)
}

/// Handle option [1]: convert once and print a summary of what was built.
fn handle_convert(cfg: &Config) {
    match run_convert(cfg) {
        Ok(doc) => {
            let stats = doc.stats();
            println!(
                "Converted {} -> {} ({} departments, {} levels, {} zones)\n",
                cfg.workbook_path.display(),
                cfg.output_path.display(),
                util::format_int(stats.departments as i64),
                util::format_int(stats.levels as i64),
                util::format_int(stats.zones as i64),
            );
            output::preview_table_rows(&output::overview_rows(&doc), 10);
        }
        Err(e) => {
            eprintln!("Conversion failed: {}\n", e);
        }
    }
}

fn modified_time(cfg: &Config) -> Option<SystemTime> {
    fs::metadata(&cfg.workbook_path)
        .and_then(|m| m.modified())
        .ok()
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Handle option [2]: poll the workbook's mtime on a fixed interval and
/// re-run the full conversion on change. A failed cycle is logged and the
/// loop keeps going; the next change (or the next poll after a transient
/// error) simply tries again.
fn handle_watch(cfg: &Config) {
    println!(
        "Watching {} (every {}s, Ctrl-C to stop)...",
        cfg.workbook_path.display(),
        cfg.poll_interval.as_secs()
    );
    match run_convert(cfg) {
        Ok(doc) => {
            let stats = doc.stats();
            println!(
                "[{}] Wrote {} ({} departments)",
                timestamp(),
                cfg.output_path.display(),
                util::format_int(stats.departments as i64)
            );
        }
        Err(e) => eprintln!("[{}] Conversion failed: {}", timestamp(), e),
    }

    let mut last_seen = modified_time(cfg);
    loop {
        thread::sleep(cfg.poll_interval);
        let current = modified_time(cfg);
        if current.is_some() && current != last_seen {
            last_seen = current;
            match run_convert(cfg) {
                Ok(doc) => {
                    let stats = doc.stats();
                    println!(
                        "[{}] Workbook changed, rewrote {} ({} departments)",
                        timestamp(),
                        cfg.output_path.display(),
                        util::format_int(stats.departments as i64)
                    );
                }
                Err(e) => eprintln!("[{}] Conversion failed: {}", timestamp(), e),
            }
        }
    }
}

fn main() {
    let cfg = Config::default();
    loop {
        println!("Warehouse Dashboard Converter");
        println!("[1] Convert workbook to JSON");
        println!("[2] Watch workbook and convert on change\n");
        match read_choice().as_str() {
            "1" => {
                println!();
                handle_convert(&cfg);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "2" => {
                println!();
                handle_watch(&cfg);
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
