//! Generate CATEGORIES.md from the category registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-categories
//! ```
//!
//! The generated file is written to `trig_core/src/equations/CATEGORIES.md`.

use std::fs;
use std::path::Path;

use trig_core::equations::generate_categories_markdown;

fn main() {
    println!("Generating CATEGORIES.md...");

    let markdown = generate_categories_markdown();

    // Relative to the workspace root
    let output_path = Path::new("trig_core/src/equations/CATEGORIES.md");

    match fs::write(output_path, &markdown) {
        Ok(()) => {
            println!("Successfully wrote {} bytes to {}", markdown.len(), output_path.display());
        }
        Err(e) => {
            eprintln!("Error writing file: {}", e);
            std::process::exit(1);
        }
    }
}
