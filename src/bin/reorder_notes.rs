//! CLI tool for writing highlight notes in reading order

use env_logger::Env;
use pdf_notes::{process_notes, ReportOptions};
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

fn logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init()
}

/// Prompt on stdin and return the trimmed answer
fn prompt(message: &str) -> String {
    print!("{}", message);
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).unwrap_or(0) == 0 {
        eprintln!();
        eprintln!("Error: no input");
        process::exit(1);
    }
    line.trim().to_string()
}

/// Keep asking until the path exists
fn get_file_path(message: &str) -> String {
    loop {
        let path = prompt(message);
        if Path::new(&path).exists() {
            return path;
        }
        println!("Error: File not found at: {}", path);
    }
}

/// Escape a string for embedding in a JSON string literal
fn json_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn main() {
    logging();

    let args: Vec<String> = env::args().collect();
    let json_output = args.iter().any(|a| a == "--json");
    let keep_question_marks = args.iter().any(|a| a == "--keep-question-marks");
    let paths: Vec<&String> = args.iter().skip(1).filter(|a| !a.starts_with("--")).collect();

    let (pdf_path, notes_path, output_path) = match paths.as_slice() {
        [] => {
            let pdf = get_file_path("Enter the absolute path to the PDF file: ");
            let notes = get_file_path("Enter the absolute path to the FDF notes file: ");
            let output = prompt("Enter the absolute path for the output file: ");
            (pdf, notes, output)
        }
        [pdf, notes, output] => (pdf.to_string(), notes.to_string(), output.to_string()),
        _ => {
            eprintln!(
                "Usage: {} <pdf_file> <notes_file> <output_file> [--keep-question-marks] [--json]",
                args[0]
            );
            eprintln!("       {}    (prompts for the paths)", args[0]);
            eprintln!();
            eprintln!("Writes highlight notes from an FDF file in two-column reading order.");
            process::exit(1);
        }
    };

    if let Some(output_dir) = Path::new(&output_path).parent() {
        if !output_dir.as_os_str().is_empty() && !output_dir.exists() {
            if let Err(e) = fs::create_dir_all(output_dir) {
                eprintln!("Error: Could not create output directory: {}", e);
                process::exit(1);
            }
        }
    }

    let options = ReportOptions {
        strip_stray_question_marks: !keep_question_marks,
    };

    match process_notes(&pdf_path, &notes_path, &output_path, &options) {
        Ok(result) => {
            if json_output {
                println!(
                    r#"{{"page_count":{},"annotated_pages":{},"note_count":{},"processing_time_ms":{},"output":"{}"}}"#,
                    result.page_count,
                    result.annotated_pages,
                    result.note_count,
                    result.processing_time_ms,
                    json_escape(&output_path)
                );
            } else {
                println!("Notes written to: {}", output_path);
                println!("Pages: {}", result.page_count);
                println!(
                    "Highlights: {} on {} pages",
                    result.note_count, result.annotated_pages
                );
                println!("Processing time: {}ms", result.processing_time_ms);
            }
        }
        Err(e) => {
            if json_output {
                println!(r#"{{"error":"{}"}}"#, json_escape(&e.to_string()));
            } else {
                eprintln!("Error: {}", e);
            }
            process::exit(1);
        }
    }
}
