use env_logger::Env;
use pdf_notes::reorder::column_for;
use pdf_notes::{extract_page_dimensions, parse_fdf_notes_file};
use std::env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: debug_notes <notes_path> [pdf_path]");
        std::process::exit(1);
    }

    let notes_by_page = parse_fdf_notes_file(&args[1]).expect("Failed to read notes");
    let dimensions = args
        .get(2)
        .map(|pdf| extract_page_dimensions(pdf).expect("Failed to read PDF"));

    for (page, notes) in &notes_by_page {
        let width = dimensions
            .as_ref()
            .and_then(|d| d.get(page))
            .map(|g| g.width);
        match width {
            Some(w) => println!("=== PAGE {} ({} notes, width {:.1}) ===", page, notes.len(), w),
            None => println!("=== PAGE {} ({} notes) ===", page, notes.len()),
        }
        for note in notes {
            let column = width
                .map(|w| format!("{:?}", column_for(note.x_center(), w)))
                .unwrap_or_else(|| "?".to_string());
            println!(
                "  x={:7.1} y={:7.1} col={:5} text={:?}",
                note.x_center(),
                note.y_top(),
                column,
                note.content()
            );
        }
        println!();
    }
}
