//! CLI inspector for a SliceMark database.
//!
//! Usage: `slicemark_cli [DB_PATH]`. Without a path an in-memory database is
//! opened, which prints an empty canvas.

use slicemark_core::db::{open_db, open_db_in_memory};
use slicemark_core::tagging::tag_tree::build_tag_tree;
use slicemark_core::{
    core_version, Bookmark, Canvas, CanvasService, MarkService, SqliteDocumentStore, TextMark,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("slicemark: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(db_path: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let conn = match db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let store = SqliteDocumentStore::try_new(&conn)?;

    let canvas = CanvasService::from_store(&store)?.load_canvas()?;
    let marks = MarkService::from_store(&store)?;
    let bookmarks = marks.list::<Bookmark>()?;
    let text_marks = marks.list::<TextMark>()?;

    println!("slicemark_core version={}", core_version());
    println!(
        "rows={} cards={} bookmarks={} domains={} textmarks={}",
        canvas.rows.len(),
        canvas.item_count(),
        bookmarks.len(),
        build_tag_tree(&bookmarks).len(),
        text_marks.len()
    );
    print!("{}", render_grid(&canvas));
    Ok(())
}

/// One line per row; each card fills its columns with the first letter of
/// its text, free columns print as `.`.
fn render_grid(canvas: &Canvas) -> String {
    let mut out = String::new();
    for (index, row) in canvas.rows.iter().enumerate() {
        let mut cells = vec!['.'; usize::from(canvas.total_cols)];
        for item in &row.items {
            let glyph = item.text.chars().next().unwrap_or('#');
            let start = usize::from(item.position.col.saturating_sub(1));
            let end = (start + usize::from(item.len)).min(cells.len());
            for cell in cells.iter_mut().take(end).skip(start) {
                *cell = glyph;
            }
        }
        out.push_str(&format!("{:>3} |{}|\n", index + 1, cells.iter().collect::<String>()));
    }
    out
}
