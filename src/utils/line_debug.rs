// src/utils/line_debug.rs
use std::fs;
use std::path::Path;

use crate::extractors::fields::{classify_line, LineKind};
use crate::utils::error::AppError;

/// Renders every extracted line with the scanner's view of it.
///
/// `MARK <id>` starts a field, `CONT` extends the open one, `SKIP` is dropped
/// because no field is open yet, and `BLANK` is ignored.
pub fn render_line_dump(title: &str, lines: &[String]) -> String {
    let mut dump = format!("# title: {}\n", title);
    let mut field_open = false;

    for (index, line) in lines.iter().enumerate() {
        let tag = match classify_line(line) {
            LineKind::Blank => "BLANK".to_string(),
            LineKind::Marker { id, .. } => {
                field_open = true;
                format!("MARK {}", id)
            }
            LineKind::Continuation(_) if field_open => "CONT".to_string(),
            LineKind::Continuation(_) => "SKIP".to_string(),
        };
        dump.push_str(&format!("{:>5} {:<10} | {}\n", index + 1, tag, line));
    }

    dump
}

/// Writes the line dump for one form, creating the parent directory if needed.
pub fn save_line_dump(title: &str, lines: &[String], filename: &Path) -> Result<(), AppError> {
    if let Some(parent) = filename.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(filename, render_line_dump(title, lines))?;

    tracing::info!("Saved line dump to {}", filename.display());
    Ok(())
}
