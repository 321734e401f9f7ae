// src/pdf/models.rs

/// Text pulled out of one PDF, ready for field extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormText {
    pub title: String,      // First line of page one
    pub lines: Vec<String>, // Every page's lines, in page order
    pub page_count: usize,  // Pages in the file, including ones with no text
}

impl FormText {
    /// Builds the form text from per-page strings, skipping pages that carry no text.
    /// Returns `None` when there are no pages at all.
    pub fn from_pages(pages: &[String]) -> Option<Self> {
        let first_page = pages.first()?;

        // pdf-extract emits blank lines before the first glyph run on a page.
        // The title line itself is kept exactly as extracted.
        let title = first_page
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("")
            .to_string();

        let lines = pages
            .iter()
            .enumerate()
            .filter(|(index, text)| {
                let has_text = !text.trim().is_empty();
                if !has_text {
                    tracing::debug!("Page {} has no text, skipping", index + 1);
                }
                has_text
            })
            .flat_map(|(_, text)| text.lines().map(str::to_string))
            .collect();

        Some(Self { title, lines, page_count: pages.len() })
    }
}
