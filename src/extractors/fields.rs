// src/extractors/fields.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// --- Regex Patterns (Lazy Static) ---
// A field starts with "12." or "(a)." at the beginning of a line. Everything after
// the period is the tail and becomes the start of the field's label.
// Parenthesized markers are exactly one word character: "(aa)." is a continuation line.
static MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(\d+)|\((\w)\))\.\s*(.*)").expect("Failed to compile MARKER_RE")
});

// --- Data Structures ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub id: String,    // e.g., "3" or "b"
    pub label: String, // Whitespace-collapsed text of the item
}

/// One extracted form. Field order is the order the markers appeared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    pub fields: Vec<Field>,
}

/// How a single physical line is treated by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty after trimming. Never changes scanner state.
    Blank,
    /// Starts a new field.
    Marker { id: &'a str, tail: &'a str },
    /// Extends the open field, or is dropped when none is open.
    Continuation(&'a str),
}

/// Classifies a line against the item marker pattern.
pub fn classify_line(raw: &str) -> LineKind<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }

    match MARKER_RE.captures(line) {
        Some(caps) => {
            // Exactly one of the two alternatives participates in a match
            let id = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            let tail = caps.get(3).map_or("", |m| m.as_str().trim());
            LineKind::Marker { id, tail }
        }
        None => LineKind::Continuation(line),
    }
}

/// Collapses every whitespace run to a single space and trims both ends.
pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

// --- Scanner State Machine ---
#[derive(Debug)]
enum ScanState {
    Idle,
    Open(Field), // label is raw here; normalized on flush
}

#[derive(Debug)]
struct FieldScanner {
    state: ScanState,
    fields: Vec<Field>,
}

impl FieldScanner {
    fn new() -> Self {
        Self { state: ScanState::Idle, fields: Vec::new() }
    }

    fn feed(&mut self, line: &str) {
        match classify_line(line) {
            LineKind::Blank => {}
            LineKind::Marker { id, tail } => self.on_marker(id, tail),
            LineKind::Continuation(text) => self.on_continuation(text),
        }
    }

    fn on_marker(&mut self, id: &str, tail: &str) {
        let next = ScanState::Open(Field { id: id.to_string(), label: tail.to_string() });
        if let ScanState::Open(previous) = std::mem::replace(&mut self.state, next) {
            self.flush(previous);
        }
    }

    fn on_continuation(&mut self, text: &str) {
        match &mut self.state {
            ScanState::Open(field) => {
                field.label.push(' ');
                field.label.push_str(text);
            }
            ScanState::Idle => {
                tracing::trace!("Dropping line before first marker: '{}'", text);
            }
        }
    }

    fn flush(&mut self, mut field: Field) {
        field.label = normalize_label(&field.label);
        tracing::trace!("Closed field {}: '{}'", field.id, field.label);
        self.fields.push(field);
    }

    fn finish(mut self) -> Vec<Field> {
        if let ScanState::Open(last) = std::mem::replace(&mut self.state, ScanState::Idle) {
            self.flush(last);
        }
        self.fields
    }
}

// --- Main Extractor Structure ---
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldExtractor;

impl FieldExtractor {
    pub fn new() -> Self { Self {} }

    /// Groups lines into numbered fields in a single forward pass.
    ///
    /// Never fails: any line sequence, including an empty one, produces a document.
    pub fn extract<I, S>(&self, lines: I, title: &str) -> Document
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scanner = FieldScanner::new();
        for line in lines {
            scanner.feed(line.as_ref());
        }

        let fields = scanner.finish();
        tracing::debug!("Extracted {} fields for '{}'", fields.len(), title);

        Document { title: title.to_string(), fields }
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn field(id: &str, label: &str) -> Field {
        Field { id: id.to_string(), label: label.to_string() }
    }

    #[test]
    fn test_continuation_joins_and_last_field_flushes_at_end() {
        let lines = ["1. First item text", "continued on next line", "2. Second item"];
        let doc = FieldExtractor::new().extract(lines, "FORM TITLE");

        assert_eq!(doc.title, "FORM TITLE");
        assert_eq!(
            doc.fields,
            vec![
                field("1", "First item text continued on next line"),
                field("2", "Second item"),
            ]
        );
    }

    #[test]
    fn test_no_markers_means_no_fields() {
        let lines = ["Instructions for applicants", "Please print clearly", "Office use only"];
        let doc = FieldExtractor::new().extract(lines, "Title");
        assert!(doc.fields.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let doc = FieldExtractor::new().extract(Vec::<String>::new(), "");
        assert_eq!(doc, Document { title: String::new(), fields: vec![] });
    }

    #[test]
    fn test_parenthesized_ids_lose_parentheses() {
        let lines = ["(a). Option A", "  more text  ", "(b). Option B"];
        let doc = FieldExtractor::new().extract(lines, "T");

        let ids: Vec<&str> = doc.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(doc.fields[0].label, "Option A more text");
    }

    #[test]
    fn test_whitespace_is_collapsed_on_flush() {
        let doc = FieldExtractor::new().extract(["1. Hello", "   world  "], "T");
        assert_eq!(doc.fields, vec![field("1", "Hello world")]);

        let doc = FieldExtractor::new().extract(["2.\tName  of\t\tapplicant", "(first,   last)"], "T");
        assert_eq!(doc.fields, vec![field("2", "Name of applicant (first, last)")]);
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let lines = vec!["Preamble", "1. One", "two", "", "(c). Three"];
        let extractor = FieldExtractor::new();
        let first = serde_json::to_vec(&extractor.extract(&lines, "T")).unwrap();
        let second = serde_json::to_vec(&extractor.extract(&lines, "T")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_tail_takes_label_from_next_line() {
        let doc = FieldExtractor::new().extract(["7.", "Signature of applicant"], "T");
        assert_eq!(doc.fields, vec![field("7", "Signature of applicant")]);

        // A trailing empty marker still produces a field
        let doc = FieldExtractor::new().extract(["1. Name", "2."], "T");
        assert_eq!(doc.fields, vec![field("1", "Name"), field("2", "")]);
    }

    #[test]
    fn test_preamble_and_blank_lines_do_not_touch_state() {
        let lines = ["Read carefully before filling", "", "1. Name", "   ", "", "Surname first"];
        let doc = FieldExtractor::new().extract(lines, "T");
        assert_eq!(doc.fields, vec![field("1", "Name Surname first")]);
    }

    #[test]
    fn test_numbering_is_passed_through_unvalidated() {
        let lines = ["3. Third", "1. First", "3. Third again", "007. Padded"];
        let doc = FieldExtractor::new().extract(lines, "T");
        let ids: Vec<&str> = doc.fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1", "3", "007"]);
    }

    #[test]
    fn test_classify_line_variants() {
        assert_eq!(classify_line("   "), LineKind::Blank);
        assert_eq!(classify_line("12. Date of birth"), LineKind::Marker { id: "12", tail: "Date of birth" });
        assert_eq!(classify_line("  (x).   Other"), LineKind::Marker { id: "x", tail: "Other" });
        assert_eq!(classify_line("5."), LineKind::Marker { id: "5", tail: "" });
        assert_eq!(classify_line("5.5 kg"), LineKind::Marker { id: "5", tail: "5 kg" });

        // Not markers
        assert_eq!(classify_line("(aa). Two letters"), LineKind::Continuation("(aa). Two letters"));
        assert_eq!(classify_line("1) No period"), LineKind::Continuation("1) No period"));
        assert_eq!(classify_line("(a) No period"), LineKind::Continuation("(a) No period"));
        assert_eq!(classify_line("Item 4. Address"), LineKind::Continuation("Item 4. Address"));
    }

    #[test]
    fn test_non_ascii_text_is_kept() {
        let doc = FieldExtractor::new().extract(["1. Nom de l’entreprise", "(é). Adresse"], "Formulaire");
        assert_eq!(doc.fields, vec![field("1", "Nom de l’entreprise"), field("é", "Adresse")]);
    }

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("  a \t b\u{a0}\u{a0}c  "), "a b c");
        assert_eq!(normalize_label("   "), "");
    }
}
