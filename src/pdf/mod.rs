// src/pdf/mod.rs
pub mod models;
pub mod source;
#[cfg(test)]
pub mod fixtures;

#[allow(unused_imports)]
pub use models::FormText;
#[allow(unused_imports)]
pub use source::{load_form, PageTextSource, PdfExtractSource};
