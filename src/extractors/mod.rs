// src/extractors/mod.rs
pub mod fields;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use fields::{
    classify_line,
    Document,
    Field,
    FieldExtractor,
    LineKind,
};
