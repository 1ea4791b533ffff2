pub mod metadata_reader;
pub(crate) mod natural_sort;
pub(crate) mod progress_bar_builder;

pub use metadata_reader::{MetadataReader, Row};
