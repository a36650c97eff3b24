mod lopdf_reader;

pub use lopdf_reader::{extract_pages, PdfTextReader};
