//! Chat with PDF documents: extract, chunk, embed and index uploaded PDFs,
//! then answer questions from the most relevant chunks with a local model.

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
