//! # pdfchat-cli
//!
//! Entry points for pdfchat:
//!
//! - `pdfchat-ingest` loads the PDF named by `PDF_PATH` into the vector
//!   collection.
//! - `pdfchat-chat` runs the interactive question loop against it.
//!
//! Both read their configuration from the environment, loading a `.env` file
//! from the working directory first when one exists.

pub mod console;
pub mod telemetry;

pub use console::{Answerer, LineReader, run_chat};
pub use telemetry::init_tracing;
