//! product-classifier adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `llm`: Text-completion clients (Ollama, OpenAI-compatible, stub) and retry
//! - `table`: CSV and in-memory table stores

mod table_csv;
mod table_memory;

pub mod llm;

/// Re-exports for table adapters
pub mod table {
    pub use crate::table_csv::CsvTableStore;
    pub use crate::table_memory::InMemoryTableStore;
}
