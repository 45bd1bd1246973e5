pub mod ollama;
pub mod records;
