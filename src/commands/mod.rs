pub mod app;
pub mod llm;
pub mod speech;
