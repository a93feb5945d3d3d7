pub mod gemini;
pub mod interface;
pub mod llm_config;
pub mod prompts;


pub use gemini::GeminiClient;
pub use interface::{GenerationError, RefusalGenerator, GENERIC_FAILURE_MESSAGE};
pub use llm_config::{load_config, GenerationConfig};
