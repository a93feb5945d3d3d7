//! Tauri commands for generation model settings.

use crate::config::app_data_dir;
use crate::controller::AppController;
use crate::llm::llm_config::{save_config, GenerationConfig};
use crate::llm::GeminiClient;
use std::sync::Arc;
use tauri::State;

#[tauri::command]
pub async fn get_llm_config() -> Result<GenerationConfig, String> {
    let config_path = app_data_dir().join("llm_config.json");
    Ok(crate::llm::load_config(&config_path))
}

/// Persist the settings and rebuild the client used by the next generation.
#[tauri::command]
pub async fn save_llm_config(
    config: GenerationConfig,
    state: State<'_, AppController>,
) -> Result<(), String> {
    let config_path = app_data_dir().join("llm_config.json");
    save_config(&config_path, &config)?;
    state
        .replace_generator(Arc::new(GeminiClient::from_config(&config)))
        .await;
    Ok(())
}
