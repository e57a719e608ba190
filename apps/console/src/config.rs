use std::fs;

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Settings {
    pub rows: u32,
    pub cols: u32,
    pub content_url: Option<String>,
    pub content_dir: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: 2,
            cols: 2,
            content_url: None,
            content_dir: Some("content".into()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    rows: Option<u32>,
    cols: Option<u32>,
    content_url: Option<String>,
    content_dir: Option<String>,
}

/// Defaults, overridden by `cellgrid.toml` in the working directory,
/// overridden by `GRID_*` environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("cellgrid.toml") {
        if let Ok(file_cfg) = toml::from_str::<FileSettings>(&raw) {
            if let Some(v) = file_cfg.rows {
                settings.rows = v;
            }
            if let Some(v) = file_cfg.cols {
                settings.cols = v;
            }
            if let Some(v) = file_cfg.content_url {
                settings.content_url = Some(v);
            }
            if let Some(v) = file_cfg.content_dir {
                settings.content_dir = Some(v);
            }
        }
    }

    if let Ok(v) = std::env::var("GRID_ROWS") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.rows = parsed;
        }
    }
    if let Ok(v) = std::env::var("GRID_COLS") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.cols = parsed;
        }
    }
    if let Ok(v) = std::env::var("GRID_CONTENT_URL") {
        settings.content_url = Some(v);
    }
    if let Ok(v) = std::env::var("GRID_CONTENT_DIR") {
        settings.content_dir = Some(v);
    }

    settings
}
