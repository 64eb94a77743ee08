//! gt-project: site configuration files for the ground temperature model.

pub mod build;
pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_config};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Model error: {0}")]
    Model(#[from] gt_model::ModelError),

    #[error("Weather error: {0}")]
    Weather(#[from] gt_weather::WeatherError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<SiteConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: SiteConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &std::path::Path, config: &SiteConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<SiteConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: SiteConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_json(path: &std::path::Path, config: &SiteConfig) -> ProjectResult<()> {
    validate_config(config)?;
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load YAML or JSON by file extension (`.json` is JSON, anything else YAML).
pub fn load(path: &std::path::Path) -> ProjectResult<SiteConfig> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
