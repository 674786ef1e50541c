//! rig-project: rig file format, validation and the built-in template.

pub mod assemble;
pub mod schema;
pub mod template;
pub mod validate;

pub use assemble::{build_device, build_devices, build_rig, options, run_step};
pub use schema::*;
pub use template::standard_rig;
pub use validate::{LATEST_VERSION, ValidationError, validate_rig};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Device error: {0}")]
    Device(#[from] rig_devices::DeviceError),

    #[error("Simulation error: {0}")]
    Sim(#[from] rig_sim::SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<RigFile> {
    let content = std::fs::read_to_string(path)?;
    let rig: RigFile = serde_yaml::from_str(&content)?;
    validate_rig(&rig)?;
    Ok(rig)
}

pub fn save_yaml(path: &std::path::Path, rig: &RigFile) -> ProjectResult<()> {
    validate_rig(rig)?;
    let content = serde_yaml::to_string(rig)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<RigFile> {
    let content = std::fs::read_to_string(path)?;
    let rig: RigFile = serde_json::from_str(&content)?;
    validate_rig(&rig)?;
    Ok(rig)
}

pub fn save_json(path: &std::path::Path, rig: &RigFile) -> ProjectResult<()> {
    validate_rig(rig)?;
    let content = serde_json::to_string_pretty(rig)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` is JSON, anything else YAML.
pub fn load(path: &std::path::Path) -> ProjectResult<RigFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
