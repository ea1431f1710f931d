use std::{env::VarError, path::PathBuf};

use thiserror::Error;

/// Errors raised while reading process environment variables.
#[derive(Debug, Error)]
pub enum EnvVarError {
    /// An environment variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    Missing(String),

    /// The variable is set but its value is not valid unicode.
    #[error("Environment variable {0} is not valid unicode")]
    NotUnicode(String),
}

/// Reads an environment variable, returning a structured error if it's missing.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, EnvVarError> {
    get_env_var_opt(name)?.ok_or_else(|| EnvVarError::Missing(name.to_string()))
}

/// Reads an optional environment variable.
///
/// Unset and blank values both come back as `Ok(None)`; only a non-unicode
/// value is an error.
pub fn get_env_var_opt(name: &str) -> Result<Option<String>, EnvVarError> {
    match std::env::var(name) {
        Ok(v) if v.trim().is_empty() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(EnvVarError::NotUnicode(name.to_string())),
    }
}

/// Reads an optional environment variable holding a filesystem path.
pub fn get_env_path(name: &str) -> Result<Option<PathBuf>, EnvVarError> {
    Ok(get_env_var_opt(name)?.map(PathBuf::from))
}
