mod store;

pub use store::ConfigStore;

use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Errors raised while loading or reading configuration.
#[hzn_derive::hzn_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },

    #[error("Missing configuration{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid configuration{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Loads a typed configuration from a file layered with environment overrides.
///
/// 1. **Base File**: settings from `path`, defaulting to `app` in the working
///    directory. The extension is optional; any format the `config` crate
///    knows is accepted.
/// 2. **Environment Overrides**: variables prefixed with `HZN__`. Nested keys
///    use double underscores (`HZN__HORIZON__PREFIX` maps to `horizon.prefix`).
///
/// # Errors
/// Fails when the file cannot be found or its content does not match `T`.
///
/// # Example
/// ```rust
/// use hzn_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("app"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix("HZN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// Reads a single configuration document without environment overrides.
///
/// Used for module defaults shipped next to the code, which the environment
/// must not be able to rewrite before the host's own values are layered on.
///
/// # Errors
/// Fails when the file is missing or is not a key/value document.
pub fn read_document(path: &Path) -> Result<serde_json::Map<String, serde_json::Value>, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::Missing {
            message: format!("{} does not exist", path.display()).into(),
            context: None,
        });
    }

    Config::builder()
        .add_source(File::from(path).required(true))
        .build()
        .context("Failed to read config document")?
        .try_deserialize::<serde_json::Map<String, serde_json::Value>>()
        .context("Failed to deserialize config document")
}
