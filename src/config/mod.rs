mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    parse_config(&content).with_context(|| format!("Failed to load config file: {:?}", path))
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config")?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./babelfish.toml",
        "~/.config/babelfish/config.toml",
        "/etc/babelfish/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.transfer.connect_timeout_secs == 0 {
        anyhow::bail!("transfer.connect_timeout_secs cannot be 0");
    }

    for (name, url) in [
        ("openai.base_url", &config.openai.base_url),
        ("elevenlabs.base_url", &config.elevenlabs.base_url),
        ("upload.url", &config.upload.url),
        ("sync.base_url", &config.sync.base_url),
    ] {
        reqwest::Url::parse(url).with_context(|| format!("{} is not a valid URL: {}", name, url))?;
    }

    let poll = config.sync.poll_interval_secs;
    if !(crate::job::MIN_POLL_SECS..=crate::job::MAX_POLL_SECS).contains(&poll) {
        anyhow::bail!(
            "sync.poll_interval_secs must be between {} and {}, got {}",
            crate::job::MIN_POLL_SECS,
            crate::job::MAX_POLL_SECS,
            poll
        );
    }

    if config.sync.max_wait_secs == Some(0) {
        anyhow::bail!("sync.max_wait_secs cannot be 0; omit it to wait indefinitely");
    }

    if config.elevenlabs.default_voice_id.trim().is_empty() {
        anyhow::bail!("elevenlabs.default_voice_id cannot be empty");
    }

    for (name, path) in [
        ("ffmpeg", &config.tools.ffmpeg_path),
        ("ffprobe", &config.tools.ffprobe_path),
    ] {
        if let Some(path) = path {
            if !path.exists() {
                tracing::warn!("Configured {} path does not exist: {:?}", name, path);
            }
        }
    }

    Ok(())
}
