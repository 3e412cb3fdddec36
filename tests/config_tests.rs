// Tests for file-backed configuration loading

use std::fs;

use anyhow::Result;
use tempfile::TempDir;
use voice_capture::{Config, DEFAULT_SILENCE_TIMEOUT_MS};

#[test]
fn test_load_full_config_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("voice-capture.toml");
    fs::write(
        &path,
        r#"
[capture]
locale = "fr-FR"
silence_timeout_ms = 1000
done_words = ["stop", "envoyer"]
"#,
    )?;

    let config = Config::load(path.to_str().unwrap())?;

    assert_eq!(config.capture.locale, "fr-FR");
    assert_eq!(config.capture.silence_timeout_ms, 1000);
    assert_eq!(
        config.capture.done_words,
        vec!["stop".to_string(), "envoyer".to_string()]
    );
    Ok(())
}

#[test]
fn test_partial_config_file_uses_field_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("voice-capture.toml");
    fs::write(
        &path,
        r#"
[capture]
locale = "de-DE"
"#,
    )?;

    let config = Config::load(path.to_str().unwrap())?;

    assert_eq!(config.capture.locale, "de-DE");
    assert_eq!(config.capture.silence_timeout_ms, DEFAULT_SILENCE_TIMEOUT_MS);
    assert_eq!(
        config.capture.done_words,
        vec!["send".to_string(), "over".to_string(), "done".to_string()]
    );
    Ok(())
}

#[test]
fn test_empty_config_file_uses_defaults() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("voice-capture.toml");
    fs::write(&path, "")?;

    let config = Config::load(path.to_str().unwrap())?;

    assert_eq!(config.capture.locale, "en-US");
    assert_eq!(config.capture.silence_timeout_ms, DEFAULT_SILENCE_TIMEOUT_MS);
    Ok(())
}

#[test]
fn test_missing_config_file_errors() {
    let result = Config::load("/nonexistent/voice-capture");
    assert!(result.is_err());
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.capture.locale, "en-US");
    assert_eq!(config.capture.silence_timeout_ms, DEFAULT_SILENCE_TIMEOUT_MS);
    assert_eq!(config.capture.done_words.len(), 3);
}
