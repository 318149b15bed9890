use crate::commands::{CmdMessage, CmdResult};
use crate::config::{DialbookConfig, CONFIG_KEYS};
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Read or change `config.json` in `config_dir`. Bad keys and values are
/// reported as error messages; only I/O and parse failures are `Err`.
pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    let mut config = DialbookConfig::load(config_dir)?;

    let result = match action {
        ConfigAction::ShowAll => CmdResult::default().with_config(config),
        ConfigAction::ShowKey(key) => match config.get(&key) {
            Some(value) => CmdResult::default().with_message(CmdMessage::info(value)),
            None => CmdResult::default().with_message(unknown_key(&key)),
        },
        ConfigAction::Set(key, value) => match config.set(&key, &value) {
            Err(reason) => CmdResult::default().with_message(CmdMessage::error(reason)),
            Ok(()) => {
                config.save(config_dir)?;
                // Paths are stored normalized, so echo what was kept.
                let stored = config.get(&key).unwrap_or(value);
                CmdResult::default()
                    .with_message(CmdMessage::success(format!("{} = {}", key, stored)))
                    .with_config(config)
            }
        },
    };
    Ok(result)
}

fn unknown_key(key: &str) -> CmdMessage {
    CmdMessage::error(format!(
        "No config key '{}' (known: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use tempfile::TempDir;

    #[test]
    fn set_then_show_key() {
        let dir = TempDir::new().unwrap();
        run(
            dir.path(),
            ConfigAction::Set("base-url".into(), "http://api.local:9000".into()),
        )
        .unwrap();

        let result = run(dir.path(), ConfigAction::ShowKey("base-url".into())).unwrap();
        assert_eq!(result.messages[0].content, "http://api.local:9000");
    }

    #[test]
    fn set_echoes_the_normalized_path() {
        let dir = TempDir::new().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("prefixes-path".into(), "/v2/prefixes/".into()),
        )
        .unwrap();

        assert_eq!(result.messages[0].level, MessageLevel::Success);
        assert_eq!(result.messages[0].content, "prefixes-path = v2/prefixes");
        assert_eq!(result.config.unwrap().prefixes_path, "v2/prefixes");
    }

    #[test]
    fn bad_value_is_reported_and_not_saved() {
        let dir = TempDir::new().unwrap();
        let result = run(
            dir.path(),
            ConfigAction::Set("submit-timeout".into(), "0".into()),
        )
        .unwrap();

        assert!(result.has_errors());
        assert!(result.config.is_none());
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn unknown_key_lists_the_known_ones() {
        let dir = TempDir::new().unwrap();
        let result = run(dir.path(), ConfigAction::ShowKey("colour".into())).unwrap();

        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(result.messages[0].content.contains("'colour'"));
        assert!(result.messages[0].content.contains("submit-timeout"));
    }

    #[test]
    fn show_all_returns_defaults_without_a_file() {
        let dir = TempDir::new().unwrap();
        let result = run(dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.config, Some(DialbookConfig::default()));
    }
}
