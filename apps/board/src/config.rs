use std::{collections::HashMap, env, fs, path::Path};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub poll_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            poll_interval_secs: 30,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();
    apply_config_file(&mut settings, Path::new("board.toml"));
    apply_env_overrides(&mut settings);
    settings
}

fn apply_config_file(settings: &mut Settings, path: &Path) {
    let Ok(raw) = fs::read_to_string(path) else {
        return;
    };
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) else {
        return;
    };

    if let Some(v) = file_cfg.get("server_url").and_then(toml::Value::as_str) {
        settings.server_url = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("poll_interval_secs")
        .and_then(toml::Value::as_integer)
    {
        if v > 0 {
            settings.poll_interval_secs = v as u64;
        }
    }
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(v) = env::var("BOARD_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = env::var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Ok(v) = env::var("BOARD_POLL_INTERVAL_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            if parsed > 0 {
                settings.poll_interval_secs = parsed;
            }
        }
    }
    if let Ok(v) = env::var("APP__POLL_INTERVAL_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            if parsed > 0 {
                settings.poll_interval_secs = parsed;
            }
        }
    }
}
