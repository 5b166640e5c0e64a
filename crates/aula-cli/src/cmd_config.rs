use clap::Subcommand;
use std::path::{Path, PathBuf};

use aula_client::LayoutFetch;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a config value
    Set {
        /// Config key (e.g. base_url, layout_fetch)
        key: String,
        /// Config value (true/false/number/string)
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, store_root: &Path) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(store_root, &key, &value),
        ConfigCmd::Get { key } => get(store_root, &key),
        ConfigCmd::List => list(store_root),
    }
}

// ── Typed view ──

/// Settings the other commands read from `config.json`.
#[derive(Debug, Default, PartialEq)]
pub struct AulaConfig {
    pub base_url: Option<String>,
    pub layout_fetch: LayoutFetch,
}

impl AulaConfig {
    pub fn load(store_root: &Path) -> anyhow::Result<Self> {
        let map = read_config(&config_path(store_root))?;
        let base_url = match map.get("base_url") {
            None => None,
            Some(serde_json::Value::String(url)) => Some(url.clone()),
            Some(other) => anyhow::bail!("config base_url must be a URL string, found {other}"),
        };
        let layout_fetch = match map.get("layout_fetch").and_then(|v| v.as_str()) {
            Some(s) => s.parse()?,
            None => LayoutFetch::default(),
        };
        Ok(Self {
            base_url,
            layout_fetch,
        })
    }
}

// ── Command Implementations ──

fn config_path(store_root: &Path) -> PathBuf {
    store_root.join("config.json")
}

/// `config.json` as a flat object; a missing file is empty.
fn read_config(path: &Path) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(serde_json::Map::new()),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str(&content)? {
        serde_json::Value::Object(map) => Ok(map),
        other => anyhow::bail!("{} must hold a JSON object, found {other}", path.display()),
    }
}

fn write_config(
    path: &Path,
    config: &serde_json::Map<String, serde_json::Value>,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&config)?;
    aula_store::write_atomic(path, json.as_bytes())
}

/// Parse a string value into an appropriate JSON value (bool/number/string).
fn parse_value(s: &str) -> serde_json::Value {
    match s {
        "true" => serde_json::Value::Bool(true),
        "false" => serde_json::Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                serde_json::Value::Number(n.into())
            } else if let Ok(f) = s.parse::<f64>() {
                serde_json::json!(f)
            } else {
                serde_json::Value::String(s.to_string())
            }
        }
    }
}

/// `aula config set <key> <value>`
pub fn set(store_root: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let parsed = match key {
        "base_url" => {
            aula_session::origin_of(value)?;
            serde_json::Value::String(value.to_string())
        }
        "layout_fetch" => {
            value.parse::<LayoutFetch>()?;
            serde_json::Value::String(value.to_string())
        }
        _ => parse_value(value),
    };
    let path = config_path(store_root);
    let mut config = read_config(&path)?;
    config.insert(key.to_string(), parsed);
    write_config(&path, &config)?;
    println!("{key} = {value}");
    Ok(())
}

/// `aula config get <key>`
pub fn get(store_root: &Path, key: &str) -> anyhow::Result<()> {
    let config = read_config(&config_path(store_root))?;
    match config.get(key) {
        Some(val) => println!("{val}"),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `aula config list`
pub fn list(store_root: &Path) -> anyhow::Result<()> {
    let config = read_config(&config_path(store_root))?;
    if config.is_empty() {
        println!("(no config set)");
    } else {
        for (k, v) in &config {
            println!("{k} = {v}");
        }
    }
    Ok(())
}
