use std::{fs, path::Path, time::Duration};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use shared::domain::ContractAddress;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "set_viewer.toml";
const DEFAULT_ACCESS_NODE_URL: &str = "https://rest-mainnet.onflow.org";
const DEFAULT_TOPSHOT_ADDRESS: &str = "0b2a3299cc857e29";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub access_node_url: Url,
    pub topshot_address: ContractAddress,
    pub request_timeout: Duration,
}

impl Settings {
    /// Mainnet access node and the Top Shot contract account.
    pub fn mainnet() -> Result<Self> {
        Ok(Self {
            access_node_url: parse_access_node_url(DEFAULT_ACCESS_NODE_URL)?,
            topshot_address: parse_address(DEFAULT_TOPSHOT_ADDRESS)?,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    access_node_url: Option<String>,
    topshot_address: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `path` (or `set_viewer.toml` if present), then process
/// environment.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

pub fn load_settings_with<F>(path: Option<&Path>, env: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::mainnet()?;

    let file_cfg = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
            parse_file_settings(&raw, path)?
        }
        None => match fs::read_to_string(DEFAULT_SETTINGS_FILE) {
            Ok(raw) => parse_file_settings(&raw, Path::new(DEFAULT_SETTINGS_FILE))?,
            Err(_) => FileSettings::default(),
        },
    };

    if let Some(v) = file_cfg.access_node_url {
        settings.access_node_url = parse_access_node_url(&v)?;
    }
    if let Some(v) = file_cfg.topshot_address {
        settings.topshot_address = parse_address(&v)?;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout = parse_timeout(v)?;
    }

    if let Some(v) = env("FLOW_ACCESS_NODE") {
        settings.access_node_url = parse_access_node_url(&v)?;
    }
    if let Some(v) = env("APP__ACCESS_NODE_URL") {
        settings.access_node_url = parse_access_node_url(&v)?;
    }

    if let Some(v) = env("TOPSHOT_ADDRESS") {
        settings.topshot_address = parse_address(&v)?;
    }
    if let Some(v) = env("APP__TOPSHOT_ADDRESS") {
        settings.topshot_address = parse_address(&v)?;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        let secs = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("invalid APP__REQUEST_TIMEOUT_SECS '{v}'"))?;
        settings.request_timeout = parse_timeout(secs)?;
    }

    Ok(settings)
}

fn parse_file_settings(raw: &str, path: &Path) -> Result<FileSettings> {
    toml::from_str(raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

fn parse_access_node_url(raw: &str) -> Result<Url> {
    let url =
        Url::parse(raw.trim()).with_context(|| format!("invalid access node url '{raw}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(anyhow!(
            "access node url '{raw}' must use http or https, got '{other}'"
        )),
    }
}

fn parse_address(raw: &str) -> Result<ContractAddress> {
    ContractAddress::parse(raw).with_context(|| format!("invalid topshot address '{raw}'"))
}

fn parse_timeout(secs: u64) -> Result<Duration> {
    if secs == 0 {
        return Err(anyhow!("request timeout must be at least one second"));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn temp_settings_file(contents: &str) -> std::path::PathBuf {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("set_viewer_settings_test_{suffix}.toml"));
        fs::write(&path, contents).expect("write settings");
        path
    }

    #[test]
    fn defaults_point_at_mainnet_topshot() {
        let settings = Settings::mainnet().expect("mainnet settings");
        assert_eq!(
            settings.access_node_url.as_str(),
            "https://rest-mainnet.onflow.org/"
        );
        assert_eq!(settings.topshot_address.as_hex(), "0b2a3299cc857e29");
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn file_values_override_defaults() {
        let path = temp_settings_file(
            "access_node_url = \"http://127.0.0.1:8888\"\n\
             topshot_address = \"0xf8d6e0586b0a20c7\"\n\
             request_timeout_secs = 5\n",
        );

        let settings = load_settings_with(Some(&path), no_env).expect("settings");
        assert_eq!(settings.access_node_url.as_str(), "http://127.0.0.1:8888/");
        assert_eq!(settings.topshot_address.as_hex(), "f8d6e0586b0a20c7");
        assert_eq!(settings.request_timeout, Duration::from_secs(5));

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn prefixed_env_wins_over_file_and_plain_env() {
        let path = temp_settings_file("topshot_address = \"0x01\"\n");
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TOPSHOT_ADDRESS", "0x02"),
            ("APP__TOPSHOT_ADDRESS", "0x03"),
            ("FLOW_ACCESS_NODE", "https://rest-testnet.onflow.org"),
        ]);

        let settings =
            load_settings_with(Some(&path), |key| vars.get(key).map(|v| v.to_string()))
                .expect("settings");
        assert_eq!(settings.topshot_address.as_hex(), "0000000000000003");
        assert_eq!(
            settings.access_node_url.as_str(),
            "https://rest-testnet.onflow.org/"
        );

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn rejects_invalid_values() {
        let err = load_settings_with(None, |key| {
            (key == "APP__ACCESS_NODE_URL").then(|| "ftp://node".to_string())
        })
        .expect_err("scheme must be rejected");
        assert!(err.to_string().contains("http or https"), "{err}");

        let err = load_settings_with(None, |key| {
            (key == "TOPSHOT_ADDRESS").then(|| "not-an-address".to_string())
        })
        .expect_err("address must be rejected");
        assert!(err.to_string().contains("invalid topshot address"), "{err}");

        let err = load_settings_with(None, |key| {
            (key == "APP__REQUEST_TIMEOUT_SECS").then(|| "0".to_string())
        })
        .expect_err("zero timeout must be rejected");
        assert!(err.to_string().contains("at least one second"), "{err}");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let missing = env::temp_dir().join("set_viewer_settings_does_not_exist.toml");
        let err = load_settings_with(Some(&missing), no_env).expect_err("must fail");
        assert!(err.to_string().contains("failed to read settings file"));
    }
}
