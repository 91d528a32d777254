use std::env;
use std::fmt;
use std::io;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use proto::constant::DEFAULT_BROADCAST;
use proto::MacAddress;
use serde_json::{Map, Value};

lazy_static! {
    /// `config.json` sitting next to the executable, or in the working directory as a fallback.
    pub static ref DEFAULT_CONFIG_PATH: PathBuf = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("config.json")))
        .unwrap_or_else(|| PathBuf::from("config.json"));
}

const DEFAULT_PING_TIMEOUT_MS: u64 = 1000;
const DEFAULT_CHECK_INTERVAL_SEC: u64 = 30;
const DEFAULT_WOL_COOLDOWN_SEC: u64 = 300;

/// A configuration value, named once for the JSON file and once for the environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub env: &'static str,
}

impl Field {
    const fn new(key: &'static str, env: &'static str) -> Self {
        Field { key, env }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key)
    }
}

pub const WOL_SERVER_IP: Field = Field::new("wol_server_ip", "WOL_SERVER_IP");
pub const WOL_SERVER_MAC: Field = Field::new("wol_server_mac", "WOL_SERVER_MAC");
pub const NETWORK_CHECK_HOST: Field = Field::new("network_check_host", "NETWORK_CHECK_HOST");
pub const BROADCAST_IP: Field = Field::new("broadcast_ip", "BROADCAST_IP");
pub const WOL_PORT: Field = Field::new("wol_port", "WOL_PORT");
pub const PING_TIMEOUT_MS: Field = Field::new("ping_timeout_ms", "PING_TIMEOUT_MS");
pub const CHECK_INTERVAL_SEC: Field = Field::new("check_interval_sec", "CHECK_INTERVAL_SEC");
pub const WOL_COOLDOWN_SEC: Field = Field::new("wol_cooldown_sec", "WOL_COOLDOWN_SEC");

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON in configuration file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration file must contain a JSON object")]
    NotAnObject,
    #[error("missing required configuration fields: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: Field, reason: String },
    #[error("invalid hardware address: {0}")]
    InvalidMacAddress(#[from] proto::Error),
}

/// Operational parameters of the monitor, validated once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    pub target_host: String,
    pub target_mac: String,
    pub reference_host: String,
    pub broadcast: Ipv4Addr,
    pub wol_port: u16,
    pub ping_timeout_ms: u64,
    pub check_interval: Duration,
    pub wol_cooldown: Duration,
}

impl MonitorConfig {
    /// Reads a JSON object keyed by [`Field::key`].
    pub async fn from_file(path: &Path) -> Result<MonitorConfig, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = async_std::fs::read_to_string(async_std::path::Path::new(path)).await?;
        log::debug!("read configuration file {}", path.display());
        Self::from_json(&text)
    }
    pub fn from_json(text: &str) -> Result<MonitorConfig, ConfigError> {
        let object = match serde_json::from_str::<Value>(text)? {
            Value::Object(object) => object,
            _ => return Err(ConfigError::NotAnObject),
        };
        Self::from_lookup(|field| json_setting(&object, field))
    }
    /// Reads the process environment, keyed by [`Field::env`].
    pub fn from_env() -> Result<MonitorConfig, ConfigError> {
        Self::from_lookup(|field| env::var(field.env).ok())
    }
    /// Builds the config from any source; empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<MonitorConfig, ConfigError>
    where
        F: Fn(&Field) -> Option<String>,
    {
        let get = |field: &Field| {
            lookup(field)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let target_host = get(&WOL_SERVER_IP);
        let target_mac = get(&WOL_SERVER_MAC);
        let reference_host = get(&NETWORK_CHECK_HOST);

        let missing: Vec<&'static str> = [
            (&WOL_SERVER_IP, &target_host),
            (&WOL_SERVER_MAC, &target_mac),
            (&NETWORK_CHECK_HOST, &reference_host),
        ]
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(field, _)| field.key)
        .collect();

        let (target_host, target_mac, reference_host) =
            match (target_host, target_mac, reference_host) {
                (Some(host), Some(mac), Some(reference)) => (host, mac, reference),
                _ => return Err(ConfigError::Missing(missing)),
            };

        MacAddress::parse(&target_mac)?;

        let broadcast = parse_or(&BROADCAST_IP, get(&BROADCAST_IP), DEFAULT_BROADCAST)?;
        let wol_port = parse_or(&WOL_PORT, get(&WOL_PORT), proto::constant::WOL_PORT)?;
        let ping_timeout_ms =
            parse_or(&PING_TIMEOUT_MS, get(&PING_TIMEOUT_MS), DEFAULT_PING_TIMEOUT_MS)?;
        let check_interval_sec =
            parse_or(&CHECK_INTERVAL_SEC, get(&CHECK_INTERVAL_SEC), DEFAULT_CHECK_INTERVAL_SEC)?;
        let wol_cooldown_sec =
            parse_or(&WOL_COOLDOWN_SEC, get(&WOL_COOLDOWN_SEC), DEFAULT_WOL_COOLDOWN_SEC)?;

        positive(&WOL_PORT, wol_port as u64)?;
        positive(&PING_TIMEOUT_MS, ping_timeout_ms)?;
        positive(&CHECK_INTERVAL_SEC, check_interval_sec)?;

        Ok(MonitorConfig {
            target_host,
            target_mac,
            reference_host,
            broadcast,
            wol_port,
            ping_timeout_ms,
            check_interval: Duration::from_secs(check_interval_sec),
            wol_cooldown: Duration::from_secs(wol_cooldown_sec),
        })
    }
    pub fn log_summary(&self) {
        log::info!("WOL Server: {} ({})", self.target_host, self.target_mac);
        log::info!("Network Check Host: {}", self.reference_host);
        log::info!("Broadcast IP: {}", self.broadcast);
        log::info!("WOL Port: {}", self.wol_port);
        log::info!("Ping Timeout: {}ms", self.ping_timeout_ms);
        log::info!("Check Interval: {}s", self.check_interval.as_secs());
        log::info!("WOL Cooldown: {}s", self.wol_cooldown.as_secs());
    }
}

fn json_setting(object: &Map<String, Value>, field: &Field) -> Option<String> {
    match object.get(field.key)? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_or<T>(field: &Field, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match value {
        Some(value) => value.parse().map_err(|err: T::Err| ConfigError::InvalidValue {
            field: *field,
            reason: format!("{:?}: {}", value, err),
        }),
        None => Ok(default),
    }
}

fn positive(field: &Field, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            field: *field,
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&Field) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |field: &Field| map.get(field.env).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("WOL_SERVER_IP", "192.168.1.20"),
        ("WOL_SERVER_MAC", "AA:BB:CC:DD:EE:FF"),
        ("NETWORK_CHECK_HOST", "192.168.1.1"),
    ];

    #[test]
    fn defaults_fill_optional_fields() {
        let config = MonitorConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.target_host, "192.168.1.20");
        assert_eq!(config.target_mac, "AA:BB:CC:DD:EE:FF");
        assert_eq!(config.reference_host, "192.168.1.1");
        assert_eq!(config.broadcast, Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(config.wol_port, 9);
        assert_eq!(config.ping_timeout_ms, 1000);
        assert_eq!(config.check_interval, Duration::from_secs(30));
        assert_eq!(config.wol_cooldown, Duration::from_secs(300));
    }

    #[test]
    fn missing_fields_are_listed_together() {
        let err = MonitorConfig::from_lookup(lookup_from(&[
            ("WOL_SERVER_IP", ""),
            ("NETWORK_CHECK_HOST", "192.168.1.1"),
        ]))
        .unwrap_err();
        match err {
            ConfigError::Missing(fields) => {
                assert_eq!(fields, vec!["wol_server_ip", "wol_server_mac"])
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bad_mac_is_rejected_at_startup() {
        let err = MonitorConfig::from_lookup(lookup_from(&[
            ("WOL_SERVER_IP", "192.168.1.20"),
            ("WOL_SERVER_MAC", "AA:BB:CC:DD:EE"),
            ("NETWORK_CHECK_HOST", "192.168.1.1"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidMacAddress(proto::Error::InvalidMacAddress(_))
        ));
    }

    #[test]
    fn invalid_values() {
        let cases = [
            ("BROADCAST_IP", "not-an-ip", BROADCAST_IP),
            ("WOL_PORT", "0", WOL_PORT),
            ("WOL_PORT", "70000", WOL_PORT),
            ("PING_TIMEOUT_MS", "0", PING_TIMEOUT_MS),
            ("CHECK_INTERVAL_SEC", "0", CHECK_INTERVAL_SEC),
            ("WOL_COOLDOWN_SEC", "-5", WOL_COOLDOWN_SEC),
        ];
        for (key, value, expected) in cases {
            let mut pairs = REQUIRED.to_vec();
            pairs.push((key, value));
            match MonitorConfig::from_lookup(lookup_from(&pairs)) {
                Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, expected),
                other => panic!("{}={} gave {:?}", key, value, other),
            }
        }
    }

    #[test]
    fn zero_cooldown_is_allowed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("WOL_COOLDOWN_SEC", "0"));
        let config = MonitorConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.wol_cooldown, Duration::ZERO);
    }

    #[test]
    fn json_numbers_and_strings() {
        let config = MonitorConfig::from_json(
            r#"{
                "wol_server_ip": "10.0.0.5",
                "wol_server_mac": "00-11-22-33-44-55",
                "network_check_host": "10.0.0.1",
                "broadcast_ip": "10.0.0.255",
                "wol_port": 7,
                "ping_timeout_ms": "2500",
                "check_interval_sec": 10,
                "wol_cooldown_sec": 60
            }"#,
        )
        .unwrap();
        assert_eq!(config.broadcast, Ipv4Addr::new(10, 0, 0, 255));
        assert_eq!(config.wol_port, 7);
        assert_eq!(config.ping_timeout_ms, 2500);
        assert_eq!(config.check_interval, Duration::from_secs(10));
        assert_eq!(config.wol_cooldown, Duration::from_secs(60));
    }

    #[test]
    fn json_must_be_object() {
        assert!(matches!(
            MonitorConfig::from_json("[1, 2, 3]"),
            Err(ConfigError::NotAnObject)
        ));
        assert!(matches!(
            MonitorConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[async_std::test]
    async fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "wol_server_ip": "nas.local",
                "wol_server_mac": "aabbccddeeff",
                "network_check_host": "router.local",
                "wol_port": null
            }}"#
        )
        .unwrap();
        let config = MonitorConfig::from_file(file.path()).await.unwrap();
        assert_eq!(config.target_host, "nas.local");
        assert_eq!(config.reference_host, "router.local");
        assert_eq!(config.wol_port, 9);
    }

    // the only test touching the process environment
    #[test]
    fn load_from_env() {
        let vars = [
            ("WOL_SERVER_IP", "10.1.1.5"),
            ("WOL_SERVER_MAC", "00:11:22:33:44:55"),
            ("NETWORK_CHECK_HOST", "10.1.1.1"),
            ("BROADCAST_IP", "10.1.1.255"),
            ("WOL_PORT", "7"),
            ("PING_TIMEOUT_MS", "1500"),
            ("CHECK_INTERVAL_SEC", "15"),
            ("WOL_COOLDOWN_SEC", "120"),
        ];
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let config = MonitorConfig::from_env();
        for (key, _) in vars {
            env::remove_var(key);
        }

        let config = config.unwrap();
        assert_eq!(config.target_host, "10.1.1.5");
        assert_eq!(config.target_mac, "00:11:22:33:44:55");
        assert_eq!(config.reference_host, "10.1.1.1");
        assert_eq!(config.broadcast, Ipv4Addr::new(10, 1, 1, 255));
        assert_eq!(config.wol_port, 7);
        assert_eq!(config.ping_timeout_ms, 1500);
        assert_eq!(config.check_interval, Duration::from_secs(15));
        assert_eq!(config.wol_cooldown, Duration::from_secs(120));

        match MonitorConfig::from_env() {
            Err(ConfigError::Missing(fields)) => assert_eq!(
                fields,
                vec!["wol_server_ip", "wol_server_mac", "network_check_host"]
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[async_std::test]
    async fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        match MonitorConfig::from_file(&path).await {
            Err(ConfigError::NotFound(missing)) => assert_eq!(missing, path),
            other => panic!("unexpected {:?}", other),
        }
    }
}
