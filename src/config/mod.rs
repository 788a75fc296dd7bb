use crate::error::ConfigError;
use crate::permissions::TrackingStatus;
use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Countbook runtime configuration, persisted as `~/.countbook/config.toml`.
///
/// Endpoint addresses, the shared metrics salt, and the app identity are
/// supplied here, never computed. The `[permissions]` section holds the
/// answers the headless binary feeds to the permission prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// App bundle identifier sent with every metrics request.
    #[serde(default = "default_bundle_id")]
    pub bundle_id: String,

    /// Push-subscription id appended to destination URLs when present.
    #[serde(default)]
    pub onesignal_id: Option<String>,

    #[serde(default)]
    pub attribution: AttributionConfig,

    #[serde(default)]
    pub remote_config: RemoteConfigSettings,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub permissions: PermissionAnswers,
}

fn default_bundle_id() -> String {
    "com.ckencount.countbook".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionConfig {
    #[serde(default = "default_metrics_url")]
    pub metrics_url: String,
    #[serde(default = "default_salt")]
    pub salt: String,
    #[serde(default = "default_metrics_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_metrics_url() -> String {
    "https://ckencount.com/app/metrics".into()
}

fn default_salt() -> String {
    "61M06DohLclYeAFtvLFObvgKViYH4pQg".into()
}

fn default_metrics_timeout_secs() -> u64 {
    15
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            metrics_url: default_metrics_url(),
            salt: default_salt(),
            http_timeout_secs: default_metrics_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfigSettings {
    #[serde(default = "default_remote_config_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_flag_key")]
    pub flag_key: String,
    #[serde(default = "default_flag_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_remote_config_endpoint() -> String {
    "https://ckencount.com/app/config".into()
}

fn default_flag_key() -> String {
    "chick".into()
}

fn default_flag_timeout_secs() -> u64 {
    10
}

impl Default for RemoteConfigSettings {
    fn default() -> Self {
        Self {
            endpoint: default_remote_config_endpoint(),
            flag_key: default_flag_key(),
            http_timeout_secs: default_flag_timeout_secs(),
        }
    }
}

/// Delays inside the resolution chain. Tests dial these down to single
/// milliseconds; production keeps the app's original feel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Cosmetic splash hold before the plain-app signal fires.
    #[serde(default = "default_splash_delay_ms")]
    pub splash_delay_ms: u64,
    /// Interval for re-checking permissions while a saved destination waits.
    #[serde(default = "default_permission_poll_ms")]
    pub permission_poll_ms: u64,
    /// Wait before the single tracking-permission retry.
    #[serde(default = "default_tracking_retry_ms")]
    pub tracking_retry_ms: u64,
}

fn default_splash_delay_ms() -> u64 {
    2_000
}

fn default_permission_poll_ms() -> u64 {
    500
}

fn default_tracking_retry_ms() -> u64 {
    1_000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            splash_delay_ms: default_splash_delay_ms(),
            permission_poll_ms: default_permission_poll_ms(),
            tracking_retry_ms: default_tracking_retry_ms(),
        }
    }
}

/// Canned prompt answers for headless runs (there is no OS dialog to show).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionAnswers {
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default = "default_tracking_answer")]
    pub tracking: TrackingStatus,
    #[serde(default)]
    pub advertising_id: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_tracking_answer() -> TrackingStatus {
    TrackingStatus::Denied
}

impl Default for PermissionAnswers {
    fn default() -> Self {
        Self {
            notifications: true,
            tracking: default_tracking_answer(),
            advertising_id: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let countbook_dir = home.join(".countbook");

        Self {
            workspace_dir: countbook_dir.join("workspace"),
            config_path: countbook_dir.join("config.toml"),
            bundle_id: default_bundle_id(),
            onesignal_id: None,
            attribution: AttributionConfig::default(),
            remote_config: RemoteConfigSettings::default(),
            timing: TimingConfig::default(),
            permissions: PermissionAnswers::default(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let countbook_dir = home.join(".countbook");
        let config_path = countbook_dir.join("config.toml");

        if !countbook_dir.exists() {
            fs::create_dir_all(&countbook_dir).context("Failed to create .countbook directory")?;
            fs::create_dir_all(countbook_dir.join("workspace"))
                .context("Failed to create workspace directory")?;
        }

        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path.clone_from(&config_path);
            config.workspace_dir = countbook_dir.join("workspace");
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        } else {
            let mut config = Self {
                config_path: config_path.clone(),
                workspace_dir: countbook_dir.join("workspace"),
                ..Self::default()
            };
            config.save()?;
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(bundle) = std::env::var("COUNTBOOK_BUNDLE_ID") {
            if !bundle.is_empty() {
                self.bundle_id = bundle;
            }
        }

        if let Ok(url) = std::env::var("COUNTBOOK_METRICS_URL") {
            if !url.is_empty() {
                self.attribution.metrics_url = url;
            }
        }

        if let Ok(salt) = std::env::var("COUNTBOOK_SALT") {
            if !salt.is_empty() {
                self.attribution.salt = salt;
            }
        }

        if let Ok(endpoint) = std::env::var("COUNTBOOK_REMOTE_CONFIG_URL") {
            if !endpoint.is_empty() {
                self.remote_config.endpoint = endpoint;
            }
        }

        if let Ok(workspace) = std::env::var("COUNTBOOK_WORKSPACE") {
            if !workspace.is_empty() {
                self.workspace_dir = PathBuf::from(workspace);
            }
        }

        if let Ok(id) = std::env::var("COUNTBOOK_ONESIGNAL_ID") {
            if !id.is_empty() {
                self.onesignal_id = Some(id);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bundle_id.trim().is_empty() {
            return Err(ConfigError::Validation("bundle_id must not be empty".into()));
        }
        if self.attribution.salt.trim().is_empty() {
            return Err(ConfigError::Validation(
                "attribution.salt must not be empty".into(),
            ));
        }
        if url::Url::parse(&self.attribution.metrics_url).is_err() {
            return Err(ConfigError::Validation(format!(
                "attribution.metrics_url is not a valid URL: {}",
                self.attribution.metrics_url
            )));
        }
        if url::Url::parse(&self.remote_config.endpoint).is_err() {
            return Err(ConfigError::Validation(format!(
                "remote_config.endpoint is not a valid URL: {}",
                self.remote_config.endpoint
            )));
        }
        if self.remote_config.flag_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "remote_config.flag_key must not be empty".into(),
            ));
        }
        if self.timing.permission_poll_ms == 0 {
            return Err(ConfigError::Validation(
                "timing.permission_poll_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Path of the persisted key-value state file.
    pub fn state_path(&self) -> PathBuf {
        self.workspace_dir.join("state.json")
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
