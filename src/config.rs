// file: src/config.rs
// version: 1.0.0
// guid: 8b41e0d6-2c97-4f3a-a5d8-61e9c04b7f23

use crate::error::{ShellError, Result};
use crate::mail::DEFAULT_MAIL_PROGRAM;
use crate::runner::DEFAULT_SHELL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Name of the per-project configuration file
pub const PROJECT_CONFIG_FILE: &str = ".extproc-shell.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Command interpreter that receives `-c <command line>`
    pub shell: String,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    pub program: String,
    pub quoting: QuotingPolicy,
    pub status_policy: StatusPolicy,
}

/// How mail inputs are placed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotingPolicy {
    /// Double-quote wrapping; reject inputs that would break it
    Strict,
    /// Double-quote wrapping with no checks at all
    Legacy,
    /// Skip the shell and pass arguments to the mail program directly
    Direct,
}

/// What happens to a non-zero status from the mail pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    Propagate,
    Suppress,
}

impl QuotingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotingPolicy::Strict => "strict",
            QuotingPolicy::Legacy => "legacy",
            QuotingPolicy::Direct => "direct",
        }
    }
}

impl FromStr for QuotingPolicy {
    type Err = ShellError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(QuotingPolicy::Strict),
            "legacy" => Ok(QuotingPolicy::Legacy),
            "direct" => Ok(QuotingPolicy::Direct),
            other => Err(ShellError::config(format!("Unknown quoting policy: {}", other))),
        }
    }
}

impl StatusPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusPolicy::Propagate => "propagate",
            StatusPolicy::Suppress => "suppress",
        }
    }
}

impl FromStr for StatusPolicy {
    type Err = ShellError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(StatusPolicy::Propagate),
            "suppress" => Ok(StatusPolicy::Suppress),
            other => Err(ShellError::config(format!("Unknown status policy: {}", other))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig {
                shell: DEFAULT_SHELL.to_string(),
                dry_run: false,
            },
            mail: MailConfig {
                program: DEFAULT_MAIL_PROGRAM.to_string(),
                quoting: QuotingPolicy::Strict,
                status_policy: StatusPolicy::Propagate,
            },
        }
    }
}

/// On-disk layout: every field optional so files only override what they set
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    general: Option<GeneralFile>,
    mail: Option<MailFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeneralFile {
    shell: Option<String>,
    dry_run: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct MailFile {
    program: Option<String>,
    quoting: Option<QuotingPolicy>,
    status_policy: Option<StatusPolicy>,
}

impl ConfigFile {
    fn apply(self, mut config: Config) -> Config {
        if let Some(general) = self.general {
            if let Some(shell) = general.shell {
                config.general.shell = shell;
            }
            if let Some(dry_run) = general.dry_run {
                config.general.dry_run = dry_run;
            }
        }
        if let Some(mail) = self.mail {
            if let Some(program) = mail.program {
                config.mail.program = program;
            }
            if let Some(quoting) = mail.quoting {
                config.mail.quoting = quoting;
            }
            if let Some(status_policy) = mail.status_policy {
                config.mail.status_policy = status_policy;
            }
        }
        config
    }
}

impl Config {
    /// Load configuration from the user file, the project file, an optional
    /// explicit file and finally the environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                info!("Loading user configuration from: {}", user_config.display());
                config = Self::merge_file(config, &user_config)?;
            }
        }

        let project_config = Path::new(PROJECT_CONFIG_FILE);
        if project_config.exists() {
            info!(
                "Loading project configuration from: {}",
                project_config.display()
            );
            config = Self::merge_file(config, project_config)?;
        }

        if let Some(path) = explicit {
            info!("Loading configuration from: {}", path.display());
            config = Self::merge_file(config, path)?;
        }

        config = Self::apply_env_overrides(config)?;

        debug!("Final configuration: {:#?}", config);
        Ok(config)
    }

    /// Defaults plus environment overrides, without touching any files
    pub fn from_env() -> Result<Self> {
        Self::apply_env_overrides(Self::default())
    }

    /// Get the user configuration file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("extproc-shell").join("config.toml"))
    }

    /// Overlay the fields set in a TOML file onto `base`
    pub fn merge_file(base: Self, path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ShellError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::merge_str(base, &content).map_err(|e| {
            ShellError::config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Overlay the fields set in TOML text onto `base`
    pub fn merge_str(base: Self, content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ShellError::config(e.to_string()))?;
        Ok(file.apply(base))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(config: Self) -> Result<Self> {
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(mut config: Self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(shell) = lookup("EXTPROC_SHELL") {
            config.general.shell = shell;
        }

        if let Some(dry_run) = lookup("EXTPROC_DRY_RUN") {
            config.general.dry_run = parse_flag("EXTPROC_DRY_RUN", &dry_run)?;
        }

        if let Some(program) = lookup("EXTPROC_MAIL_PROGRAM") {
            config.mail.program = program;
        }

        if let Some(quoting) = lookup("EXTPROC_MAIL_QUOTING") {
            config.mail.quoting = quoting.parse()?;
        }

        if let Some(status) = lookup("EXTPROC_MAIL_STATUS") {
            config.mail.status_policy = status.parse()?;
        }

        Ok(config)
    }
}

/// Parse a boolean environment value, rejecting anything unrecognized
fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ShellError::config(format!(
            "Invalid value for {}: {}",
            name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.general.shell, "/bin/sh");
        assert!(!config.general.dry_run);
        assert_eq!(config.mail.program, "mailx");
        assert_eq!(config.mail.quoting, QuotingPolicy::Strict);
        assert_eq!(config.mail.status_policy, StatusPolicy::Propagate);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        // Arrange
        let base = Config::default();
        let content = r#"
[mail]
quoting = "legacy"
"#;

        // Act
        let config = Config::merge_str(base, content).unwrap();

        // Assert
        assert_eq!(config.mail.quoting, QuotingPolicy::Legacy);
        assert_eq!(config.mail.program, "mailx");
        assert_eq!(config.general.shell, "/bin/sh");
    }

    #[test]
    fn test_merge_file_layers() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("first.toml");
        let second = temp_dir.path().join("second.toml");
        fs::write(&first, "[general]\nshell = \"/bin/bash\"\n").unwrap();
        fs::write(
            &second,
            "[mail]\nprogram = \"/usr/bin/mail\"\nstatus_policy = \"suppress\"\n",
        )
        .unwrap();

        // Act
        let config = Config::merge_file(Config::default(), &first).unwrap();
        let config = Config::merge_file(config, &second).unwrap();

        // Assert
        assert_eq!(config.general.shell, "/bin/bash");
        assert_eq!(config.mail.program, "/usr/bin/mail");
        assert_eq!(config.mail.status_policy, StatusPolicy::Suppress);
    }

    #[test]
    fn test_merge_rejects_unknown_keys() {
        let result = Config::merge_str(Config::default(), "[mail]\nrecipient = \"x\"\n");
        assert!(matches!(result, Err(ShellError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Config::merge_file(Config::default(), Path::new("/nonexistent/extproc.toml"));
        assert!(matches!(result, Err(ShellError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        // Arrange
        let vars: HashMap<&str, &str> = [
            ("EXTPROC_SHELL", "/bin/dash"),
            ("EXTPROC_DRY_RUN", "true"),
            ("EXTPROC_MAIL_QUOTING", "Direct"),
            ("EXTPROC_MAIL_STATUS", "suppress"),
        ]
        .into_iter()
        .collect();

        // Act
        let config = Config::apply_overrides(Config::default(), |key| {
            vars.get(key).map(|v| v.to_string())
        })
        .unwrap();

        // Assert
        assert_eq!(config.general.shell, "/bin/dash");
        assert!(config.general.dry_run);
        assert_eq!(config.mail.quoting, QuotingPolicy::Direct);
        assert_eq!(config.mail.status_policy, StatusPolicy::Suppress);
    }

    #[test]
    fn test_env_dry_run_accepts_common_spellings() {
        for value in ["1", "yes", "TRUE", "on"] {
            let config = Config::apply_overrides(Config::default(), |key| {
                (key == "EXTPROC_DRY_RUN").then(|| value.to_string())
            })
            .unwrap();
            assert!(config.general.dry_run, "{:?} did not enable dry run", value);
        }

        let mut base = Config::default();
        base.general.dry_run = true;
        let config = Config::apply_overrides(base, |key| {
            (key == "EXTPROC_DRY_RUN").then(|| "0".to_string())
        })
        .unwrap();
        assert!(!config.general.dry_run);
    }

    #[test]
    fn test_env_dry_run_rejects_unknown_value() {
        let result = Config::apply_overrides(Config::default(), |key| {
            (key == "EXTPROC_DRY_RUN").then(|| "maybe".to_string())
        });
        assert!(matches!(result, Err(ShellError::Config(_))));
    }

    #[test]
    fn test_defaults_match_component_defaults() {
        let config = Config::default();
        assert_eq!(config.general.shell, DEFAULT_SHELL);
        assert_eq!(config.mail.program, DEFAULT_MAIL_PROGRAM);
    }

    #[test]
    fn test_env_override_rejects_bad_policy() {
        let result = Config::apply_overrides(Config::default(), |key| {
            (key == "EXTPROC_MAIL_QUOTING").then(|| "shell-escape".to_string())
        });
        assert!(result.is_err());
    }
}
