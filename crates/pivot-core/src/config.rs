use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Project settings from `<root>/.pivot/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data file, relative to the project root unless absolute.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Start on the archived case list instead of the default one.
    #[serde(default)]
    pub show_archived_on_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub data_path: PathBuf,
    pub resolved_output: String,
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".pivot/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };
    load_user_config_from(&config_dir.join("pivot/config.toml"))
}

fn load_user_config_from(path: &Path) -> Result<UserConfig> {
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Merge project config, user config and environment.
///
/// `cli_data` overrides `[storage] data_file`; `cli_output` overrides every
/// other output source.
pub fn resolve_config(
    project_root: &Path,
    cli_data: Option<&Path>,
    cli_output: Option<&str>,
) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let data_path = cli_data.map_or_else(
        || project_root.join(&project.storage.data_file),
        Path::to_path_buf,
    );

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_output, user.output.clone(), env_format);

    Ok(EffectiveConfig {
        project,
        user,
        data_path,
        resolved_output,
    })
}

fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "plain" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

fn resolve_output(
    cli_output: Option<&str>,
    user_output: Option<String>,
    env_format: Option<String>,
) -> String {
    let from_sources = [
        cli_output.map(str::to_string),
        env_format,
        user_output,
    ];
    if let Some(mode) = from_sources
        .iter()
        .flatten()
        .find_map(|raw| normalize_output_mode(raw))
    {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

fn default_data_file() -> PathBuf {
    PathBuf::from(".pivot/data.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_project_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.storage.data_file, PathBuf::from(".pivot/data.json"));
        assert!(!cfg.display.show_archived_on_start);
    }

    #[test]
    fn project_config_overrides_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(root.path().join(".pivot")).expect("create .pivot");
        std::fs::write(
            root.path().join(".pivot/config.toml"),
            "[storage]\ndata_file = \"cases.json\"\n\n[display]\nshow_archived_on_start = true\n",
        )
        .expect("write config");

        let cfg = load_project_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.storage.data_file, PathBuf::from("cases.json"));
        assert!(cfg.display.show_archived_on_start);
    }

    #[test]
    fn malformed_project_config_reports_path() {
        let root = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(root.path().join(".pivot")).expect("create .pivot");
        std::fs::write(root.path().join(".pivot/config.toml"), "[storage\n").expect("write");

        let err = load_project_config(root.path()).expect_err("malformed toml");
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn cli_data_wins_over_project_setting() {
        let root = tempfile::tempdir().expect("temp dir");
        let explicit = root.path().join("elsewhere.json");
        let cfg = resolve_config(root.path(), Some(&explicit), Some("json")).expect("resolve");
        assert_eq!(cfg.data_path, explicit);
        assert_eq!(cfg.resolved_output, "json");

        let cfg = resolve_config(root.path(), None, Some("text")).expect("resolve");
        assert_eq!(cfg.data_path, root.path().join(".pivot/data.json"));
    }

    #[test]
    fn cli_output_overrides_env_and_config() {
        let output = resolve_output(
            Some("json"),
            Some("pretty".to_string()),
            Some("text".to_string()),
        );
        assert_eq!(output, "json");
    }

    #[test]
    fn env_beats_user_config() {
        let output = resolve_output(None, Some("pretty".to_string()), Some("text".to_string()));
        assert_eq!(output, "text");
    }

    #[test]
    fn unknown_modes_fall_through() {
        let output = resolve_output(Some("xml"), Some("human".to_string()), None);
        assert_eq!(output, "pretty");
    }

    #[test]
    fn user_config_parses_output() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "output = \"json\"\n").expect("write config");

        let cfg = load_user_config_from(&path).expect("parse");
        assert_eq!(cfg.output, Some("json".to_string()));
    }
}
