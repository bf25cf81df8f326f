//! Configuration loading and management.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Contents written to a configuration file that does not exist yet.
const CONFIG_PLACEHOLDER: &str = "# timebook configuration file\n";

/// External program acting as a command hook.
///
/// Either a single program path or a program followed by leading arguments:
///
/// ```toml
/// [hooks]
/// in = "/home/me/bin/tag-ticket"
/// out = ["python3", "/home/me/hooks/out.py"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HookCommand {
    Program(String),
    Argv(Vec<String>),
}

impl HookCommand {
    /// The program and its leading arguments.
    pub fn argv(&self) -> Vec<String> {
        match self {
            Self::Program(program) => vec![program.clone()],
            Self::Argv(argv) => argv.clone(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Hook programs keyed by canonical command name.
    #[serde(default)]
    pub hooks: BTreeMap<String, HookCommand>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("hooks", &self.hooks.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs_config_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: config_dir.join("sheets.db"),
            hooks: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file instead of the
    /// default one.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = config_path.map(Path::to_path_buf).or_else(default_config_file) {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TIMEBOOK_*)
        figment = figment.merge(Env::prefixed("TIMEBOOK_"));

        figment.extract()
    }
}

/// Creates `path` with a placeholder comment, and any missing parent
/// directories, if it does not exist yet.
pub fn ensure_config_file(path: &Path) -> io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, CONFIG_PLACEHOLDER)
}

/// Returns the default configuration file path.
///
/// On Linux: `~/.config/timebook/timebook.toml`
pub fn default_config_file() -> Option<PathBuf> {
    dirs_config_path().map(|p| p.join("timebook.toml"))
}

/// Returns the platform-specific config directory for timebook.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("timebook"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_file_ends_with_timebook_toml() {
        let path = default_config_file().unwrap();
        assert_eq!(path.file_name().unwrap(), "timebook.toml");
        assert_eq!(path.parent().unwrap().file_name().unwrap(), "timebook");
    }

    #[test]
    fn test_default_database_lives_next_to_config() {
        let config = Config::default();
        assert_eq!(config.database_path.file_name().unwrap(), "sheets.db");
        assert!(config.hooks.is_empty());
    }

    #[test]
    fn test_ensure_config_file_creates_parents_once() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested/dir/timebook.toml");

        ensure_config_file(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CONFIG_PLACEHOLDER);

        std::fs::write(&path, "database_path = \"/tmp/x.db\"\n").unwrap();
        ensure_config_file(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "database_path = \"/tmp/x.db\"\n"
        );
    }

    #[test]
    fn test_placeholder_file_loads_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("timebook.toml");
        ensure_config_file(&path).unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.database_path, Config::default().database_path);
    }

    #[test]
    fn test_load_reads_database_path_and_hooks() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("timebook.toml");
        std::fs::write(
            &path,
            r#"
database_path = "/data/sheets.db"

[hooks]
in = "/bin/tag"
out = ["python3", "hook.py"]
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/data/sheets.db"));
        assert_eq!(
            config.hooks.get("in"),
            Some(&HookCommand::Program("/bin/tag".to_string()))
        );
        assert_eq!(
            config.hooks["out"].argv(),
            vec!["python3".to_string(), "hook.py".to_string()]
        );
    }
}
