#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::RegistryConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "candidate-registry")]
#[command(about = "Manage an in-memory candidate registry backed by a JSON file")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Overrides storage.candidates_path from the config file
    #[arg(long)]
    pub candidates_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: cli::Command,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the TOML file (if any) and applies command line overrides.
    pub fn resolve(&self) -> crate::Result<RegistryConfig> {
        let mut config = match &self.config {
            Some(path) => RegistryConfig::from_file(path)?,
            None => RegistryConfig::default(),
        };

        if let Some(path) = &self.candidates_path {
            config.storage.candidates_path = Some(path.clone());
        }

        let logging = config.logging.get_or_insert_with(Default::default);
        if self.verbose {
            logging.level = Some("debug".to_string());
        }
        if self.json_logs {
            logging.format = Some("json".to_string());
        }

        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_cli_overrides_config_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("registry.toml");
        std::fs::write(
            &config_path,
            "[storage]\ncandidates_path = \"from-file.json\"\n",
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "candidate-registry",
            "--config",
            config_path.to_str().unwrap(),
            "--candidates-path",
            "override.json",
            "--verbose",
            "list",
        ]);

        let config = cli.resolve().unwrap();
        assert_eq!(config.candidates_path(), Some("override.json"));
        assert_eq!(config.log_level(), "debug");
        assert!(!config.json_logs());
    }

    #[test]
    fn test_no_config_file_means_no_path() {
        let cli = CliConfig::parse_from(["candidate-registry", "save"]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.candidates_path(), None);
    }
}
