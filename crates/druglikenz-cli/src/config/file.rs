use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileInputConfig {
    pub structure_column: Option<String>,
    pub key_column: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileScreeningConfig {
    pub rule: Option<String>,
    pub chunk_size: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileResolverConfig {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOutputConfig {
    pub accepted_csv: Option<PathBuf>,
    pub pages_dir: Option<PathBuf>,
}

/// The `--config` TOML file. Every field is optional; absent values fall through to
/// the built-in defaults.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub input: Option<FileInputConfig>,
    pub screening: Option<FileScreeningConfig>,
    pub resolver: Option<FileResolverConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_every_section() {
        let config: FileConfig = toml::from_str(
            r#"
            [input]
            structure-column = "Smiles"
            key-column = "ID"

            [screening]
            rule = "veber"
            chunk-size = 12

            [resolver]
            enabled = true
            base-url = "http://localhost:8080"
            timeout-secs = 3

            [output]
            accepted-csv = "accepted.csv"
            pages-dir = "pages"
            "#,
        )
        .unwrap();

        let input = config.input.unwrap();
        assert_eq!(input.structure_column.as_deref(), Some("Smiles"));
        assert_eq!(input.key_column.as_deref(), Some("ID"));
        let screening = config.screening.unwrap();
        assert_eq!(screening.rule.as_deref(), Some("veber"));
        assert_eq!(screening.chunk_size, Some(12));
        let resolver = config.resolver.unwrap();
        assert_eq!(resolver.enabled, Some(true));
        assert_eq!(resolver.timeout_secs, Some(3));
        let output = config.output.unwrap();
        assert_eq!(output.pages_dir, Some(PathBuf::from("pages")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<FileConfig, _> = toml::from_str(
            r#"
            [screening]
            rules = "lipinski"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn from_file_reports_the_offending_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[screening\nrule = 1").unwrap();

        match FileConfig::from_file(&path) {
            Err(CliError::FileParsing { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a parsing error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
