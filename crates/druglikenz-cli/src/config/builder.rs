use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, ResolverSettings};
use crate::cli::ScreenArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use druglikenz::engine::config::ScreeningConfigBuilder;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Merges command-line flags, `-S` overrides, the config file and built-in defaults,
/// in that order of precedence.
pub fn build_config(args: &ScreenArgs) -> Result<AppConfig> {
    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let file_config = apply_set_values(file_config, &args.set_values)?;
    let defaults = DefaultsConfig::default();

    let input = file_config.input.unwrap_or_default();
    let screening = file_config.screening.unwrap_or_default();
    let resolver = file_config.resolver.unwrap_or_default();
    let output = file_config.output.unwrap_or_default();

    let structure_column = args
        .column
        .clone()
        .or(input.structure_column)
        .unwrap_or(defaults.structure_column);
    let key_column = args.key_column.clone().or(input.key_column);

    let rule = match args.rule.as_deref().or(screening.rule.as_deref()) {
        Some(raw) => parser::parse_rule(raw).map_err(|e| CliError::Config(e.to_string()))?,
        None => defaults.rule,
    };
    let chunk_size = args
        .chunk_size
        .or(screening.chunk_size)
        .unwrap_or(defaults.chunk_size);

    let resolver_enabled =
        args.resolve_names || resolver.enabled.unwrap_or(defaults.resolver_enabled);
    let timeout_secs = resolver
        .timeout_secs
        .unwrap_or(defaults.resolver_timeout_secs);
    if timeout_secs == 0 {
        return Err(CliError::Config(
            "`resolver.timeout-secs` must be at least 1.".to_string(),
        ));
    }

    let screening_config = ScreeningConfigBuilder::new()
        .rule(rule)
        .chunk_size(chunk_size)
        .resolve_names(resolver_enabled)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let config = AppConfig {
        input_path: args.input.clone(),
        structure_column,
        key_column,
        screening: screening_config,
        resolver: ResolverSettings {
            enabled: resolver_enabled,
            base_url: resolver.base_url.unwrap_or(defaults.resolver_base_url),
            timeout: Duration::from_secs(timeout_secs),
        },
        accepted_csv: args.export.clone().or(output.accepted_csv),
        pages_dir: args.pages_dir.clone().or(output.pages_dir),
    };
    debug!("Final configuration: {:?}", config);
    Ok(config)
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) =
            parser::parse_key_value(kv_pair).map_err(|e| CliError::Config(e.to_string()))?;
        let invalid = |e: parser::ParseError| CliError::Config(e.to_string());

        match key {
            "input.structure-column" => {
                config
                    .input
                    .get_or_insert_with(Default::default)
                    .structure_column = Some(value.to_string());
            }
            "input.key-column" => {
                config.input.get_or_insert_with(Default::default).key_column =
                    Some(value.to_string());
            }
            "screening.rule" => {
                config.screening.get_or_insert_with(Default::default).rule =
                    Some(value.to_string());
            }
            "screening.chunk-size" => {
                config
                    .screening
                    .get_or_insert_with(Default::default)
                    .chunk_size = Some(parser::parse_integer(key, value).map_err(invalid)?);
            }
            "resolver.enabled" => {
                config.resolver.get_or_insert_with(Default::default).enabled =
                    Some(parser::parse_bool(key, value).map_err(invalid)?);
            }
            "resolver.base-url" => {
                config.resolver.get_or_insert_with(Default::default).base_url =
                    Some(value.to_string());
            }
            "resolver.timeout-secs" => {
                config
                    .resolver
                    .get_or_insert_with(Default::default)
                    .timeout_secs = Some(parser::parse_integer(key, value).map_err(invalid)?);
            }
            "output.accepted-csv" => {
                config
                    .output
                    .get_or_insert_with(Default::default)
                    .accepted_csv = Some(PathBuf::from(value));
            }
            "output.pages-dir" => {
                config.output.get_or_insert_with(Default::default).pages_dir =
                    Some(PathBuf::from(value));
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use druglikenz::core::rules::RuleId;
    use once_cell::sync::Lazy;
    use std::fs;
    use std::path::Path;
    use tempfile::{TempDir, tempdir};

    static TEST_DIR: Lazy<TempDir> = Lazy::new(|| tempdir().expect("Failed to create temp dir"));

    fn write_config_file(name: &str, content: &str) -> PathBuf {
        let file_path = TEST_DIR.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn base_args(config: Option<&Path>) -> ScreenArgs {
        ScreenArgs {
            input: PathBuf::from("library.csv"),
            config: config.map(Path::to_path_buf),
            ..ScreenArgs::default()
        }
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let app = build_config(&base_args(None)).unwrap();
        assert_eq!(app.structure_column, "SMILES");
        assert_eq!(app.key_column, None);
        assert_eq!(app.screening.rule, RuleId::Lipinski);
        assert_eq!(app.screening.chunk_size, 30);
        assert!(!app.screening.resolve_names);
        assert!(!app.resolver.enabled);
        assert_eq!(
            app.resolver.base_url,
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug"
        );
        assert_eq!(app.resolver.timeout, Duration::from_secs(10));
        assert_eq!(app.accepted_csv, None);
    }

    #[test]
    fn file_values_override_defaults() {
        let path = write_config_file(
            "file_values.toml",
            r#"
            [input]
            structure-column = "Structure"
            key-column = "ID"

            [screening]
            rule = "muegge"
            chunk-size = 10

            [resolver]
            enabled = true
            timeout-secs = 4

            [output]
            pages-dir = "pages"
            "#,
        );
        let app = build_config(&base_args(Some(&path))).unwrap();
        assert_eq!(app.structure_column, "Structure");
        assert_eq!(app.key_column.as_deref(), Some("ID"));
        assert_eq!(app.screening.rule, RuleId::Muegge);
        assert_eq!(app.screening.chunk_size, 10);
        assert!(app.screening.resolve_names);
        assert_eq!(app.resolver.timeout, Duration::from_secs(4));
        assert_eq!(app.pages_dir, Some(PathBuf::from("pages")));
    }

    #[test]
    fn set_values_override_file_and_flags_override_both() {
        let path = write_config_file(
            "set_values.toml",
            r#"
            [screening]
            rule = "muegge"
            chunk-size = 10
            "#,
        );
        let mut args = base_args(Some(&path));
        args.set_values = vec![
            "screening.chunk-size=20".to_string(),
            "screening.rule=veber".to_string(),
            "output.accepted-csv=out.csv".to_string(),
        ];
        let app = build_config(&args).unwrap();
        assert_eq!(app.screening.chunk_size, 20);
        assert_eq!(app.screening.rule, RuleId::Veber);
        assert_eq!(app.accepted_csv, Some(PathBuf::from("out.csv")));

        args.rule = Some("ro3".to_string());
        args.chunk_size = Some(5);
        args.export = Some(PathBuf::from("flag.csv"));
        let app = build_config(&args).unwrap();
        assert_eq!(app.screening.rule, RuleId::Congreve);
        assert_eq!(app.screening.chunk_size, 5);
        assert_eq!(app.accepted_csv, Some(PathBuf::from("flag.csv")));
    }

    #[test]
    fn resolve_names_flag_enables_the_resolver() {
        let mut args = base_args(None);
        args.resolve_names = true;
        let app = build_config(&args).unwrap();
        assert!(app.resolver.enabled);
        assert!(app.screening.resolve_names);
    }

    #[test]
    fn malformed_set_value_is_rejected() {
        let mut args = base_args(None);
        args.set_values = vec!["screening.chunk-size".to_string()];
        match build_config(&args) {
            Err(CliError::Config(msg)) => assert!(msg.contains("Expected KEY=VALUE")),
            other => panic!("expected a config error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_set_key_is_rejected() {
        let mut args = base_args(None);
        args.set_values = vec!["screening.threshold=3".to_string()];
        match build_config(&args) {
            Err(CliError::Config(msg)) => {
                assert!(msg.contains("Unsupported configuration key"))
            }
            other => panic!("expected a config error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let mut args = base_args(None);
        args.rule = Some("ghose".to_string());
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let mut args = base_args(None);
        args.chunk_size = Some(0);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let mut args = base_args(None);
        args.set_values = vec!["resolver.timeout-secs=0".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }
}
