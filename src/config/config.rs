use std::collections::BTreeMap;
use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;

/// Default subsystem prefix shared by every producer metric.
pub const DEFAULT_SUBSYSTEM: &str = "kinesis_producer";

/// Environment variables with this prefix override file values,
/// e.g. `KPL_METRICS_METRICS__NAMESPACE=orders`.
pub const ENV_PREFIX: &str = "KPL_METRICS_";

/// Top-level configuration.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, JsonSchema)]
pub struct Config {
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Naming applied to every collector at construction.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct MetricsConfig {
    /// Optional leading prefix, e.g. the application name.
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default = "default_subsystem")]
    pub subsystem: String,
    /// Labels attached to every series, e.g. `{"region": "eu-west-1"}`.
    #[serde(default)]
    pub const_labels: BTreeMap<String, String>,
}

fn default_subsystem() -> String {
    DEFAULT_SUBSYSTEM.to_string()
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            subsystem: default_subsystem(),
            const_labels: BTreeMap::new(),
        }
    }
}

/// Load config from defaults, then the YAML file at `path` (if present),
/// then `KPL_METRICS_*` environment variables.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, Box<figment::Error>> {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Yaml::file(path.as_ref()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> serde_json::Result<()> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogFormat, LogLevel};
    use figment::Jail;

    fn load(path: &str) -> figment::Result<Config> {
        load_config(path).map_err(|e| *e)
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let config = load("does-not-exist.yaml")?;
            assert_eq!(config, Config::default());
            assert_eq!(config.metrics.subsystem, "kinesis_producer");
            Ok(())
        });
    }

    #[test]
    fn yaml_file_is_loaded() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
metrics:
  namespace: orders
  const_labels:
    region: eu-west-1
logging:
  level: debug
  format: json
"#,
            )?;
            let config = load("config.yaml")?;
            assert_eq!(config.metrics.namespace.as_deref(), Some("orders"));
            assert_eq!(config.metrics.subsystem, DEFAULT_SUBSYSTEM);
            assert_eq!(
                config.metrics.const_labels.get("region").map(String::as_str),
                Some("eu-west-1")
            );
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.logging.format, LogFormat::Json);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "metrics:\n  subsystem: from_file\n")?;
            jail.set_env("KPL_METRICS_METRICS__SUBSYSTEM", "from_env");
            let config = load("config.yaml")?;
            assert_eq!(config.metrics.subsystem, "from_env");
            Ok(())
        });
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "logging:\n  level: loud\n")?;
            assert!(load("config.yaml").is_err());
            Ok(())
        });
    }
}
