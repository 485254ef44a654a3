use anyhow::{Context, Result};
use rota_core::{AppBuilder, Catalog};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

// Console configuration sourced from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub catalog_path: Option<PathBuf>,
    pub week_label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CliConfigOverride {
    catalog: Option<String>,
    week_label: Option<String>,
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self {
            catalog_path: std::env::var("ROTA_CATALOG")
                .ok()
                .and_then(non_blank)
                .map(PathBuf::from),
            week_label: std::env::var("ROTA_WEEK_LABEL").ok().and_then(non_blank),
        }
    }

    pub fn from_env_or_file() -> Result<Self> {
        let mut config = Self::from_env();
        if let Ok(path) = std::env::var("ROTA_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read ROTA_CONFIG: {path}"))?;
            config.apply_override(&contents)?;
        }
        Ok(config)
    }

    fn apply_override(&mut self, contents: &str) -> Result<()> {
        let override_cfg: CliConfigOverride =
            serde_json::from_str(contents).with_context(|| "parse rota config json")?;
        if let Some(value) = override_cfg.catalog.and_then(non_blank) {
            self.catalog_path = Some(PathBuf::from(value));
        }
        if let Some(value) = override_cfg.week_label.and_then(non_blank) {
            self.week_label = Some(value);
        }
        Ok(())
    }

    pub fn catalog(&self) -> Result<Catalog> {
        let Some(path) = &self.catalog_path else {
            return Ok(Catalog::household_default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read catalog: {}", path.display()))?;
        Catalog::from_json(&contents).with_context(|| format!("parse catalog: {}", path.display()))
    }

    pub fn builder(&self) -> Result<AppBuilder> {
        let mut builder = AppBuilder::new().catalog(self.catalog()?);
        if let Some(label) = &self.week_label {
            builder = builder.week_label(label.clone());
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_replaces_only_present_keys() {
        let mut config = CliConfig {
            catalog_path: Some(PathBuf::from("chores.json")),
            week_label: None,
        };
        config
            .apply_override(r#"{ "week_label": "Week 13 Oct - 19 Oct" }"#)
            .unwrap();

        assert_eq!(config.catalog_path, Some(PathBuf::from("chores.json")));
        assert_eq!(config.week_label.as_deref(), Some("Week 13 Oct - 19 Oct"));
    }

    #[test]
    fn blank_override_values_are_ignored() {
        let mut config = CliConfig::default();
        config
            .apply_override(r#"{ "catalog": "  ", "week_label": "" }"#)
            .unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn malformed_override_is_an_error() {
        let mut config = CliConfig::default();
        let err = config.apply_override("week_label: nope").unwrap_err();
        assert!(format!("{err:#}").contains("parse rota config json"));
    }

    #[test]
    fn missing_catalog_file_reports_path() {
        let config = CliConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/rota/catalog.json")),
            week_label: None,
        };
        let err = config.catalog().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/rota/catalog.json"));
    }

    #[test]
    fn no_catalog_path_uses_household_default() {
        let catalog = CliConfig::default().catalog().unwrap();
        assert_eq!(catalog, Catalog::household_default());
    }
}
