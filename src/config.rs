// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Build configuration

use anyhow::{anyhow, bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::assembly::{AssemblyBuilder, Tessellation};
use crate::dimensions::{
    DerivedDimensions, DimensionResolver, FitAllowances, NominalSpec, OvercutMargins,
};
use crate::geometry::{CsgConfig, CsgEngine};
use crate::utils::Unit;

/// Default config file looked up by [`RodConfig::load`]
pub const DEFAULT_CONFIG_FILE: &str = "tierod.toml";

/// Full build configuration. Every section defaults to the 2001 Ford Ranger
/// tie rod, so a partial file only needs the values that change. Missing
/// `nominal`, `allowances` and `margins` entries are filled in the file's
/// `unit`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawRodConfig")]
pub struct RodConfig {
    /// Unit of `nominal`, `allowances` and `margins`
    pub unit: Unit,
    pub nominal: NominalSpec,
    pub allowances: FitAllowances,
    pub margins: OvercutMargins,
    pub tessellation: Tessellation,
    /// Boolean rule settings, always meters
    pub csg: CsgConfig,
}

/// Config as written: the unit-bearing sections stay raw until the unit is
/// known
#[derive(Default, Deserialize)]
#[serde(default)]
struct RawRodConfig {
    unit: Unit,
    nominal: toml::Table,
    allowances: toml::Table,
    margins: toml::Table,
    tessellation: Tessellation,
    csg: CsgConfig,
}

impl TryFrom<RawRodConfig> for RodConfig {
    type Error = anyhow::Error;

    fn try_from(raw: RawRodConfig) -> Result<Self> {
        let unit = raw.unit;
        Ok(Self {
            unit,
            nominal: overlay("nominal", NominalSpec::in_unit(unit), raw.nominal)?,
            allowances: overlay("allowances", FitAllowances::in_unit(unit), raw.allowances)?,
            margins: overlay("margins", OvercutMargins::in_unit(unit), raw.margins)?,
            tessellation: raw.tessellation,
            csg: raw.csg,
        })
    }
}

/// Apply the entries of one config section on top of `defaults`
fn overlay<T>(section: &str, defaults: T, entries: toml::Table) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut table = match toml::Value::try_from(defaults) {
        Ok(toml::Value::Table(table)) => table,
        Ok(_) => bail!("[{section}] defaults are not a table"),
        Err(e) => bail!("[{section}] defaults: {e}"),
    };
    table.extend(entries);
    toml::Value::Table(table)
        .try_into()
        .map_err(|e| anyhow!("Invalid [{section}] section: {e}"))
}

impl RodConfig {
    /// The default rod with every unit-bearing section written in `unit`
    pub fn in_unit(unit: Unit) -> Self {
        Self {
            unit,
            nominal: NominalSpec::in_unit(unit),
            allowances: FitAllowances::in_unit(unit),
            margins: OvercutMargins::in_unit(unit),
            ..Self::default()
        }
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| {
                format!("Failed to read config file: {:?}", path.as_ref())
            })?;
        let config: RodConfig = toml::from_str(&content)
            .with_context(|| {
                format!("Failed to parse config file: {:?}", path.as_ref())
            })?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// `TIEROD_CONFIG` names the file (default `tierod.toml`, skipped when
    /// absent); `TIEROD_TUBE_LENGTH` replaces the nominal tube length.
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    fn load_with(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match var("TIEROD_CONFIG").map(PathBuf::from) {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        if let Some(length) = var("TIEROD_TUBE_LENGTH") {
            config.nominal.tube_length = length
                .trim()
                .parse()
                .with_context(|| format!("Invalid TIEROD_TUBE_LENGTH: {length:?}"))?;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| {
                format!("Failed to write config file: {:?}", path.as_ref())
            })?;
        Ok(())
    }

    pub fn resolver(&self) -> DimensionResolver {
        DimensionResolver::new(self.unit)
            .with_allowances(self.allowances)
            .with_margins(self.margins)
    }

    pub fn resolve(&self) -> crate::Result<DerivedDimensions> {
        self.resolver().resolve(&self.nominal)
    }

    /// Resolve dimensions and set up a builder with this config's
    /// tessellation and boolean rules
    pub fn builder(&self) -> crate::Result<AssemblyBuilder> {
        let dims = self.resolve()?;
        let builder = AssemblyBuilder::with_engine(dims, CsgEngine::new(self.csg));
        Ok(builder.with_tessellation(self.tessellation))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_fills_defaults_in_its_unit() {
        let config: RodConfig = toml::from_str(
            r#"
            unit = "mm"

            [nominal]
            tube_length = 600.0
            "#,
        )
        .unwrap();
        assert_eq!(config.unit, Unit::Mm);
        assert_eq!(config.nominal.tube_length, 600.0);
        assert!((config.nominal.tube_od - 31.75).abs() < 1e-12);
        assert_eq!(config.margins, OvercutMargins::in_unit(Unit::Mm));
        assert_eq!(config.tessellation, Tessellation::default());

        let dims = config.resolve().unwrap();
        assert!((dims.tube_od - 0.03175).abs() < 1e-12);
        assert!((dims.tube_length - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_inch_file_keeps_inch_defaults() {
        let config: RodConfig = toml::from_str("[margins]\nnut = 0.2\n").unwrap();
        assert_eq!(config.nominal, NominalSpec::default());
        assert_eq!(config.margins.nut, 0.2);
        assert_eq!(config.margins.tube, OvercutMargins::default().tube);
    }

    #[test]
    fn test_bad_section_value_is_an_error() {
        let text = "[nominal]\ntube_od = \"wide\"\n";
        let err = toml::from_str::<RodConfig>(text).unwrap_err();
        assert!(err.to_string().contains("[nominal]"), "{err}");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rod.toml");

        let mut config = RodConfig::default();
        config.nominal.tube_length = 30.0;
        config.tessellation.round = 32;
        config.save(&path).unwrap();

        let loaded = RodConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = RodConfig::from_file("/nonexistent/tierod.toml")
            .unwrap_err();
        assert!(format!("{err:#}").contains("tierod.toml"));
    }

    #[test]
    fn test_load_reads_named_file_and_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        RodConfig::in_unit(Unit::Mm).save(&path).unwrap();
        let path_str = path.to_string_lossy().into_owned();

        let vars = |key: &str| match key {
            "TIEROD_CONFIG" => Some(path_str.clone()),
            "TIEROD_TUBE_LENGTH" => Some(" 610.5 ".to_string()),
            _ => None,
        };
        let config = RodConfig::load_with(vars).unwrap();
        assert_eq!(config.unit, Unit::Mm);
        assert_eq!(config.nominal.tube_length, 610.5);
        assert_eq!(
            config.nominal.tube_od,
            NominalSpec::in_unit(Unit::Mm).tube_od
        );
    }

    #[test]
    fn test_load_rejects_bad_tube_length() {
        let vars = |key: &str| (key == "TIEROD_TUBE_LENGTH").then(|| "long".to_string());
        let err = RodConfig::load_with(vars).unwrap_err();
        assert!(
            format!("{err:#}").contains("Invalid TIEROD_TUBE_LENGTH"),
            "{err:#}"
        );
    }

    #[test]
    fn test_load_missing_named_file_fails() {
        let vars = |key: &str| match key {
            "TIEROD_CONFIG" => Some("/nonexistent/rod.toml".to_string()),
            _ => None,
        };
        assert!(RodConfig::load_with(vars).is_err());
    }

    #[test]
    fn test_default_resolves() {
        let dims = RodConfig::default().resolve().unwrap();
        assert!((dims.tube_length - 22.0 * 0.0254).abs() < 1e-12);
    }
}
