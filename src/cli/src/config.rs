use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use cuboid::{Dimensions, MoveCatalog, NamedMove};
use serde::Deserialize;

/// A state graph run, as read from a TOML file. Every field can also be
/// given on the command line, which takes precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// The puzzle size, e.g. "3x2x1".
    pub dimensions: Option<String>,
    /// The moves the search may use, e.g. ["R2", "D2", "U2"].
    pub permitted: Option<Vec<String>>,
    #[serde(default)]
    pub parallel: bool,
    pub max_depth: Option<usize>,
    /// Where to write the edge list.
    pub output: Option<PathBuf>,
}

impl RunConfig {
    pub fn load(path: &Path) -> color_eyre::Result<RunConfig> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read the run configuration {}", path.display()))?;
        toml::from_str(&text)
            .wrap_err_with(|| format!("Failed to parse the run configuration {}", path.display()))
    }

    pub fn dimensions(&self) -> color_eyre::Result<Dimensions> {
        let dimensions = self
            .dimensions
            .as_deref()
            .ok_or_else(|| eyre!("No puzzle dimensions were given"))?;
        Ok(dimensions.parse::<Dimensions>()?)
    }

    /// The permitted moves, checked against `catalog`.
    pub fn permitted(&self, catalog: &MoveCatalog) -> color_eyre::Result<Vec<NamedMove>> {
        let permitted = self
            .permitted
            .as_ref()
            .ok_or_else(|| eyre!("No permitted moves were given"))?;
        Ok(catalog.parse(&permitted.join(" "))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_config() {
        let config = toml::from_str::<RunConfig>(
            r#"
            dimensions = "3x2x1"
            permitted = ["R2", "D2", "U2"]
            max_depth = 4
            output = "graph.txt"
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            RunConfig {
                dimensions: Some("3x2x1".to_owned()),
                permitted: Some(vec!["R2".to_owned(), "D2".to_owned(), "U2".to_owned()]),
                parallel: false,
                max_depth: Some(4),
                output: Some(PathBuf::from("graph.txt")),
            }
        );

        let dims = config.dimensions().unwrap();
        assert_eq!(dims.to_string(), "3x2x1");
        assert_eq!(
            config.permitted(&MoveCatalog::new(dims)).unwrap(),
            [NamedMove::R2, NamedMove::D2, NamedMove::U2]
        );
    }

    #[test]
    fn test_bad_run_configs() {
        assert!(toml::from_str::<RunConfig>("dimension = \"3x3x3\"").is_err());

        let config = toml::from_str::<RunConfig>(
            r#"
            dimensions = "3x2x1"
            permitted = ["R"]
            "#,
        )
        .unwrap();
        let dims = config.dimensions().unwrap();
        assert!(config.permitted(&MoveCatalog::new(dims)).is_err());

        assert!(RunConfig::default().dimensions().is_err());
    }
}
