use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{JavabindError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project identity and seed classes
    pub project: ProjectConfig,

    /// Where the reflection bridge finds class metadata
    pub classpath: ClasspathConfig,

    /// Which discovered classes get fully expanded
    pub filter: FilterConfig,

    /// Output layout and granularity
    pub output: OutputConfig,

    /// Template customization
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Fully-qualified class names resolution starts from. Seeds
    /// bypass the inclusion filter and must resolve.
    pub seed_classes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClasspathConfig {
    /// Descriptor directories or standalone descriptor files, in
    /// lookup priority order. Fixed before resolution starts.
    pub entries: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Regular expressions over fully-qualified class names; a class
    /// is in scope iff at least one matches.
    pub include: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One output file per included class
    Class,
    /// One output file per package of included classes
    Package,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base output directory; JSON dumps land under `<dir>/json` and
    /// generated sources under `<dir>/lib`
    pub dir: PathBuf,

    /// Output unit granularity
    pub granularity: Granularity,

    /// File extension for generated source files
    pub extension: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Custom template directory (defaults to ./templates)
    pub template_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                name: "Unnamed Project".to_string(),
                seed_classes: Vec::new(),
            },
            classpath: ClasspathConfig {
                entries: vec![PathBuf::from("classpath")],
            },
            filter: FilterConfig {
                include: Vec::new(),
            },
            output: OutputConfig {
                dir: PathBuf::from("out"),
                granularity: Granularity::Package,
                extension: "d.ts".to_string(),
            },
            templates: TemplateConfig { template_dir: None },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| JavabindError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| JavabindError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                let candidates = ["Javabind.toml", "javabind.toml", ".javabind.toml"];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = Config::default();
        config.project.seed_classes = vec!["com.example.Graph".to_string()];
        config.filter.include = vec![r"^com\.example\.".to_string()];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("javabind.toml");
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.project.seed_classes, config.project.seed_classes);
        assert_eq!(loaded.filter.include, config.filter.include);
        assert_eq!(loaded.output.granularity, Granularity::Package);
    }

    #[test]
    fn test_missing_config_falls_back_to_default() {
        let config = Config::load_or_default(Some("/nonexistent/javabind.toml")).unwrap();
        assert!(config.project.seed_classes.is_empty());
        assert_eq!(config.output.dir, PathBuf::from("out"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("javabind.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(JavabindError::Config(_))
        ));
    }
}
