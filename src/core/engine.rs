use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::{Config, Granularity};
use crate::error::JavabindError;
use super::emitter::CodeWriter;
use super::filter::InclusionFilter;
use super::provider::{DescriptorProvider, ReflectionProvider};
use super::resolver::{ClassMap, ClassMapBuilder};

/// Main orchestration engine: configuration, filter, and classpath
/// are fixed at construction; each command runs against that state.
pub struct Engine {
    config: Config,
    filter: InclusionFilter,
    provider: DescriptorProvider,
}

impl Engine {
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;

        debug!("Loaded configuration: {:?}", config);

        // A malformed inclusion pattern is fatal here, before any
        // reflection call is made.
        let filter = InclusionFilter::new(&config.filter.include)?;

        // The classpath is scanned and indexed once; it never changes
        // during a run.
        let provider = DescriptorProvider::new(&config.classpath.entries)?;
        info!(
            "Classpath ready: {} class descriptors visible",
            provider.class_count()
        );

        Ok(Self {
            config,
            filter,
            provider,
        })
    }

    /// Resolve the transitive class closure from the configured seeds
    /// and emit JSON dumps plus generated source files.
    pub async fn generate(
        &self,
        output: Option<PathBuf>,
        granularity: Option<Granularity>,
        force: bool,
    ) -> Result<()> {
        let seeds = &self.config.project.seed_classes;
        if seeds.is_empty() {
            return Err(JavabindError::Config(
                "no seed classes configured; set project.seed_classes".to_string(),
            )
            .into());
        }

        let out_dir = output.unwrap_or_else(|| self.config.output.dir.clone());
        let granularity = granularity.unwrap_or(self.config.output.granularity);
        let json_dir = out_dir.join("json");
        let lib_dir = out_dir.join("lib");

        info!("Resolving {} seed classes", seeds.len());
        if self.filter.is_empty() {
            warn!("No inclusion patterns configured; only seeds will be expanded");
        }

        let builder = ClassMapBuilder::new(&self.provider, &self.filter);
        let map = builder.build(seeds)?;

        let included = map.included().count();
        info!(
            "Resolution complete: {} classes discovered, {} expanded, {} unhandled",
            map.len(),
            included,
            map.unhandled_types().len()
        );

        if force {
            for dir in [&json_dir, &lib_dir] {
                if dir.exists() {
                    std::fs::remove_dir_all(dir)
                        .map_err(|e| JavabindError::FileSystem(e.to_string()))?;
                }
            }
        }

        let writer = CodeWriter::new(&self.config.templates, &self.config.output)?;
        writer.write_jsons(&map, &json_dir)?;
        writer.write(&map, &lib_dir, granularity)?;

        self.report_unhandled(&map);

        Ok(())
    }

    /// Reflect one class and print its raw shape as pretty JSON.
    /// Bypasses the inclusion filter.
    pub async fn inspect(&self, class_name: &str) -> Result<()> {
        let shape = self.provider.describe(class_name)?;
        println!("{}", serde_json::to_string_pretty(&shape)?);
        Ok(())
    }

    /// Write a default configuration file, refusing to clobber an
    /// existing one.
    pub async fn init(&self, path: Option<PathBuf>) -> Result<()> {
        let target = path
            .unwrap_or_else(|| PathBuf::from("."))
            .join("javabind.toml");
        if target.exists() {
            return Err(JavabindError::Config(format!(
                "{} already exists",
                target.display()
            ))
            .into());
        }
        Config::default().save(&target)?;
        info!("Wrote default configuration to {}", target.display());
        Ok(())
    }

    fn report_unhandled(&self, map: &ClassMap) {
        if map.unhandled_types().is_empty() {
            return;
        }
        let names: Vec<&str> = map.unhandled_types().iter().map(String::as_str).collect();
        warn!(
            "{} referenced types were not expanded: {}",
            names.len(),
            names.join(", ")
        );
    }
}
