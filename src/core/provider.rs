use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{JavabindError, Result};
use super::types::ClassShape;

/// The reflection bridge contract: describe one class by its
/// fully-qualified name.
///
/// Calls are synchronous blocking round-trips and are never issued
/// concurrently; the host runtime's classloading state is process
/// global. `ClassNotFound` is the only recoverable failure mode the
/// resolver distinguishes.
pub trait ReflectionProvider {
    fn describe(&self, class_name: &str) -> Result<ClassShape>;
}

/// Reflection provider backed by pre-extracted class descriptors.
///
/// Classpath entries are either directories holding one JSON
/// descriptor per class (`com/example/Graph.json` under the root) or
/// standalone `.json` descriptor files. The classpath is scanned and
/// indexed once at construction and never mutated afterwards,
/// mirroring the classloader's own memoization.
pub struct DescriptorProvider {
    index: HashMap<String, PathBuf>,
}

impl DescriptorProvider {
    pub fn new(classpath: &[PathBuf]) -> Result<Self> {
        let mut index = HashMap::new();

        for entry in classpath {
            if entry.is_dir() {
                Self::index_directory(entry, &mut index)?;
            } else if entry.is_file() {
                Self::index_standalone(entry, &mut index);
            } else {
                warn!("Classpath entry does not exist: {}", entry.display());
            }
        }

        debug!("Indexed {} class descriptors", index.len());
        Ok(Self { index })
    }

    pub fn class_count(&self) -> usize {
        self.index.len()
    }

    fn index_directory(root: &Path, index: &mut HashMap<String, PathBuf>) -> Result<()> {
        for entry in WalkDir::new(root) {
            let entry = entry.map_err(|e| JavabindError::FileSystem(e.to_string()))?;
            let path = entry.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                Self::index_file(root, path, index);
            }
        }
        Ok(())
    }

    /// Derive the class name from the descriptor's path relative to
    /// its classpath root: `com/example/Graph.json` becomes
    /// `com.example.Graph`.
    fn index_file(root: &Path, path: &Path, index: &mut HashMap<String, PathBuf>) {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let stem = relative.with_extension("");
        let segments: Vec<String> = stem
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        let class_name = segments.join(".");
        if class_name.is_empty() {
            return;
        }
        // First classpath entry wins, like classloader ordering.
        index.entry(class_name).or_insert_with(|| path.to_path_buf());
    }

    /// A standalone descriptor file is indexed under its stem, so a
    /// file named `com.example.Graph.json` serves that class.
    fn index_standalone(path: &Path, index: &mut HashMap<String, PathBuf>) {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            index
                .entry(stem.to_string())
                .or_insert_with(|| path.to_path_buf());
        }
    }
}

impl ReflectionProvider for DescriptorProvider {
    fn describe(&self, class_name: &str) -> Result<ClassShape> {
        let path = self
            .index
            .get(class_name)
            .ok_or_else(|| JavabindError::ClassNotFound(class_name.to_string()))?;

        let content = std::fs::read_to_string(path)?;
        let shape: ClassShape =
            serde_json::from_str(&content).map_err(|e| JavabindError::Reflection {
                class: class_name.to_string(),
                message: format!("malformed descriptor {}: {}", path.display(), e),
            })?;

        if shape.full_name != class_name {
            return Err(JavabindError::Reflection {
                class: class_name.to_string(),
                message: format!("descriptor declares {}", shape.full_name),
            });
        }

        Ok(shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_descriptor(root: &Path, class_name: &str, body: &str) {
        let relative: PathBuf = class_name.split('.').collect();
        let path = root.join(relative).with_extension("json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_describe_from_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        write_descriptor(
            dir.path(),
            "com.example.Graph",
            r#"{ "fullName": "com.example.Graph", "kind": "class" }"#,
        );

        let provider = DescriptorProvider::new(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(provider.class_count(), 1);

        let shape = provider.describe("com.example.Graph").unwrap();
        assert_eq!(shape.full_name, "com.example.Graph");
    }

    #[test]
    fn test_describe_from_standalone_file_entry() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("com.example.Graph.json");
        fs::write(
            &file,
            r#"{ "fullName": "com.example.Graph", "kind": "class" }"#,
        )
        .unwrap();

        let provider = DescriptorProvider::new(&[file]).unwrap();
        assert_eq!(provider.class_count(), 1);

        let shape = provider.describe("com.example.Graph").unwrap();
        assert_eq!(shape.full_name, "com.example.Graph");
    }

    #[test]
    fn test_missing_class_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = DescriptorProvider::new(&[dir.path().to_path_buf()]).unwrap();

        match provider.describe("com.example.Missing") {
            Err(JavabindError::ClassNotFound(name)) => assert_eq!(name, "com.example.Missing"),
            other => panic!("expected ClassNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_mismatched_descriptor_is_reflection_error() {
        let dir = tempfile::tempdir().unwrap();
        write_descriptor(
            dir.path(),
            "com.example.Graph",
            r#"{ "fullName": "com.example.Other" }"#,
        );

        let provider = DescriptorProvider::new(&[dir.path().to_path_buf()]).unwrap();
        assert!(matches!(
            provider.describe("com.example.Graph"),
            Err(JavabindError::Reflection { .. })
        ));
    }

    #[test]
    fn test_first_classpath_entry_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_descriptor(
            first.path(),
            "com.example.Graph",
            r#"{ "fullName": "com.example.Graph", "kind": "interface" }"#,
        );
        write_descriptor(
            second.path(),
            "com.example.Graph",
            r#"{ "fullName": "com.example.Graph", "kind": "class" }"#,
        );

        let provider = DescriptorProvider::new(&[
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ])
        .unwrap();

        let shape = provider.describe("com.example.Graph").unwrap();
        assert_eq!(shape.kind, super::super::types::ClassKind::Interface);
    }
}
