//! Expansion of `!include` directives in YAML documents.
//!
//! A node tagged `!include some/file.yaml` is replaced by the contents of that file, which is
//! itself expanded first. Paths are relative to the directory of the file containing the tag.
//! Once every include has been expanded, YAML merge keys (`<<`) are applied, which allows a local
//! mapping to override fields of an included base:
//!
//! ```yaml
//! fin_model:
//!   <<: !include default_fin_config.yaml
//!   system_costs:
//!     om_capacity: [29.567]
//! ```
//!
//! The merge is shallow: a local key replaces the whole value of the included key, so the
//! `system_costs` mapping above does not keep any other fields from the base file.
//!
//! Note that `#!include` is a plain YAML comment and is ignored.
use anyhow::{Context, Result, bail, ensure};
use itertools::Itertools;
use log::debug;
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::iter;
use std::path::{Path, PathBuf};

/// The tag which marks a node to be replaced with the contents of another file
const INCLUDE_TAG: &str = "include";

/// Load the YAML file at `file_path` with all includes and merge keys expanded
pub fn resolve_includes(file_path: &Path) -> Result<Value> {
    IncludeResolver::new().resolve(file_path)
}

/// Loads YAML files, expanding includes.
///
/// Files are cached by canonical path, so a fragment which is shared between several parts of a
/// document is only read and parsed once.
#[derive(Default)]
pub struct IncludeResolver {
    cache: HashMap<PathBuf, Value>,
    stack: Vec<PathBuf>,
}

impl IncludeResolver {
    /// Create a new resolver with an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the YAML file at `file_path`, expanding all includes and merge keys.
    pub fn resolve(&mut self, file_path: &Path) -> Result<Value> {
        let mut value = self.load_file(file_path)?;
        value
            .apply_merge()
            .context("Failed to apply YAML merge keys")?;

        Ok(value)
    }

    /// The number of distinct files read so far
    pub fn file_count(&self) -> usize {
        self.cache.len()
    }

    /// Read a single file and expand its includes
    fn load_file(&mut self, file_path: &Path) -> Result<Value> {
        let canonical = file_path
            .canonicalize()
            .with_context(|| format!("Could not open file {}", file_path.display()))?;

        if let Some(pos) = self.stack.iter().position(|path| *path == canonical) {
            let cycle = self.stack[pos..]
                .iter()
                .chain(iter::once(&canonical))
                .map(|path| path.display())
                .join(" -> ");
            bail!("Circular include: {cycle}");
        }

        if let Some(value) = self.cache.get(&canonical) {
            return Ok(value.clone());
        }

        let yaml_str = fs::read_to_string(&canonical)
            .with_context(|| format!("Could not read file {}", canonical.display()))?;
        let mut value: Value = serde_yaml::from_str(&yaml_str)
            .with_context(|| format!("Invalid YAML in {}", canonical.display()))?;

        let base_dir = canonical
            .parent()
            .context("File has no parent directory")?
            .to_path_buf();
        self.stack.push(canonical.clone());
        let result = self.expand(&mut value, &base_dir);
        self.stack.pop();
        result.with_context(|| format!("Could not expand includes in {}", canonical.display()))?;

        debug!("Loaded YAML file {}", canonical.display());
        self.cache.insert(canonical, value.clone());

        Ok(value)
    }

    /// Replace every `!include` node in `value` with the contents of the referenced file
    fn expand(&mut self, value: &mut Value, base_dir: &Path) -> Result<()> {
        match value {
            Value::Tagged(tagged) => {
                ensure!(
                    tagged.tag == INCLUDE_TAG,
                    "Unsupported YAML tag: {}",
                    tagged.tag
                );
                let Value::String(relative_path) = &tagged.value else {
                    bail!("The !include directive must be followed by a file path");
                };
                let path = base_dir.join(relative_path);
                *value = self.load_file(&path)?;
            }
            Value::Mapping(mapping) => {
                for (_, child) in mapping.iter_mut() {
                    self.expand(child, base_dir)?;
                }
            }
            Value::Sequence(sequence) => {
                for child in sequence {
                    self.expand(child, base_dir)?;
                }
            }
            _ => {}
        }

        Ok(())
    }
}
