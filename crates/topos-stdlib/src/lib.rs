//! Standard-library loader for TOPOS-Xi.
//!
//! Scans a directory for `.htf` manifest files and produces the seed
//! symbol table of external entities. Manifests are plain text annotated
//! with tag blocks:
//!
//! ```text
//! [ENTITY: Torus]
//! [CLASS: Manifold]
//! [PROPERTIES:
//!   - dimension: Number = 2
//!   - euler_characteristic: Number = 0
//!   - is_orientable: Boolean = true
//!   - fundamental_group: String = "Z x Z"
//! ]
//! ```
//!
//! `[ENTITY: N]` opens a record; subsequent tags up to the next entity
//! describe it. `[FUNCTION: F]` registers the record under a second name.
//! Unknown tags and unrecognized property values are ignored.

use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::Serialize;

use topos_common::topology::TopologyBag;

/// An entity contributed by a standard-library manifest.
///
/// External entities act as opaque mappings (or spaces) during analysis:
/// they carry an optional `INPUT -> OUTPUT` signature, a topological
/// property bag, and an optional effect tag that the analyzer surfaces
/// as a warning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalEntity {
    pub name: String,
    /// Free-form class label, `"Unknown"` when the manifest omits it.
    pub class: String,
    pub effect: Option<String>,
    pub topology: TopologyBag,
    /// Raw source type string; `*` products are parsed at first use.
    pub source: Option<String>,
    /// Raw target type string.
    pub target: Option<String>,
    pub origin_file: String,
    /// Alternate lookup name; registered as an alias to the same record.
    pub function_name: Option<String>,
}

/// An error reading a standard-library directory or file.
#[derive(Debug)]
pub struct StdLibError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl fmt::Display for StdLibError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to read {}: {}", self.path.display(), self.source)
    }
}

impl std::error::Error for StdLibError {}

/// Loader for a directory of `.htf` manifests.
pub struct StdLibLoader {
    dir: PathBuf,
}

impl StdLibLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load every `.htf` file in the directory (sorted by file name, so
    /// later files win alias collisions deterministically).
    ///
    /// A missing directory yields an empty table; an unreadable file
    /// aborts the pipeline.
    pub fn load(&self) -> Result<FxHashMap<String, ExternalEntity>, StdLibError> {
        let mut definitions = FxHashMap::default();

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Ok(definitions),
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "htf"))
            .collect();
        files.sort();

        for path in files {
            let content = std::fs::read_to_string(&path).map_err(|source| StdLibError {
                path: path.clone(),
                source,
            })?;
            scan_file(&path, &content, &mut definitions);
        }

        Ok(definitions)
    }
}

/// Scan one manifest's text, appending every entity (and its `FUNCTION`
/// alias) to `definitions`.
fn scan_file(path: &Path, content: &str, definitions: &mut FxHashMap<String, ExternalEntity>) {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut rest = content;
    let mut offset = 0usize;
    let mut starts = Vec::new();
    while let Some(found) = rest.find("[ENTITY:") {
        starts.push(offset + found);
        rest = &rest[found + 1..];
        offset += found + 1;
    }

    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(content.len());
        let block = &content[start..end];
        let Some(name) = tag_value(block, "ENTITY") else {
            continue;
        };

        let entity = ExternalEntity {
            name: name.to_string(),
            class: tag_value(block, "CLASS").unwrap_or("Unknown").to_string(),
            effect: tag_value(block, "EFFECT").map(str::to_string),
            topology: parse_properties(tag_value(block, "PROPERTIES").unwrap_or("")),
            source: tag_value(block, "INPUT").map(str::to_string),
            target: tag_value(block, "OUTPUT").map(str::to_string),
            origin_file: file_name.clone(),
            function_name: tag_value(block, "FUNCTION").map(str::to_string),
        };

        if let Some(alias) = entity.function_name.clone() {
            definitions.insert(alias, entity.clone());
        }
        definitions.insert(entity.name.clone(), entity);
    }
}

/// Extract the value of `[TAG: value]` from a block. The value runs to
/// the first `]`, so `PROPERTIES` blocks may span multiple lines.
fn tag_value<'a>(block: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("[{tag}:");
    let start = block.find(&open)? + open.len();
    let end = block[start..].find(']')? + start;
    Some(block[start..end].trim())
}

/// Parse the recognized entries of a `PROPERTIES` block into a bag.
/// Unknown keys and malformed values are ignored.
fn parse_properties(block: &str) -> TopologyBag {
    let mut bag = TopologyBag::default();
    for line in block.lines() {
        let line = line.trim().trim_start_matches('-').trim();
        let Some((key, decl)) = line.split_once(':') else {
            continue;
        };
        let Some((_, value)) = decl.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            // The Euler characteristic may carry a sign; a dimension is
            // unsigned, so anything but plain digits is malformed.
            "euler_characteristic" => bag.euler_characteristic = value.parse().ok(),
            "dimension" => {
                if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
                    bag.dimension = value.parse().ok();
                }
            }
            "is_orientable" => {
                bag.is_orientable = match value {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                }
            }
            "fundamental_group" => {
                bag.fundamental_group = Some(value.trim_matches('"').to_string())
            }
            _ => {}
        }
    }
    bag
}
