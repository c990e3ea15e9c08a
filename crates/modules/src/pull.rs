//! Module pull - write a module definition and its scripts to disk
//!
//! Layout under the output root:
//!
//! ```text
//! <root>/<portal>/<kind>/<name>/
//!     <name>.json        full definition
//!     manifest.json      provenance
//!     discovery.groovy   one file per embedded script
//!     collection.ps1
//! ```
//!
//! Re-pulling overwrites the previous files in place.

use gateway::{api, ApiTransport};
use serde_json::Value;
use shared::{ModuleKind, ModuleManifest, Result, ScriptLanguage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::extract::extract_scripts;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Files written by one pull
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullReport {
    pub dir: PathBuf,
    pub definition_file: PathBuf,
    pub manifest_file: PathBuf,
    pub script_files: Vec<PathBuf>,
    pub manifest: ModuleManifest,
}

impl PullReport {
    /// Every file written, definition first
    pub fn files(&self) -> Vec<&Path> {
        let mut files = vec![self.definition_file.as_path(), self.manifest_file.as_path()];
        files.extend(self.script_files.iter().map(PathBuf::as_path));
        files
    }
}

/// Make a remote name safe to use as a single path component
///
/// Not injective: `a/b` and `a_b` both map to `a_b` and share a directory.
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').trim();
    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Directory a module is pulled into
pub fn module_dir(root: &Path, portal: &str, kind: ModuleKind, name: &str) -> PathBuf {
    root.join(sanitize_component(portal))
        .join(kind.dir_name())
        .join(sanitize_component(name))
}

/// Write an already fetched definition to disk
pub fn write_module(
    root: &Path,
    portal: &str,
    kind: ModuleKind,
    source_id: u64,
    definition: &Value,
) -> Result<PullReport> {
    let manifest = ModuleManifest::from_definition(kind, source_id, definition, portal);
    let dir = module_dir(root, portal, kind, &manifest.name);
    std::fs::create_dir_all(&dir)?;

    let definition_file = dir.join(format!("{}.json", sanitize_component(&manifest.name)));
    std::fs::write(&definition_file, serde_json::to_string_pretty(definition)?)?;

    let manifest_file = dir.join(MANIFEST_FILE);
    std::fs::write(&manifest_file, serde_json::to_string_pretty(&manifest)?)?;

    // Scripts from an earlier pull are replaced, not merged
    for field in kind.descriptor().script_fields {
        for language in [ScriptLanguage::Groovy, ScriptLanguage::PowerShell] {
            let stale = dir.join(format!("{}.{}", field.role.file_stem(), language.extension()));
            if stale.exists() {
                std::fs::remove_file(&stale)?;
            }
        }
    }

    let mut script_files = Vec::new();
    for script in extract_scripts(kind.descriptor(), definition) {
        let path = dir.join(script.file_name());
        std::fs::write(&path, script.body)?;
        debug!(file = %path.display(), "wrote script");
        script_files.push(path);
    }

    Ok(PullReport {
        dir,
        definition_file,
        manifest_file,
        script_files,
        manifest,
    })
}

/// Fetch a module and write it under `root`
pub async fn pull_module<T>(
    transport: &T,
    root: &Path,
    portal: &str,
    kind: ModuleKind,
    id: u64,
) -> Result<PullReport>
where
    T: ApiTransport + ?Sized,
{
    let definition = api::get_module(transport, kind, id).await?;
    let report = write_module(root, portal, kind, id, &definition)?;
    info!(
        kind = %kind,
        id,
        name = %report.manifest.name,
        dir = %report.dir.display(),
        scripts = report.script_files.len(),
        "module pulled"
    );
    Ok(report)
}
