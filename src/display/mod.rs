//! Notebook-cell-style display utilities.
//!
//! `show` writes a value to the next sequentially named artifact file under
//! a per-caller directory, so displayed text chunks, structured data, and
//! plots can be inspected after a pipeline script has finished without
//! managing file names by hand. `clear_display` removes a caller's
//! artifacts again.

mod encoder;
mod error;
mod figure;
mod value;

pub use error::ShowError;
pub use figure::{
    close_current_figure, has_current_figure, set_current_figure, FigureSurface, SaveOptions,
};
pub use value::{ShowValue, StructuredValue};

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use once_cell::sync::Lazy;

use crate::config::DisplayConfig;

/// Identity of the code invoking the display utilities.
///
/// Sequence numbering and output directories are partitioned by this key so
/// unrelated callers never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerId(String);

impl CallerId {
    pub fn new(name: impl Into<String>) -> Self {
        CallerId(name.into())
    }

    /// Derive the identity from a source file path, keyed by its file stem.
    pub fn from_source_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        CallerId(stem)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the caller identity at the invoking source location.
///
/// Expands in the caller's file, so the identity follows the direct invoker
/// even when the display functions are re-exported through another module.
#[macro_export]
macro_rules! caller_id {
    () => {
        $crate::display::CallerId::from_source_path(::std::path::Path::new(file!()))
    };
}

/// Owns the output root and the per-caller artifact sequence counters.
///
/// Artifacts land in `<root>/<caller>/C_<n>.<ext>`. Counters start at zero,
/// advance only after a successful write, and live as long as the context.
pub struct ShowContext {
    root: PathBuf,
    counters: HashMap<CallerId, u64>,
}

impl ShowContext {
    pub fn new(config: DisplayConfig) -> Self {
        Self {
            root: config.output_root,
            counters: HashMap::new(),
        }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            counters: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Next sequence number for `caller`.
    pub fn sequence(&self, caller: &CallerId) -> u64 {
        self.counters.get(caller).copied().unwrap_or(0)
    }

    /// Display directory for `caller`.
    pub fn caller_dir(&self, caller: &CallerId) -> PathBuf {
        self.root.join(caller.as_str())
    }

    /// Write `value` as the caller's next display artifact and return the
    /// written path.
    ///
    /// `prefix` is prepended (followed by a newline) to textual output. The
    /// sequence counter advances only after the write lands, so a failed
    /// call reuses its slot on retry.
    pub fn show(
        &mut self,
        caller: &CallerId,
        value: impl Into<ShowValue>,
        prefix: Option<&str>,
    ) -> Result<PathBuf, ShowError> {
        let value = value.into();

        // Fail fast: capturing the figure sentinel needs an active figure.
        if matches!(value, ShowValue::Figure) && !figure::has_current_figure() {
            return Err(ShowError::NoActiveFigure);
        }

        let sequence = self.sequence(caller);
        let dir = self.caller_dir(caller);
        fs::create_dir_all(&dir)?;

        // Base names are unique per slot across extensions; drop leftovers
        // from an earlier value whose extension differed.
        let base_name = format!("C_{}", sequence);
        remove_matching_stems(&dir, &base_name)?;

        let path = encoder::write_artifact(&dir, &base_name, &value, prefix)?;

        *self.counters.entry(caller.clone()).or_insert(0) += 1;
        Ok(path)
    }

    /// Remove every artifact for `caller`, and the display directory itself
    /// once empty. Returns the removed paths; a caller with no directory
    /// clears to an empty list.
    ///
    /// Counters are left untouched, so later `show` calls continue the
    /// sequence and overwrite any matching base names.
    pub fn clear_display(&self, caller: &CallerId) -> Result<Vec<PathBuf>, ShowError> {
        let dir = self.caller_dir(caller);
        if !dir.exists() {
            println!("No display directory found for {}. Nothing to clear.", caller);
            return Ok(Vec::new());
        }

        let mut removed = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(&path)?;
                removed.push(path);
            }
        }

        if fs::read_dir(&dir)?.next().is_none() {
            fs::remove_dir(&dir)?;
        }

        Ok(removed)
    }
}

// Delete files in `dir` whose stem equals `base_name`, whatever their
// extension.
fn remove_matching_stems(dir: &Path, base_name: &str) -> Result<(), ShowError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.file_stem() == Some(OsStr::new(base_name)) && path.is_file() {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

static DEFAULT_CONTEXT: Lazy<Mutex<ShowContext>> =
    Lazy::new(|| Mutex::new(ShowContext::new(DisplayConfig::default())));

/// Display `value` through the process-wide default context.
///
/// See [`ShowContext::show`].
pub fn show(
    caller: &CallerId,
    value: impl Into<ShowValue>,
    prefix: Option<&str>,
) -> Result<PathBuf, ShowError> {
    DEFAULT_CONTEXT.lock().unwrap().show(caller, value, prefix)
}

/// Clear the default context's artifacts for `caller`.
///
/// See [`ShowContext::clear_display`].
pub fn clear_display(caller: &CallerId) -> Result<Vec<PathBuf>, ShowError> {
    DEFAULT_CONTEXT.lock().unwrap().clear_display(caller)
}
