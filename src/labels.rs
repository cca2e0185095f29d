//! Display names for application identifiers.

use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no application named {0:?}")]
    NotFound(String),
    #[error("desktop entry {path} has no Name= key")]
    MissingName { path: PathBuf },
    #[error("failed to read desktop entry: {0}")]
    Io(#[from] io::Error),
}

pub trait AppLabelResolver {
    fn resolve(&self, app_id: &str) -> Result<String, ResolveError>;
}

/// Resolved name for `app_id`, or the id itself when resolution fails.
pub fn display_name(resolver: &dyn AppLabelResolver, app_id: &str) -> String {
    match resolver.resolve(app_id) {
        Ok(name) if !name.trim().is_empty() => name,
        Ok(_) => app_id.to_string(),
        Err(err) => {
            tracing::debug!(app_id, "label lookup failed: {err}");
            app_id.to_string()
        }
    }
}

/// Fixed id → name table.
#[derive(Debug, Default, Clone)]
pub struct StaticLabels {
    names: HashMap<String, String>,
}

impl StaticLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, app_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(app_id.into(), name.into());
        self
    }
}

impl AppLabelResolver for StaticLabels {
    fn resolve(&self, app_id: &str) -> Result<String, ResolveError> {
        self.names
            .get(app_id)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(app_id.to_string()))
    }
}

/// Looks up `<app id>.desktop` in XDG application directories and reads the
/// untranslated `Name=` key of the `[Desktop Entry]` group.
///
/// Lookups, including misses, are cached for the lifetime of the resolver.
#[derive(Debug, Default)]
pub struct DesktopEntryResolver {
    dirs: Vec<PathBuf>,
    cache: RefCell<HashMap<String, Option<String>>>,
}

impl DesktopEntryResolver {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self {
            dirs,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// `$XDG_DATA_HOME/applications` followed by each
    /// `$XDG_DATA_DIRS/applications`, with the usual fallbacks.
    pub fn from_env() -> Self {
        let mut roots = Vec::new();
        match env::var_os("XDG_DATA_HOME") {
            Some(home) if !home.is_empty() => roots.push(PathBuf::from(home)),
            _ => {
                if let Some(home) = env::var_os("HOME") {
                    roots.push(PathBuf::from(home).join(".local/share"));
                }
            }
        }
        let data_dirs = env::var_os("XDG_DATA_DIRS")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "/usr/local/share:/usr/share".into());
        roots.extend(env::split_paths(&data_dirs));
        Self::new(roots.into_iter().map(|r| r.join("applications")).collect())
    }

    fn lookup(&self, app_id: &str) -> Result<String, ResolveError> {
        // Reject anything that could escape the search directories.
        if app_id.is_empty() || app_id.contains(['/', '\\']) || app_id.starts_with('.') {
            return Err(ResolveError::NotFound(app_id.to_string()));
        }
        let file_name = format!("{app_id}.desktop");
        for dir in &self.dirs {
            let path = dir.join(&file_name);
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            };
            return parse_desktop_name(&contents).ok_or(ResolveError::MissingName { path });
        }
        Err(ResolveError::NotFound(app_id.to_string()))
    }
}

impl AppLabelResolver for DesktopEntryResolver {
    fn resolve(&self, app_id: &str) -> Result<String, ResolveError> {
        if let Some(cached) = self.cache.borrow().get(app_id) {
            return cached
                .clone()
                .ok_or_else(|| ResolveError::NotFound(app_id.to_string()));
        }
        let result = self.lookup(app_id);
        self.cache
            .borrow_mut()
            .insert(app_id.to_string(), result.as_ref().ok().cloned());
        result
    }
}

fn parse_desktop_name(contents: &str) -> Option<String> {
    let mut in_entry = false;
    for line in contents.lines().map(str::trim) {
        if line.starts_with('[') {
            in_entry = line == "[Desktop Entry]";
            continue;
        }
        if in_entry
            && let Some(value) = line.strip_prefix("Name=")
            && !value.trim().is_empty()
        {
            return Some(value.trim().to_string());
        }
    }
    None
}
