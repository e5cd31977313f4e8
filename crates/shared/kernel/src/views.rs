//! Namespaced template locations (`horizon::layout`).

use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const EXTENSIONS: [&str; 2] = ["html", "tera"];

#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    hints: Arc<RwLock<FxHashMap<String, Vec<PathBuf>>>>,
}

impl ViewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends search paths for `namespace`. Earlier paths win on lookup.
    pub fn add_namespace<I, P>(&self, namespace: &str, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut hints = self.hints.write();
        let entry = hints.entry(namespace.to_owned()).or_default();
        for path in paths {
            let path = path.into();
            if !entry.contains(&path) {
                entry.push(path);
            }
        }
        debug!(namespace, paths = entry.len(), "View namespace registered");
    }

    #[must_use]
    pub fn paths(&self, namespace: &str) -> Vec<PathBuf> {
        self.hints.read().get(namespace).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn namespaces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.hints.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Finds the file for `namespace::dotted.name`.
    #[must_use]
    pub fn locate(&self, view: &str) -> Option<PathBuf> {
        let (namespace, name) = view.split_once("::")?;
        let relative: PathBuf = name.split('.').collect();

        self.paths(namespace).iter().find_map(|base| candidate(base, &relative))
    }
}

fn candidate(base: &Path, relative: &Path) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| base.join(relative).with_extension(ext))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn earlier_paths_win() {
        let override_dir = TempDir::new().unwrap();
        let module_dir = TempDir::new().unwrap();
        fs::write(override_dir.path().join("layout.html"), "custom").unwrap();
        fs::write(module_dir.path().join("layout.html"), "stock").unwrap();
        fs::create_dir(module_dir.path().join("partials")).unwrap();
        fs::write(module_dir.path().join("partials/nav.html"), "nav").unwrap();

        let views = ViewRegistry::new();
        views.add_namespace("horizon", [override_dir.path(), module_dir.path()]);

        assert_eq!(views.locate("horizon::layout").unwrap(), override_dir.path().join("layout.html"));
        assert_eq!(
            views.locate("horizon::partials.nav").unwrap(),
            module_dir.path().join("partials/nav.html")
        );
        assert!(views.locate("horizon::missing").is_none());
        assert!(views.locate("layout").is_none());
    }
}
