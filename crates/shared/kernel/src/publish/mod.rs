//! Operator-triggered resource publishing.
//!
//! Modules declare tagged `source -> destination` groups while booting. Nothing
//! is copied until an operator asks for a tag through [`Publisher`].

mod error;

pub use error::{PublishError, PublishErrorExt};

use hzn_domain::PublishGroup;
use parking_lot::RwLock;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
struct Declaration {
    provider: String,
    group: PublishGroup,
}

/// Every publish group declared by every provider, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct PublishRegistry {
    declarations: Arc<RwLock<Vec<Declaration>>>,
}

impl PublishRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a group. Destinations already claimed by another tag are
    /// logged; which copy lands is settled at publish time.
    pub fn declare(&self, provider: &str, group: PublishGroup) {
        let mut declarations = self.declarations.write();

        for destination in group.paths.values() {
            let owner = declarations
                .iter()
                .filter(|d| d.group.tag != group.tag)
                .find(|d| d.group.paths.values().any(|p| p == destination));
            if let Some(owner) = owner {
                warn!(
                    destination = %destination.display(),
                    tag = %group.tag,
                    claimed_by = %owner.group.tag,
                    "Publish destination declared by more than one tag"
                );
            }
        }

        debug!(provider, tag = %group.tag, paths = group.paths.len(), "Publish group declared");
        declarations.push(Declaration { provider: provider.to_owned(), group });
    }

    /// Tags in first-declaration order.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for d in self.declarations.read().iter() {
            if !tags.contains(&d.group.tag) {
                tags.push(d.group.tag.clone());
            }
        }
        tags
    }

    /// Providers that declared anything, in first-declaration order.
    #[must_use]
    pub fn providers(&self) -> Vec<String> {
        let mut providers: Vec<String> = Vec::new();
        for d in self.declarations.read().iter() {
            if !providers.contains(&d.provider) {
                providers.push(d.provider.clone());
            }
        }
        providers
    }

    /// Every pair declared under `tag`, in declaration order.
    #[must_use]
    pub fn paths_for(&self, tag: &str) -> Option<Vec<(PathBuf, PathBuf)>> {
        let pairs: Vec<(PathBuf, PathBuf)> = self
            .declarations
            .read()
            .iter()
            .filter(|d| d.group.tag == tag)
            .flat_map(|d| d.group.paths.iter().map(|(s, t)| (s.clone(), t.clone())))
            .collect();
        (!pairs.is_empty()).then_some(pairs)
    }

    /// Every pair declared by `provider`, in declaration order.
    #[must_use]
    pub fn paths_for_provider(&self, provider: &str) -> Vec<(PathBuf, PathBuf)> {
        self.declarations
            .read()
            .iter()
            .filter(|d| d.provider == provider)
            .flat_map(|d| d.group.paths.iter().map(|(s, t)| (s.clone(), t.clone())))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.read().is_empty()
    }
}

/// What a publish run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    /// Files written.
    pub copied: Vec<PathBuf>,
    /// Files left alone because they already existed.
    pub skipped: Vec<PathBuf>,
    /// Sources not copied because a later declaration targets the same destination.
    pub overridden: Vec<PathBuf>,
}

impl PublishReport {
    fn absorb(&mut self, other: Self) {
        self.copied.extend(other.copied);
        self.skipped.extend(other.skipped);
        self.overridden.extend(other.overridden);
    }
}

/// Copies declared groups to their destinations.
#[derive(Debug, Clone)]
pub struct Publisher {
    registry: PublishRegistry,
    force: bool,
}

impl Publisher {
    #[must_use]
    pub const fn new(registry: PublishRegistry) -> Self {
        Self { registry, force: false }
    }

    /// Overwrite files that already exist.
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Publishes one tag.
    ///
    /// # Errors
    /// Fails for an unknown tag, a missing source, or an I/O failure. Sources
    /// are checked before anything is written.
    pub fn publish(&self, tag: &str) -> Result<PublishReport, PublishError> {
        let pairs = self.registry.paths_for(tag).ok_or_else(|| PublishError::TagNotFound {
            message: tag.to_owned().into(),
            context: None,
        })?;

        let report = self.copy_pairs(pairs)?;
        info!(tag, copied = report.copied.len(), skipped = report.skipped.len(), "Published");
        Ok(report)
    }

    /// Publishes every tag together. When two pairs share a destination the
    /// later declaration wins and the earlier source is reported as overridden.
    ///
    /// # Errors
    /// Same as [`Self::publish`].
    pub fn publish_all(&self) -> Result<PublishReport, PublishError> {
        let pairs: Vec<(PathBuf, PathBuf)> =
            self.registry.tags().iter().filter_map(|t| self.registry.paths_for(t)).flatten().collect();
        self.copy_pairs(pairs)
    }

    /// Publishes everything one provider declared.
    ///
    /// # Errors
    /// Same as [`Self::publish`].
    pub fn publish_provider(&self, provider: &str) -> Result<PublishReport, PublishError> {
        self.copy_pairs(self.registry.paths_for_provider(provider))
    }

    fn copy_pairs(&self, pairs: Vec<(PathBuf, PathBuf)>) -> Result<PublishReport, PublishError> {
        let mut report = PublishReport::default();

        let mut effective: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(pairs.len());
        for (source, destination) in pairs {
            if let Some(pos) = effective.iter().position(|(_, d)| *d == destination) {
                let (shadowed, _) = effective.remove(pos);
                report.overridden.push(shadowed);
            }
            effective.push((source, destination));
        }

        if let Some((missing, _)) = effective.iter().find(|(s, _)| !s.exists()) {
            return Err(PublishError::MissingSource {
                message: missing.display().to_string().into(),
                context: None,
            });
        }

        for (source, destination) in &effective {
            let part = if source.is_dir() {
                self.copy_dir(source, destination)?
            } else {
                self.copy_file(source, destination)?
            };
            report.absorb(part);
        }

        Ok(report)
    }

    fn copy_dir(&self, source: &Path, destination: &Path) -> Result<PublishReport, PublishError> {
        let mut report = PublishReport::default();

        for entry in WalkDir::new(source).sort_by_file_name() {
            let entry = entry.context("Failed to walk publish source")?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(source).map_err(|_| PublishError::MissingSource {
                message: entry.path().display().to_string().into(),
                context: Some("outside publish source".into()),
            })?;
            report.absorb(self.copy_file(entry.path(), &destination.join(relative))?);
        }

        Ok(report)
    }

    fn copy_file(&self, source: &Path, destination: &Path) -> Result<PublishReport, PublishError> {
        let mut report = PublishReport::default();

        if destination.exists() && !self.force {
            debug!(destination = %destination.display(), "Publish target exists, skipping");
            report.skipped.push(destination.to_path_buf());
            return Ok(report);
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).context("Failed to create publish directory")?;
        }
        fs::copy(source, destination).context("Failed to copy published file")?;
        report.copied.push(destination.to_path_buf());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unknown_tag_is_reported() {
        let publisher = Publisher::new(PublishRegistry::new());
        let err = publisher.publish("nonexistent-tag").unwrap_err();
        assert!(matches!(err, PublishError::TagNotFound { .. }));
    }

    #[test]
    fn missing_sources_abort_before_writing() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("present.txt");
        fs::write(&present, "x").unwrap();

        let registry = PublishRegistry::new();
        registry.declare(
            "demo",
            PublishGroup::new(
                "demo",
                [(present, dir.path().join("out/a.txt")), (dir.path().join("absent"), dir.path().join("out/b"))],
            ),
        );

        let err = Publisher::new(registry).publish("demo").unwrap_err();
        assert_eq!(err.kind(), "MissingSource");
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn later_declarations_win_shared_destinations() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        let target = dir.path().join("out/shared.txt");
        fs::write(&first, "first").unwrap();
        fs::write(&second, "second").unwrap();

        let registry = PublishRegistry::new();
        registry.declare("a", PublishGroup::new("a", [(first.clone(), target.clone())]));
        registry.declare("b", PublishGroup::new("b", [(second, target.clone())]));

        let report = Publisher::new(registry.clone()).publish_all().unwrap();
        assert_eq!(report.overridden, vec![first]);
        assert_eq!(fs::read_to_string(&target).unwrap(), "second");

        fs::remove_file(&target).unwrap();
        Publisher::new(registry).publish("a").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "first", "single tags touch only their pairs");
    }
}
