//! Registry implementation

use crate::core::models::{DependencyLink, ExternalDependency};
use crate::utils::error::{DiagnosticsError, Result};
use dashmap::DashMap;
use tracing::{debug, info};

/// Thread-safe dependency registry.
///
/// Registration is an upsert by id: the last write wins.
#[derive(Debug, Default)]
pub struct DependencyRegistry {
    dependencies: DashMap<String, ExternalDependency>,
    links: DashMap<(String, String), DependencyLink>,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a dependency
    pub fn register(&self, dependency: ExternalDependency) -> Result<()> {
        if dependency.id.trim().is_empty() {
            return Err(DiagnosticsError::validation(
                "dependency id cannot be empty",
            ));
        }

        let id = dependency.id.clone();
        let dependency_type = dependency.dependency_type;
        match self.dependencies.insert(id.clone(), dependency) {
            Some(_) => debug!(dependency = %id, "Replaced dependency"),
            None => info!(dependency = %id, kind = %dependency_type, "Registered new dependency"),
        }
        Ok(())
    }

    /// Remove a dependency together with its links
    pub fn remove(&self, id: &str) -> Option<ExternalDependency> {
        let removed = self.dependencies.remove(id).map(|(_, dep)| dep);
        if removed.is_some() {
            self.links
                .retain(|(source, target), _| source != id && target != id);
            debug!(dependency = %id, "Removed dependency");
        }
        removed
    }

    pub fn clear(&self) {
        self.dependencies.clear();
        self.links.clear();
        info!("Cleared dependency registry");
    }

    pub fn get(&self, id: &str) -> Option<ExternalDependency> {
        self.dependencies.get(id).map(|d| d.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dependencies.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Snapshot of all dependencies, ordered by id
    pub fn snapshot(&self) -> Vec<ExternalDependency> {
        let mut deps: Vec<ExternalDependency> =
            self.dependencies.iter().map(|d| d.value().clone()).collect();
        deps.sort_by(|a, b| a.id.cmp(&b.id));
        deps
    }

    /// Record that `link.source` calls `link.target`; replaces an existing link
    pub fn register_link(&self, link: DependencyLink) -> Result<()> {
        if link.source.trim().is_empty() || link.target.trim().is_empty() {
            return Err(DiagnosticsError::validation(
                "dependency link endpoints cannot be empty",
            ));
        }

        debug!(source = %link.source, target = %link.target, "Registered dependency link");
        self.links
            .insert((link.source.clone(), link.target.clone()), link);
        Ok(())
    }

    pub fn remove_link(&self, source: &str, target: &str) -> Option<DependencyLink> {
        self.links
            .remove(&(source.to_string(), target.to_string()))
            .map(|(_, link)| link)
    }

    /// Snapshot of all links, ordered by (source, target)
    pub fn links(&self) -> Vec<DependencyLink> {
        let mut links: Vec<DependencyLink> =
            self.links.iter().map(|l| l.value().clone()).collect();
        links.sort_by(|a, b| (&a.source, &a.target).cmp(&(&b.source, &b.target)));
        links
    }
}
