//! Resolution of the active nbconfig directory.
//!
//! An environment-wide installation can ship default extension activations in
//! its nbconfig directory. On construction the resolver folds the user's
//! `load_extensions` maps for the frontend sections into the environment
//! layer, falls back to the user directory when the environment is read-only,
//! and then picks the one directory all later reads and writes go to.
//!
//! Selection:
//! - environment dir missing: user dir, nothing merged
//! - user dir missing, or merging suppressed: environment dir, nothing merged
//! - otherwise: merge every section, environment dir unless any write fell back

use crate::error::StoreResult;
use crate::merge::merge_activation_maps;
use crate::paths::ConfigDirs;
use crate::store::{Document, DocumentStore, JsonFileStore};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

/// Sections merged from the user layer, in processing order.
pub const SECTIONS: [&str; 3] = ["notebook", "tree", "editor"];

/// Key holding the extension activation map inside a section document.
pub const ACTIVATION_KEY: &str = "load_extensions";

/// Which of the two directories is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedLayer {
    User,
    Environment,
}

impl std::fmt::Display for ResolvedLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedLayer::User => write!(f, "user"),
            ResolvedLayer::Environment => write!(f, "environment"),
        }
    }
}

/// Why the merge pass did or did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerReason {
    /// No environment directory; the user directory is used as-is.
    EnvironmentMissing,
    /// No user directory to merge from.
    UserMissing,
    /// Merging disabled by the caller.
    MergeSuppressed,
    /// The merge pass ran.
    Merged,
}

/// What happened to one section during the merge pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionOutcome {
    /// The user document had no activation map; nothing was written.
    Unchanged,
    /// The merged document was written to the environment directory.
    MergedIntoEnvironment,
    /// The environment directory was not writable; the merged map went to the user directory.
    FellBackToUser,
}

/// Summary of the work done at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub layer: ResolvedLayer,
    pub reason: LayerReason,
    /// Per-section outcomes in [`SECTIONS`] order; empty unless the merge pass ran.
    pub sections: Vec<(String, SectionOutcome)>,
}

impl Resolution {
    fn unmerged(layer: ResolvedLayer, reason: LayerReason) -> Self {
        Self {
            layer,
            reason,
            sections: Vec::new(),
        }
    }

    /// Outcome for `section`, if the merge pass visited it.
    pub fn outcome(&self, section: &str) -> Option<SectionOutcome> {
        self.sections
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, outcome)| *outcome)
    }
}

/// Result of merging one section's user document into its environment document.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionMerge {
    /// Environment document with the merged activation map in place.
    pub environment: Document,
    /// The merged activation map on its own.
    pub extensions: Map<String, Value>,
}

/// The user's activation map, if the document has one.
///
/// A non-object value under [`ACTIVATION_KEY`] is not an activation map.
pub fn activation_map(document: &Document) -> Option<&Map<String, Value>> {
    document.get(ACTIVATION_KEY).and_then(Value::as_object)
}

/// Merge the user's activation map into the environment document.
///
/// Returns `None` when the user document has no activation map, in which
/// case the environment document must not be written.
pub fn merge_section(user: &Document, mut environment: Document) -> Option<SectionMerge> {
    let user_extensions = activation_map(user)?;
    let extensions = match activation_map(&environment) {
        Some(env_extensions) => merge_activation_maps(env_extensions, user_extensions),
        None => user_extensions.clone(),
    };
    environment.insert(
        ACTIVATION_KEY.to_string(),
        Value::Object(extensions.clone()),
    );
    Some(SectionMerge {
        environment,
        extensions,
    })
}

/// Config manager that resolves between a user and an environment directory.
///
/// After construction it behaves as a [`DocumentStore`] for the active
/// directory only.
#[derive(Debug)]
pub struct ConfigResolver<S = JsonFileStore> {
    user: S,
    environment: S,
    suppress_user_merge: bool,
    resolution: Resolution,
}

impl ConfigResolver<JsonFileStore> {
    /// Resolve between two on-disk nbconfig directories.
    pub fn new(dirs: ConfigDirs, suppress_user_merge: bool) -> StoreResult<Self> {
        Self::with_stores(
            JsonFileStore::new(dirs.user_dir),
            JsonFileStore::new(dirs.environment_dir),
            suppress_user_merge,
        )
    }
}

impl<S: DocumentStore> ConfigResolver<S> {
    /// Resolve between two stores. Runs the merge pass when eligible.
    ///
    /// Any store error other than a permission failure on the environment
    /// write aborts construction.
    pub fn with_stores(user: S, environment: S, suppress_user_merge: bool) -> StoreResult<Self> {
        let resolution = if !environment.exists() {
            Resolution::unmerged(ResolvedLayer::User, LayerReason::EnvironmentMissing)
        } else if suppress_user_merge {
            Resolution::unmerged(ResolvedLayer::Environment, LayerReason::MergeSuppressed)
        } else if !user.exists() {
            Resolution::unmerged(ResolvedLayer::Environment, LayerReason::UserMissing)
        } else {
            merge_pass(&user, &environment)?
        };

        let resolver = Self {
            user,
            environment,
            suppress_user_merge,
            resolution,
        };
        info!(
            layer = %resolver.resolution.layer,
            reason = ?resolver.resolution.reason,
            dir = %resolver.active_config_dir().display(),
            "Resolved nbconfig directory"
        );
        Ok(resolver)
    }

    /// Directory all subsequent reads and writes target.
    pub fn active_config_dir(&self) -> &Path {
        self.active_store().config_dir()
    }

    pub fn active_layer(&self) -> ResolvedLayer {
        self.resolution.layer
    }

    pub fn user_config_dir(&self) -> &Path {
        self.user.config_dir()
    }

    pub fn environment_config_dir(&self) -> &Path {
        self.environment.config_dir()
    }

    pub fn suppress_user_merge(&self) -> bool {
        self.suppress_user_merge
    }

    /// What construction did.
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    fn active_store(&self) -> &S {
        match self.resolution.layer {
            ResolvedLayer::User => &self.user,
            ResolvedLayer::Environment => &self.environment,
        }
    }
}

impl<S: DocumentStore> DocumentStore for ConfigResolver<S> {
    fn config_dir(&self) -> &Path {
        self.active_config_dir()
    }

    fn get(&self, section: &str) -> StoreResult<Document> {
        self.active_store().get(section)
    }

    fn update(&self, section: &str, document: Document) -> StoreResult<Document> {
        self.active_store().update(section, document)
    }

    fn set(&self, section: &str, document: &Document) -> StoreResult<()> {
        self.active_store().set(section, document)
    }
}

/// Merge every section in [`SECTIONS`] and decide the authoritative layer.
fn merge_pass<S: DocumentStore>(user: &S, environment: &S) -> StoreResult<Resolution> {
    let mut layer = ResolvedLayer::Environment;
    let mut sections = Vec::with_capacity(SECTIONS.len());

    for section in SECTIONS {
        let outcome = merge_one(user, environment, section)?;
        if outcome == SectionOutcome::FellBackToUser {
            layer = ResolvedLayer::User;
        }
        sections.push((section.to_string(), outcome));
    }

    Ok(Resolution {
        layer,
        reason: LayerReason::Merged,
        sections,
    })
}

fn merge_one<S: DocumentStore>(
    user: &S,
    environment: &S,
    section: &str,
) -> StoreResult<SectionOutcome> {
    let mut user_doc = user.get(section)?;
    let env_doc = environment.get(section)?;

    let Some(merged) = merge_section(&user_doc, env_doc) else {
        debug!(section = %section, "No user activation map; section left untouched");
        return Ok(SectionOutcome::Unchanged);
    };

    match environment.update(section, merged.environment) {
        Ok(_) => {
            debug!(
                section = %section,
                extensions = merged.extensions.len(),
                "Merged user extensions into environment config"
            );
            Ok(SectionOutcome::MergedIntoEnvironment)
        }
        Err(e) if e.is_permission_denied() => {
            warn!(
                section = %section,
                error = %e,
                user_dir = %user.config_dir().display(),
                "Environment config is not writable; saving merged extensions to user config"
            );
            user_doc.insert(ACTIVATION_KEY.to_string(), Value::Object(merged.extensions));
            user.set(section, &user_doc)?;
            Ok(SectionOutcome::FellBackToUser)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_merge_section_union_user_wins() {
        let user = doc(json!({"load_extensions": {"b": true, "c": true}}));
        let env = doc(json!({"load_extensions": {"a": true, "b": false}}));
        let merged = merge_section(&user, env).unwrap();
        assert_eq!(
            Value::Object(merged.extensions),
            json!({"a": true, "b": true, "c": true})
        );
    }

    #[test]
    fn test_merge_section_adopts_user_map_when_env_has_none() {
        let user = doc(json!({"load_extensions": {"foo": true}}));
        let env = doc(json!({"Notebook": {"autosave": 120}}));
        let merged = merge_section(&user, env).unwrap();
        assert_eq!(
            Value::Object(merged.environment),
            json!({"Notebook": {"autosave": 120}, "load_extensions": {"foo": true}})
        );
    }

    #[test]
    fn test_merge_section_without_user_map_is_none() {
        let user = doc(json!({"other": 1}));
        let env = doc(json!({"load_extensions": {"a": true}}));
        assert!(merge_section(&user, env).is_none());
    }

    #[test]
    fn test_non_object_user_value_is_not_a_map() {
        let user = doc(json!({"load_extensions": true}));
        assert!(merge_section(&user, Document::new()).is_none());
    }

    #[test]
    fn test_non_object_env_value_is_replaced() {
        let user = doc(json!({"load_extensions": {"a": true}}));
        let env = doc(json!({"load_extensions": "bogus"}));
        let merged = merge_section(&user, env).unwrap();
        assert_eq!(
            Value::Object(merged.environment),
            json!({"load_extensions": {"a": true}})
        );
    }

    #[test]
    fn test_merge_section_is_deterministic() {
        let user = doc(json!({"load_extensions": {"x": false}}));
        let env = doc(json!({"load_extensions": {"x": true, "y": true}}));
        let first = merge_section(&user, env.clone()).unwrap();
        let second = merge_section(&user, env).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolution_outcome_lookup() {
        let resolution = Resolution {
            layer: ResolvedLayer::Environment,
            reason: LayerReason::Merged,
            sections: vec![("tree".to_string(), SectionOutcome::Unchanged)],
        };
        assert_eq!(resolution.outcome("tree"), Some(SectionOutcome::Unchanged));
        assert_eq!(resolution.outcome("notebook"), None);
    }
}
