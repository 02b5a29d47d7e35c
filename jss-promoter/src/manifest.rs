//! Per-resource-type rewrite rules.
//!
//! A [`Manifest`] lists which elements to drop (`exclude`), which to set to a
//! literal value (`override`, `inject`) and which collections lose the `id` of
//! every member (`collections`). A [`RuleSet`] pairs the global manifest, run
//! for every object, with the optional manifest of each resource type.
//!
//! Rule sets are written in TOML:
//!
//! ```toml
//! [global]
//! exclude = ["id", "general/id"]
//!
//! [global.override]
//! "location/building" = "Main Office"
//!
//! [manifest.computers]
//! exclude = ["peripherals"]
//! inject = { "general/remote_management/management_password" = "secret" }
//! collections = ["extension_attributes"]
//! ```
//!
//! Files loaded with [`load_rules`] extend the embedded defaults unless they
//! set `inherit_defaults = false`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use xml_tree_core::{ElementPath, PathError};

use crate::resource::{ResourceType, UnknownResource};

/// Rewrite rules for one resource type (or the global pass).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub exclude: Vec<ElementPath>,
    pub overrides: BTreeMap<ElementPath, String>,
    pub inject: BTreeMap<ElementPath, String>,
    pub collections: Vec<ElementPath>,
}

impl Manifest {
    /// Whether `path` lies at or below one of this manifest's exclusions.
    pub fn excludes(&self, path: &ElementPath) -> bool {
        self.exclude.iter().any(|excluded| path.starts_with(excluded))
    }

    /// Layer `other` on top of `self`; values from `other` win.
    pub fn extend(&mut self, other: Manifest) {
        push_unique(&mut self.exclude, other.exclude);
        self.overrides.extend(other.overrides);
        self.inject.extend(other.inject);
        push_unique(&mut self.collections, other.collections);
    }
}

/// Global rules plus the manifests of individual resource types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    pub global: Manifest,
    pub manifests: BTreeMap<ResourceType, Manifest>,
}

impl RuleSet {
    pub fn manifest_for(&self, kind: ResourceType) -> Option<&Manifest> {
        self.manifests.get(&kind)
    }

    /// Layer `other` on top of `self`, manifest by manifest.
    pub fn extend(&mut self, other: RuleSet) {
        self.global.extend(other.global);
        for (kind, manifest) in other.manifests {
            self.manifests.entry(kind).or_default().extend(manifest);
        }
    }
}

/// Errors returned when loading manifest files.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifests file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse manifests file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid path in {location}: {source}")]
    InvalidPath { location: String, source: PathError },
    #[error("{origin}: {source}")]
    UnknownResource {
        origin: String,
        source: UnknownResource,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default, rename = "override")]
    overrides: BTreeMap<String, String>,
    #[serde(default)]
    inject: BTreeMap<String, String>,
    #[serde(default)]
    collections: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRuleSet {
    #[serde(default = "default_inherit")]
    inherit_defaults: bool,
    #[serde(default)]
    global: RawManifest,
    #[serde(default)]
    manifest: BTreeMap<String, RawManifest>,
}

fn default_inherit() -> bool {
    true
}

/// Load a rule set from a TOML file, layered over the embedded defaults
/// unless the file opts out.
pub fn load_rules(path: &Path) -> Result<RuleSet, ManifestError> {
    let raw = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let origin = path.display().to_string();
    let parsed = parse_raw(&raw, &origin)?;

    let mut rules = if parsed.inherit_defaults {
        default_rules()?
    } else {
        RuleSet::default()
    };
    rules.extend(convert_rule_set(parsed, &origin)?);
    warn_on_overlaps(&rules);
    Ok(rules)
}

/// Built-in rules shipped with the binary.
pub fn default_rules() -> Result<RuleSet, ManifestError> {
    let embedded = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/manifests/default.toml"));
    parse_rules(embedded, "embedded manifests")
}

/// Parse a rule set from TOML text without consulting the defaults.
pub fn parse_rules(raw: &str, origin: &str) -> Result<RuleSet, ManifestError> {
    let parsed = parse_raw(raw, origin)?;
    let rules = convert_rule_set(parsed, origin)?;
    warn_on_overlaps(&rules);
    Ok(rules)
}

fn parse_raw(raw: &str, origin: &str) -> Result<RawRuleSet, ManifestError> {
    toml::from_str(raw).map_err(|source| ManifestError::Parse {
        path: origin.to_string(),
        source,
    })
}

fn convert_rule_set(raw: RawRuleSet, origin: &str) -> Result<RuleSet, ManifestError> {
    let global = convert_manifest(raw.global, &format!("{origin} [global]"))?;
    let mut manifests = BTreeMap::new();
    for (name, manifest) in raw.manifest {
        let location = format!("{origin} [manifest.{name}]");
        let kind: ResourceType = name
            .parse()
            .map_err(|source| ManifestError::UnknownResource {
                origin: location.clone(),
                source,
            })?;
        manifests.insert(kind, convert_manifest(manifest, &location)?);
    }
    Ok(RuleSet { global, manifests })
}

fn convert_manifest(raw: RawManifest, location: &str) -> Result<Manifest, ManifestError> {
    let mut manifest = Manifest::default();
    push_unique(&mut manifest.exclude, convert_paths(raw.exclude, location, "exclude")?);
    manifest.overrides = convert_values(raw.overrides, location, "override")?;
    manifest.inject = convert_values(raw.inject, location, "inject")?;
    push_unique(
        &mut manifest.collections,
        convert_paths(raw.collections, location, "collections")?,
    );
    Ok(manifest)
}

fn convert_paths(
    raw: Vec<String>,
    location: &str,
    field: &str,
) -> Result<Vec<ElementPath>, ManifestError> {
    raw.iter()
        .map(|entry| parse_path(entry, location, field))
        .collect()
}

fn convert_values(
    raw: BTreeMap<String, String>,
    location: &str,
    field: &str,
) -> Result<BTreeMap<ElementPath, String>, ManifestError> {
    raw.into_iter()
        .map(|(entry, value)| Ok((parse_path(&entry, location, field)?, value)))
        .collect()
}

fn parse_path(entry: &str, location: &str, field: &str) -> Result<ElementPath, ManifestError> {
    ElementPath::parse(entry).map_err(|source| ManifestError::InvalidPath {
        location: format!("{location} {field}"),
        source,
    })
}

fn push_unique(into: &mut Vec<ElementPath>, items: Vec<ElementPath>) {
    for item in items {
        if !into.contains(&item) {
            into.push(item);
        }
    }
}

fn warn_on_overlaps(rules: &RuleSet) {
    let scopes = std::iter::once(("global", &rules.global)).chain(
        rules
            .manifests
            .iter()
            .map(|(kind, manifest)| (kind.name(), manifest)),
    );
    for (scope, manifest) in scopes {
        for path in manifest.overrides.keys().chain(manifest.inject.keys()) {
            if manifest.excludes(path) {
                warn!(
                    manifest = scope,
                    path = %path,
                    "path is both excluded and assigned; the assignment will be skipped"
                );
            }
        }
    }
}
