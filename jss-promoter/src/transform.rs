//! Manifest-driven document rewriting.
//!
//! Every document goes through two independent passes: the global manifest,
//! then the manifest of its resource type when one exists. Inside a pass the
//! steps run in a fixed order:
//!
//! 1. `exclude` removes elements,
//! 2. `override` sets element text, creating missing elements,
//! 3. `inject` does the same for data the source never carries,
//! 4. `collections` strips member ids.
//!
//! A value assigned to a path the same pass excludes (or to anything beneath
//! it) is skipped, so an exclusion always wins within its manifest. Because
//! the type pass runs second, a type manifest can still exclude something a
//! global override just wrote.

use std::collections::BTreeMap;

use tracing::{debug, info};
use xml_tree_core::path::{ensure, remove, strip_child_ids};
use xml_tree_core::{parse, ElementPath, ParseError, XmlNode};

use crate::manifest::{Manifest, RuleSet};
use crate::resource::ResourceType;

/// Applies a [`RuleSet`] to fetched documents.
///
/// The rule set is fixed for the lifetime of the transformer.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    rules: RuleSet,
}

impl Transformer {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Parse `raw` and rewrite it for `kind`.
    pub fn transform(&self, raw: &str, kind: ResourceType) -> Result<XmlNode, ParseError> {
        let mut document = parse(raw)?;
        self.apply(&mut document, kind);
        Ok(document)
    }

    /// Rewrite an already parsed document in place.
    pub fn apply(&self, document: &mut XmlNode, kind: ResourceType) {
        apply_manifest(document, &self.rules.global, "global");
        match self.rules.manifest_for(kind) {
            Some(manifest) => apply_manifest(document, manifest, kind.name()),
            None => info!(resource = %kind, "no manifest for resource type; global rules only"),
        }
    }
}

fn apply_manifest(document: &mut XmlNode, manifest: &Manifest, scope: &str) {
    for path in &manifest.exclude {
        if remove(document, path) {
            debug!(manifest = scope, path = %path, "removed element");
        } else {
            debug!(manifest = scope, path = %path, "element to exclude not found");
        }
    }

    assign_values(document, manifest, &manifest.overrides, scope);
    assign_values(document, manifest, &manifest.inject, scope);

    for path in &manifest.collections {
        match strip_child_ids(document, path) {
            Some(removed) => {
                debug!(manifest = scope, path = %path, removed, "stripped member ids")
            }
            None => debug!(manifest = scope, path = %path, "collection not found"),
        }
    }
}

fn assign_values(
    document: &mut XmlNode,
    manifest: &Manifest,
    values: &BTreeMap<ElementPath, String>,
    scope: &str,
) {
    for (path, value) in values {
        if manifest.excludes(path) {
            debug!(manifest = scope, path = %path, "skipping assignment to excluded element");
            continue;
        }
        ensure(document, path).set_text(value.as_str());
        debug!(manifest = scope, path = %path, "assigned element value");
    }
}
