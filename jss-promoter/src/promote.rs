//! Batch orchestration: emptying a target server and promoting every object
//! from a source server to it.
//!
//! Both passes are strictly sequential. Resource types are handled one at a
//! time in dependency order ([`MIGRATE_ORDER`] for creation, its reverse for
//! deletion) and objects within a type one at a time, so an object is never
//! created before anything it can reference.
//!
//! ## Failure policy
//!
//! - A delete that fails during [`clean`] is logged and the pass continues.
//! - A source object that is not valid XML is logged and skipped.
//! - A create rejected with a conflict is logged and skipped.
//! - Any other API failure stops the run and names the object involved.

use thiserror::Error;
use tracing::{debug, info, warn};
use xml_tree_core::{write_string, WriteError};

use crate::api::{ApiError, ResourceApi};
use crate::identifier::Identifier;
use crate::resource::{clean_order, ResourceType, MIGRATE_ORDER};
use crate::transform::Transformer;

/// A failure that stopped a clean or migrate run.
#[derive(Debug, Error)]
pub enum PromoteError {
    #[error("listing {resource} failed: {source}")]
    List {
        resource: ResourceType,
        source: ApiError,
    },
    #[error("fetching {resource} {identifier} failed: {source}")]
    Fetch {
        resource: ResourceType,
        identifier: Identifier,
        source: ApiError,
    },
    #[error("creating {resource} from source object {identifier} failed: {source}")]
    Create {
        resource: ResourceType,
        identifier: Identifier,
        source: ApiError,
    },
    #[error("serializing {resource} {identifier} failed: {source}")]
    Write {
        resource: ResourceType,
        identifier: Identifier,
        source: WriteError,
    },
}

/// Delete every object of every resource type from `target`.
///
/// Best effort: individual delete failures are logged and skipped. Listing
/// failures stop the run.
pub fn clean<T>(target: &mut T) -> Result<(), PromoteError>
where
    T: ResourceApi + ?Sized,
{
    for kind in clean_order() {
        info!(resource = %kind, "removing all objects");
        let ids = target
            .list(kind)
            .map_err(|source| PromoteError::List {
                resource: kind,
                source,
            })?;

        for id in ids {
            match target.delete(kind, &id) {
                Ok(_) => debug!(resource = %kind, identifier = %id, "deleted object"),
                Err(err) => warn!(
                    resource = %kind,
                    identifier = %id,
                    error = %err,
                    "failed to delete object; continuing"
                ),
            }
        }
    }
    Ok(())
}

/// Copy every object from `source` to `target`, rewriting each through
/// `transformer`.
pub fn migrate<S, T>(
    source: &mut S,
    target: &mut T,
    transformer: &Transformer,
) -> Result<(), PromoteError>
where
    S: ResourceApi + ?Sized,
    T: ResourceApi + ?Sized,
{
    for kind in MIGRATE_ORDER {
        migrate_resource(source, target, transformer, kind)?;
    }
    Ok(())
}

fn migrate_resource<S, T>(
    source: &mut S,
    target: &mut T,
    transformer: &Transformer,
    kind: ResourceType,
) -> Result<(), PromoteError>
where
    S: ResourceApi + ?Sized,
    T: ResourceApi + ?Sized,
{
    info!(resource = %kind, "promoting resource");
    let ids = source.list(kind).map_err(|err| PromoteError::List {
        resource: kind,
        source: err,
    })?;

    let mut created = 0usize;
    let mut skipped = 0usize;
    for id in ids {
        let raw = source
            .get(kind, &id)
            .map_err(|err| PromoteError::Fetch {
                resource: kind,
                identifier: id.clone(),
                source: err,
            })?;

        let document = match transformer.transform(&raw, kind) {
            Ok(document) => document,
            Err(err) => {
                warn!(
                    resource = %kind,
                    identifier = %id,
                    error = %err,
                    "source object is not valid XML; not promoted"
                );
                skipped += 1;
                continue;
            }
        };

        let payload = write_string(&document).map_err(|err| PromoteError::Write {
            resource: kind,
            identifier: id.clone(),
            source: err,
        })?;

        match target.create(kind, &payload) {
            Ok(new_id) => {
                created += 1;
                debug!(
                    resource = %kind,
                    identifier = %id,
                    target_id = ?new_id,
                    "created object"
                );
            }
            Err(err) if err.is_conflict() => {
                skipped += 1;
                warn!(
                    resource = %kind,
                    identifier = %id,
                    error = %err,
                    "object already exists on target; not promoted"
                );
            }
            Err(err) => {
                return Err(PromoteError::Create {
                    resource: kind,
                    identifier: id,
                    source: err,
                })
            }
        }
    }

    info!(resource = %kind, created, skipped, "finished resource");
    Ok(())
}
