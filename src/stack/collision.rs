// ABOUTME: Pre-deploy collision check against the namespace's live services.
// ABOUTME: Read-only; must run strictly before any resource is written.

use super::model::Stack;
use crate::cluster::{ExistingService, STACK_LABEL};
use std::collections::HashSet;
use thiserror::Error;

/// A pre-existing, unrelated service occupies a name this stack needs.
#[derive(Debug, Error)]
#[error(
    "service name {name:?} in namespace {namespace} is already in use by an application not managed by this stack"
)]
pub struct CollisionError {
    pub name: String,
    pub namespace: String,
}

/// Check every intended service name against what already runs in the
/// namespace. A service counts as owned when its stack label matches.
pub fn check_collision(existing: &[ExistingService], stack: &Stack) -> Result<(), CollisionError> {
    let wanted: HashSet<&str> = stack.services.iter().map(|s| s.name.as_str()).collect();

    for service in existing {
        let owned = service
            .labels
            .get(STACK_LABEL)
            .is_some_and(|owner| *owner == stack.name);
        if !owned && wanted.contains(service.name.as_str()) {
            return Err(CollisionError {
                name: service.name.clone(),
                namespace: stack.namespace.to_string(),
            });
        }
    }
    Ok(())
}
