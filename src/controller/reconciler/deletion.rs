//! # Deletion
//!
//! Acts on a resource whose conditions all held.

use crate::api::GroupVersionResource;
use crate::cluster::{ResourceClient, ResourceDocument};
use crate::controller::reconciler::types::{ReconcilerError, ResourceOutcome};
use tracing::{error, info};

/// Delete `resource`, or only log it in dry-run mode
///
/// Failures are logged and reported; they are not retried within the cycle.
pub async fn delete_resource(
    client: &dyn ResourceClient,
    gvr: &GroupVersionResource,
    resource: &ResourceDocument,
    dry_run: bool,
) -> ResourceOutcome {
    if dry_run {
        info!(
            gvr = %gvr,
            resource.name = %resource.name(),
            resource.namespace = %resource.namespace(),
            "dry-run: resource meets the conditions and would be deleted"
        );
        return ResourceOutcome::DryRun;
    }

    match client
        .delete(gvr, resource.namespace(), resource.name())
        .await
    {
        Ok(()) => {
            info!(
                gvr = %gvr,
                resource.name = %resource.name(),
                resource.namespace = %resource.namespace(),
                "resource deleted"
            );
            ResourceOutcome::Deleted
        }
        Err(e) => {
            let err = ReconcilerError::Delete(e);
            error!(
                gvr = %gvr,
                resource.name = %resource.name(),
                resource.namespace = %resource.namespace(),
                "{}",
                err
            );
            ResourceOutcome::DeleteFailed(err)
        }
    }
}
