use chrono::{DateTime, Utc};
use duidui_common::models::{Cdk, CdkStatus};

use crate::Error;
use crate::store::Rows;

/// Moves CDK `cdk_id` to `Revoked`.
///
/// Revoking an already revoked code succeeds and re-stamps `updated_at`.
pub fn apply_revoke(rows: &mut Rows<Cdk>, cdk_id: i64, now: DateTime<Utc>) -> Result<Cdk, Error> {
    let cdk = rows
        .iter_mut()
        .find(|c| c.id == cdk_id)
        .ok_or_else(|| Error::NotFound(format!("CDK {cdk_id} does not exist")))?;

    if !cdk.status.can_transition_to(CdkStatus::Revoked) {
        return Err(Error::Conflict(format!(
            "cannot revoke CDK {cdk_id}: code is already {}",
            cdk.status
        )));
    }

    cdk.status = CdkStatus::Revoked;
    cdk.updated_at = now;
    Ok(cdk.clone())
}
