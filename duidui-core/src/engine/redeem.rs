use chrono::{DateTime, Utc};
use duidui_common::models::{Cdk, CdkStatus};

use crate::Error;
use crate::store::Rows;

/// Reserves the lowest-id available CDK of `tier_id` for `user_id`.
///
/// This scan is the authoritative availability check; any earlier stock
/// count is advisory. Must run under the CDK table lock together with the
/// save that persists the mutation.
pub fn reserve_first_available(
    rows: &mut Rows<Cdk>,
    tier_id: i64,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<Cdk, Error> {
    let cdk = rows
        .iter_mut()
        .filter(|c| c.is_available_in(tier_id))
        .min_by_key(|c| c.id)
        .ok_or_else(|| Error::Exhausted(format!("tier {tier_id} has no available codes")))?;

    // An available row must not carry redemption data. If it does, the
    // table is inconsistent and handing the code out could double-dispense.
    if !cdk.status.can_transition_to(CdkStatus::Redeemed)
        || cdk.redeemed_by.is_some()
        || cdk.redeemed_at.is_some()
    {
        return Err(Error::Persistence(format!(
            "invariant violated: CDK {} is {} but has redeemed_by={:?} redeemed_at={:?}",
            cdk.id, cdk.status, cdk.redeemed_by, cdk.redeemed_at
        )));
    }

    cdk.status = CdkStatus::Redeemed;
    cdk.redeemed_by = Some(user_id);
    cdk.redeemed_at = Some(now);
    cdk.updated_at = now;

    Ok(cdk.clone())
}
