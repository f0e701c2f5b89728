use std::collections::HashMap;

use duidui_common::models::{Cdk, CdkStatus};

/// Number of available CDKs in `tier_id`.
pub fn count_available(rows: &[Cdk], tier_id: i64) -> i64 {
    rows.iter().filter(|c| c.is_available_in(tier_id)).count() as i64
}

/// Available CDKs per tier in one pass. Tiers with no available codes are
/// absent from the map.
pub fn available_by_tier(rows: &[Cdk]) -> HashMap<i64, i64> {
    let mut counts = HashMap::new();
    for cdk in rows.iter().filter(|c| c.status == CdkStatus::Available) {
        *counts.entry(cdk.tier_id).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_counts_only_available_rows_of_tier() {
        let now = Utc::now();
        let mut rows: Vec<Cdk> = (1..=5)
            .map(|id| Cdk::new_available(id, if id <= 3 { 1 } else { 2 }, format!("c{id}"), now))
            .collect();
        rows[0].status = CdkStatus::Redeemed;
        rows[1].status = CdkStatus::Revoked;
        rows[3].status = CdkStatus::Locked;

        assert_eq!(count_available(&rows, 1), 1);
        assert_eq!(count_available(&rows, 2), 1);
        assert_eq!(count_available(&rows, 9), 0);

        let by_tier = available_by_tier(&rows);
        assert_eq!(by_tier.get(&1), Some(&1));
        assert_eq!(by_tier.get(&2), Some(&1));
        assert_eq!(by_tier.get(&9), None);
    }
}
