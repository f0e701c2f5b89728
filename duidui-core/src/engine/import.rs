use std::collections::HashSet;

use chrono::{DateTime, Utc};
use duidui_common::models::{Cdk, ImportResult};
use tracing::debug;

use crate::store::Rows;
use crate::{Error, codec};

/// Appends every new code in `raw_codes` to `rows` as an available CDK of
/// `tier_id`.
///
/// Codes are trimmed; blank entries are skipped and counted nowhere. A code
/// whose plaintext is already in the table (any tier, any status) or earlier
/// in the same batch is reported in `failed_codes`.
pub fn apply_import(
    rows: &mut Rows<Cdk>,
    tier_id: i64,
    raw_codes: &[String],
    now: DateTime<Utc>,
) -> Result<ImportResult, Error> {
    if raw_codes.is_empty() {
        return Err(Error::Validation("code list must not be empty".into()));
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(rows.len() + raw_codes.len());
    for cdk in rows.iter() {
        match codec::decode(&cdk.code) {
            Ok(plain) => {
                seen.insert(plain);
            }
            Err(e) => debug!("CDK {} has an undecodable code, not used for dedup: {}", cdk.id, e),
        }
    }

    let mut result = ImportResult::default();
    for raw in raw_codes {
        let code = raw.trim();
        if code.is_empty() {
            continue;
        }
        if !seen.insert(code.to_string()) {
            result.failed_count += 1;
            result.failed_codes.push(code.to_string());
            continue;
        }

        let id = rows.next_id();
        rows.push(Cdk::new_available(id, tier_id, codec::encode(code), now));
        result.success_count += 1;
    }

    Ok(result)
}
