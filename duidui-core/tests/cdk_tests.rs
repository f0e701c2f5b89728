// File: duidui-core/tests/cdk_tests.rs

use duidui_common::models::{CdkFilter, CdkStatus};
use duidui_core::test_utils::helpers::*;
use duidui_core::{Error, codec};

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
}

#[tokio::test]
async fn test_import_reports_duplicates() -> Result<(), Error> {
    let (_dir, db) = setup_test_database().await?;
    let services = build_services(&db);
    let tier = seed_tier(&services, "Gold", &[]).await?;

    let first = services.cdks.import_codes(tier.id, &codes(&["X1", "X1", "X2"])).await?;
    assert_eq!(first.success_count, 2);
    assert_eq!(first.failed_count, 1);
    assert_eq!(first.failed_codes, vec!["X1".to_string()]);

    let second = services.cdks.import_codes(tier.id, &codes(&["X1"])).await?;
    assert_eq!(second.success_count, 0);
    assert_eq!(second.failed_count, 1);

    let rows = services.cdks.list_cdks(&CdkFilter::default()).await?;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|c| c.status == CdkStatus::Available));
    assert_eq!(codec::decode(&rows[0].code)?, "X1");
    assert_ne!(rows[0].code, "X1");
    Ok(())
}

#[tokio::test]
async fn test_import_trims_and_skips_blank_lines() -> Result<(), Error> {
    let (_dir, db) = setup_test_database().await?;
    let services = build_services(&db);
    let tier = seed_tier(&services, "Gold", &[]).await?;

    let result = services
        .cdks
        .import_codes(tier.id, &codes(&["  A1  ", "", "   ", "A2\n"]))
        .await?;
    assert_eq!(result.success_count, 2);
    assert_eq!(result.failed_count, 0);

    let rows = services.cdks.list_cdks(&CdkFilter::default()).await?;
    let plain: Vec<String> = rows.iter().map(|c| codec::decode(&c.code)).collect::<Result<_, _>>()?;
    assert_eq!(plain, vec!["A1".to_string(), "A2".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_import_is_rejected_for_bad_input() -> Result<(), Error> {
    let (_dir, db) = setup_test_database().await?;
    let services = build_services(&db);
    let tier = seed_tier(&services, "Gold", &[]).await?;

    let err = services.cdks.import_codes(tier.id, &[]).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = services.cdks.import_codes(tier.id + 100, &codes(&["Z1"])).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(services.cdks.list_cdks(&CdkFilter::default()).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_codes_are_unique_across_tiers() -> Result<(), Error> {
    let (_dir, db) = setup_test_database().await?;
    let services = build_services(&db);
    let gold = seed_tier(&services, "Gold", &["SHARED"]).await?;
    let silver = seed_tier(&services, "Silver", &[]).await?;

    let result = services.cdks.import_codes(silver.id, &codes(&["SHARED", "OWN"])).await?;
    assert_eq!(result.success_count, 1);
    assert_eq!(result.failed_codes, vec!["SHARED".to_string()]);

    assert_eq!(services.tiers.get_tier(gold.id).await?.stock, 1);
    assert_eq!(services.tiers.get_tier(silver.id).await?.stock, 1);
    Ok(())
}

#[tokio::test]
async fn test_revoke_rules() -> Result<(), Error> {
    let (_dir, db) = setup_test_database().await?;
    let services = build_services(&db);
    let tier = seed_tier(&services, "Gold", &["R1", "R2"]).await?;

    let redeemed = services.redeem.redeem(tier.id, 1).await?;
    let err = services.cdks.revoke_cdk(redeemed.cdk_id).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let available = services
        .cdks
        .list_cdks(&CdkFilter { tier_id: Some(tier.id), status: Some(CdkStatus::Available) })
        .await?;
    assert_eq!(available.len(), 1);
    let revoked = services.cdks.revoke_cdk(available[0].id).await?;
    assert_eq!(revoked.status, CdkStatus::Revoked);
    assert_eq!(revoked.redeemed_by, None);

    // revoking twice is still a success
    let again = services.cdks.revoke_cdk(available[0].id).await?;
    assert_eq!(again.status, CdkStatus::Revoked);

    let err = services.cdks.revoke_cdk(9999).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    // the revoked code is never handed out
    assert_eq!(services.tiers.get_tier(tier.id).await?.stock, 0);
    let err = services.redeem.redeem(tier.id, 2).await.unwrap_err();
    assert!(matches!(err, Error::Exhausted(_)));
    Ok(())
}

#[tokio::test]
async fn test_stock_ignores_stored_value() -> Result<(), Error> {
    let (_dir, db) = setup_test_database().await?;
    let services = build_services(&db);
    let tier = seed_tier(&services, "Gold", &["K1", "K2", "K3", "K4"]).await?;
    services.redeem.redeem(tier.id, 1).await?;

    db.tiers()
        .modify(|rows| {
            for t in rows.iter_mut() {
                t.stock = 999;
            }
            Ok(())
        })
        .await?;

    assert_eq!(services.tiers.get_tier(tier.id).await?.stock, 3);
    let listed = services.tiers.list_tiers().await?;
    assert_eq!(listed[0].stock, 3);
    Ok(())
}

#[tokio::test]
async fn test_tier_crud() -> Result<(), Error> {
    let (_dir, db) = setup_test_database().await?;
    let services = build_services(&db);

    let mut draft = tier_draft("  Platinum ");
    draft.quota = 50;
    draft.sort_order = 3;
    let tier = services.tiers.create_tier(&draft).await?;
    assert_eq!(tier.name, "Platinum");
    assert_eq!(tier.stock, 0);

    draft.quota = -1;
    let err = services.tiers.update_tier(tier.id, &draft).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = services.tiers.create_tier(&tier_draft("   ")).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    draft.quota = 80;
    let updated = services.tiers.update_tier(tier.id, &draft).await?;
    assert_eq!(updated.quota, 80);
    assert_eq!(updated.created_at, tier.created_at);

    let err = services.tiers.update_tier(tier.id + 1, &draft).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    services.tiers.delete_tier(tier.id).await?;
    let err = services.tiers.delete_tier(tier.id).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    // ids are not reused after the highest row is deleted
    let next = services.tiers.create_tier(&tier_draft("Next")).await?;
    assert!(next.id > tier.id);
    Ok(())
}

#[tokio::test]
async fn test_user_upsert() -> Result<(), Error> {
    use duidui_common::models::UserProfile;

    let (_dir, db) = setup_test_database().await?;
    let services = build_services(&db);

    let mut profile = UserProfile {
        external_id: 1001,
        username: "neko".into(),
        name: "Neko".into(),
        trust_level: 1,
        is_admin: false,
    };
    let created = services.users.upsert_user(&profile).await?;

    profile.trust_level = 3;
    let refreshed = services.users.upsert_user(&profile).await?;
    assert_eq!(refreshed.id, created.id);
    assert_eq!(refreshed.trust_level, 3);
    assert_eq!(refreshed.created_at, created.created_at);

    assert_eq!(services.users.get_user_by_external_id(1001).await?.id, created.id);
    assert_eq!(services.users.list_users().await?.len(), 1);

    let err = services.users.get_user(created.id + 1).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    profile.username = " ".into();
    let err = services.users.upsert_user(&profile).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    Ok(())
}
