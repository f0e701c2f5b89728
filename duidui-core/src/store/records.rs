// Table names and column order for every persisted model.

use duidui_common::models::{Cdk, LoginState, RedeemLog, Tier, User};

use super::Record;

impl Record for Tier {
    const TABLE: &'static str = "tier";
    const HEADER: &'static [&'static str] = &[
        "id",
        "name",
        "quota",
        "required_level",
        "daily_limit",
        "stock",
        "is_active",
        "sort_order",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for Cdk {
    const TABLE: &'static str = "cdk";
    const HEADER: &'static [&'static str] = &[
        "id",
        "tier_id",
        "code",
        "status",
        "order_id",
        "redeemed_by",
        "redeemed_at",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for RedeemLog {
    const TABLE: &'static str = "redeem_log";
    const HEADER: &'static [&'static str] = &["id", "user_id", "cdk_id", "tier_id", "created_at"];

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for User {
    const TABLE: &'static str = "user";
    const HEADER: &'static [&'static str] = &[
        "id",
        "external_id",
        "username",
        "name",
        "trust_level",
        "is_admin",
        "created_at",
        "updated_at",
    ];

    fn id(&self) -> i64 {
        self.id
    }
}

impl Record for LoginState {
    const TABLE: &'static str = "login_state";
    const HEADER: &'static [&'static str] = &["id", "state", "issued_at"];

    fn id(&self) -> i64 {
        self.id
    }
}
