// File: duidui-common/src/models/mod.rs
pub mod tier;
pub mod cdk;
pub mod redeem_log;
pub mod user;
pub mod login_state;

pub use tier::{Tier, TierDraft};
pub use cdk::{Cdk, CdkFilter, CdkStatus, ImportResult};
pub use redeem_log::{RedeemLog, RedeemOutcome, RedemptionView};
pub use user::{User, UserProfile};
pub use login_state::LoginState;
