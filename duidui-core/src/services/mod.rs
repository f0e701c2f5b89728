pub mod cdk_service;
pub mod login_service;
pub mod redeem_service;
pub mod stock;
pub mod tier_service;
pub mod user_service;

pub use cdk_service::CdkService;
pub use login_service::LoginService;
pub use redeem_service::RedeemService;
pub use stock::StockCalculator;
pub use tier_service::TierService;
pub use user_service::UserService;
