// File: duidui-core/src/repositories/csv/mod.rs
pub mod cdk;
pub mod login_state;
pub mod redeem_log;
pub mod tier;
pub mod user;

pub use cdk::CsvCdkRepository;
pub use login_state::CsvLoginStateRepository;
pub use redeem_log::CsvRedeemLogRepository;
pub use tier::CsvTierRepository;
pub use user::CsvUserRepository;
