pub mod csv;

pub use csv::{
    CsvCdkRepository, CsvLoginStateRepository, CsvRedeemLogRepository, CsvTierRepository,
    CsvUserRepository,
};
