//! Decision logic for the CDK table.
//!
//! These functions operate on rows that the caller already holds under the
//! table lock (see [`crate::store::Table::modify`]). They never touch the
//! filesystem and never await.

pub mod import;
pub mod redeem;
pub mod revoke;
pub mod stock;
