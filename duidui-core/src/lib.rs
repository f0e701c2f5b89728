// src/lib.rs

pub mod auth;
pub mod codec;
pub mod db;
pub mod engine;
pub mod repositories;
pub mod services;
pub mod store;
pub mod test_utils;

pub use db::Database;
pub use duidui_common::error::Error;
