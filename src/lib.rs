//! CarDJ playlist aggregator server library.

pub mod api;
pub mod crypto;
pub mod models;
pub mod storage;
