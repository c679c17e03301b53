//! Typed HTTP facades over the two downstream validation services
//!
//! Both clients translate transport failures into negative results instead of
//! propagating errors: a record must never pass unchecked, so an unreachable
//! downstream reads as "not valid" and surfaces as a record-level reason.

mod account_validation;
mod config_service;

pub use account_validation::{
    AccountPair, AccountState, AccountStatus, AccountValidationClient, MAX_BULK_ACCOUNTS,
};
pub use config_service::ConfigServiceClient;
