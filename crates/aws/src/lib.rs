//! AWS lookups for Strata.
//!
//! This crate provides feature-gated integrations with AWS services:
//!
//! - **RDS** (`rds` feature): resolve criteria to exactly one orderable DB
//!   instance option via `DescribeOrderableDBInstanceOptions`
//! - **Lex** (`lex` feature): probe whether a Lex Model Building slot type
//!   exists via `GetSlotTypeVersions`
//!
//! All lookups share a common [`AwsBaseConfig`](config::AwsBaseConfig) for
//! region, endpoint override, and optional STS assume-role credentials.

pub mod auth;
pub mod config;
pub mod error;

#[cfg(feature = "rds")]
pub mod rds;

#[cfg(feature = "lex")]
pub mod lex;

// Re-exports for convenience.
pub use config::AwsBaseConfig;
pub use error::AwsProviderError;

#[cfg(feature = "rds")]
pub use rds::{OrderableDbInstance, OrderableDbInstanceCriteria, RdsConfig, RdsProvider};

#[cfg(feature = "lex")]
pub use lex::{LexConfig, LexProvider, LexStatus, SlotTypeStatus};
