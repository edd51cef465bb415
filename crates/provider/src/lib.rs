//! Provider-neutral building blocks for Strata lookups: the [`ResourceLookup`]
//! trait, attribute [`Schema`]s, and the [`wait_for_state`] polling loop.

pub mod error;
pub mod refresh;
pub mod resource_lookup;
pub mod schema;

pub use error::ProviderError;
pub use refresh::{Refresh, StateRefresh, WaitConfig, WaitError, wait_for_state};
pub use resource_lookup::ResourceLookup;
pub use schema::{Attribute, AttributeMode, AttributeType, Schema, SchemaError};
