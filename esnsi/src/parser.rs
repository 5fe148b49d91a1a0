//! Binding of caller record types to classifier attributes.

pub mod record;
pub mod registry;
