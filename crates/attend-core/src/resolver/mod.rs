//! Pure resolvers over collected membership data
//!
//! Nothing here performs I/O. Callers load memberships, configuration and
//! role mappings through the repository traits and pass them in.

mod attribute;
mod permission;
mod primary_unit;
mod settings;

pub use attribute::{collect_role_ids, determine_attribute};
pub use permission::{determine_permission, organizer_scope, PermissionLevel};
pub use primary_unit::{resolve_primary_unit, PrimaryUnit};
pub use settings::{config_keys, ResolverSettings};
