//! Schema-structural reconciliation.
//!
//! A schema artifact is never blindly overwritten: both sides are
//! introspected into a structural model and compared by containment. Line
//! counts are useless here (a reformatted schema can shrink while still
//! carrying every enum value and model field), so the diff works on named
//! elements only.

mod diff;
mod introspect;
mod reconcile;

pub use diff::{containment_diff, MissingCategory, MissingItem};
pub use introspect::{introspect, SchemaError, SchemaModel};
pub use reconcile::{reconcile_schema, SchemaOutcome};
