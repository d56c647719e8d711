// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Service names, namespaces, and container image references.

mod image_ref;
mod name;

pub use image_ref::{ImageRef, ImageRefError};
pub use name::{NameError, Namespace, ServiceName};
pub(crate) use name::validate_label;
