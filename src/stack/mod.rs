// ABOUTME: The stack model: one namespace's worth of deployable services.
// ABOUTME: Builder, collision detection, and resource spec derivation.

mod build;
mod collision;
mod model;
mod resources;

pub use build::{BuildError, build_stack};
pub use collision::{CollisionError, check_collision};
pub use model::{Stack, StackService};
pub use resources::{config_map_specs, secret_specs, workload_specs};
