pub mod handler;
pub mod org;
pub mod reaper;
pub mod secret_io;

pub use handler::{RotationHandler, RotationReport};
pub use org::OrganizationName;
