//! Job-file loading and structural validation for the cardpress engine.

pub mod load;
pub mod schema;

pub use load::{build_project, load_project};
pub use schema::{ModuleSpec, ProjectFile};
