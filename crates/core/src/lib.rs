//! Scratch-card run engine: ticket generation, independent win validation,
//! print-run placement and final integrity checking. Keep this crate free
//! of IO and platform concerns.

pub mod catalog;
pub mod check;
pub mod events;
pub mod generate;
pub mod module;
pub mod panel;
pub mod placement;
pub mod project;
pub mod rng;
pub mod security;
pub mod select;
pub mod ticket;
pub mod validate;

pub use catalog::*;
pub use check::*;
pub use events::*;
pub use generate::*;
pub use module::*;
pub use panel::*;
pub use placement::*;
pub use project::*;
pub use rng::*;
pub use security::*;
pub use select::*;
pub use ticket::*;
pub use validate::*;
