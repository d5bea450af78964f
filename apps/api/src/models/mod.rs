pub mod dream;
pub mod interpretation;
pub mod user;

pub use dream::DreamEntry;
pub use interpretation::{InterpretationField, InterpretationResult};
pub use user::UserContext;
