mod aggregate;
mod instantiate;
mod lifecycle;
mod register;
mod resolve;

pub use aggregate::{Errors, JoinedError};
pub use instantiate::InstantiateErrorKind;
pub use lifecycle::CleanupErrorKind;
pub use register::RegisterErrorKind;
pub use resolve::ResolveErrorKind;

pub type RegisterError = JoinedError<RegisterErrorKind>;
pub type CleanupError = JoinedError<CleanupErrorKind>;
