extern crate self as fabric;

pub(crate) mod any;
pub(crate) mod cache;
pub(crate) mod container;
pub(crate) mod context;
pub(crate) mod errors;
pub(crate) mod guard;
pub(crate) mod inject;
pub(crate) mod instance;
pub(crate) mod lifecycle;
pub(crate) mod middleware;
pub(crate) mod processor;
pub(crate) mod registration;
pub(crate) mod registry;

pub use any::TypeInfo;
pub use container::Container;
pub use context::Context;
pub use errors::{
    CleanupError, CleanupErrorKind, Errors, InstantiateErrorKind, JoinedError, RegisterError, RegisterErrorKind,
    ResolveErrorKind,
};
pub use inject::{Field, InjectField, Injectable, Injected};
pub use instance::Instance;
pub use lifecycle::Lifecycle;
pub use middleware::Middleware;
pub use processor::{inject::InjectTagProcessor, TagProcessor};
pub use registration::RegistrationOptions;

#[cfg(feature = "macros")]
pub use fabric_macros::Injectable;
