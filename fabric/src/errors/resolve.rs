use super::instantiate::InstantiateErrorKind;
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Registration for `{type_info}` with name {name:?} not found")]
    NoRegistration { type_info: TypeInfo, name: String },
    #[error("Incorrect instance type for `{expected}` with name {name:?}. Actual: `{actual}`")]
    IncorrectType {
        expected: TypeInfo,
        actual: TypeInfo,
        name: String,
    },
    #[error("Cyclic dependency detected while resolving `{type_info}` with name {name:?}")]
    CyclicDependency { type_info: TypeInfo, name: String },
    #[error("No processor for tag value `{tag}` on field `{field}`")]
    NoProcessor { field: &'static str, tag: String },
    #[error("Failed to instantiate `{type_info}` with name {name:?}: {source}")]
    Instantiate {
        type_info: TypeInfo,
        name: String,
        source: InstantiateErrorKind,
    },
    #[error("Middleware failed for `{type_info}` with name {name:?}: {source}")]
    Middleware {
        type_info: TypeInfo,
        name: String,
        source: anyhow::Error,
    },
    #[error("Init failed for `{type_info}` with name {name:?}: {source}")]
    Init {
        type_info: TypeInfo,
        name: String,
        source: anyhow::Error,
    },
}
