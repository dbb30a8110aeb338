use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum RegisterErrorKind {
    #[error("No factory for `{type_info}`. Use `as_factory` or `with_instance` to provide one")]
    NoFactory { type_info: TypeInfo },
    #[error("Factory for `{type_info}` specified more than once")]
    DuplicateFactory { type_info: TypeInfo },
    #[error("Capability `{capability}` with name {name:?} specified more than once for `{type_info}`")]
    DuplicateCapability {
        type_info: TypeInfo,
        capability: TypeInfo,
        name: String,
    },
    #[error("No processor registered for tag `{tag}` on field `{field}` of `{type_info}`")]
    NoProcessor {
        type_info: TypeInfo,
        field: &'static str,
        tag: &'static str,
    },
}
