use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum CleanupErrorKind {
    #[error("Cleanup failed for `{type_info}` with name {name:?}: {source}")]
    Cleanup {
        type_info: TypeInfo,
        name: String,
        source: anyhow::Error,
    },
}
