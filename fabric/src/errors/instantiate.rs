use super::resolve::ResolveErrorKind;
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Failed to inject field `{field}`: {source}")]
    Field {
        field: &'static str,
        source: Box<ResolveErrorKind>,
    },
    #[error("Field `{field}` wasn't injected")]
    MissingField { field: &'static str },
    #[error("Incorrect type injected into field `{field}`. Actual: `{actual}`, expected: `{expected}`")]
    IncorrectFieldType {
        field: &'static str,
        expected: TypeInfo,
        actual: TypeInfo,
    },
    #[error(transparent)]
    Dependency(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    #[inline]
    fn from(err: ResolveErrorKind) -> Self {
        Self::Dependency(Box::new(err))
    }
}
