use super::TagProcessor;
use crate::{errors::ResolveErrorKind, inject::Field, instance::Instance, Container, Context};

const INJECT: &str = "inject";

/// Default processor, registered in every container.
///
/// Handles `inject` and `inject:<name>` tags (the marker is case-insensitive)
/// by resolving the field type from the container with the name after the colon.
#[derive(Debug, Clone, Copy, Default)]
pub struct InjectTagProcessor;

impl TagProcessor for InjectTagProcessor {
    #[inline]
    fn priority(&self) -> i32 {
        0
    }

    #[inline]
    fn can_process(&self, tag: &str) -> bool {
        parse_name(tag).is_some()
    }

    fn process(
        &self,
        ctx: &Context,
        container: &Container,
        field: &Field,
        tag: &str,
    ) -> Result<Option<Instance>, ResolveErrorKind> {
        let name = parse_name(tag).unwrap_or_default();
        container.resolve_by_type(ctx, field.type_info, name).map(Some)
    }
}

/// Returns the dependency name of an inject tag, or `None` if it's not an inject tag.
/// The name is trimmed, its case is kept.
fn parse_name(tag: &str) -> Option<&str> {
    let (marker, name) = match tag.split_once(':') {
        Some((marker, name)) => (marker, name.trim()),
        None => (tag, ""),
    };
    marker.eq_ignore_ascii_case(INJECT).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::{parse_name, InjectTagProcessor};
    use crate::{errors::ResolveErrorKind, inject::Field, processor::TagProcessor, Container, Context};

    use std::sync::Arc;
    use tracing_test::traced_test;

    #[test]
    fn test_parse_name() {
        assert_eq!(parse_name("inject"), Some(""));
        assert_eq!(parse_name("INJECT"), Some(""));
        assert_eq!(parse_name("inject:"), Some(""));
        assert_eq!(parse_name("inject:cache"), Some("cache"));
        assert_eq!(parse_name("Inject: Primary "), Some("Primary"));
        assert_eq!(parse_name("inject:a:b"), Some("a:b"));
        assert_eq!(parse_name("injected"), None);
        assert_eq!(parse_name("env:inject"), None);
        assert_eq!(parse_name(""), None);
    }

    #[test]
    fn test_can_process() {
        let processor = InjectTagProcessor;

        assert_eq!(processor.priority(), 0);
        assert!(processor.can_process("inject"));
        assert!(processor.can_process("inject:db"));
        assert!(!processor.can_process("config:db"));
    }

    #[test]
    #[traced_test]
    fn test_process_resolves_named() {
        let container = Container::new();
        container
            .register_with::<String>(|options| options.named("cache").with_instance("redis".to_owned()))
            .unwrap();

        let processor = InjectTagProcessor;
        let ctx = Context::new();

        let field = Field::new::<Arc<String>>("cache", "inject:cache");
        let instance = processor.process(&ctx, &container, &field, field.tag).unwrap().unwrap();
        assert_eq!(*instance.downcast::<String>().unwrap(), "redis");

        let field = Field::new::<Arc<String>>("default", "inject");
        assert!(matches!(
            processor.process(&ctx, &container, &field, field.tag),
            Err(ResolveErrorKind::NoRegistration { .. })
        ));
    }
}
