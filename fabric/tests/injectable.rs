use fabric::{Container, Context, Injectable, InstantiateErrorKind, ResolveErrorKind, TypeInfo, Instance};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing_test::traced_test;

trait Database: Send + Sync {
    fn name(&self) -> &str;
}

struct Postgres {
    name: &'static str,
}

impl Database for Postgres {
    fn name(&self) -> &str {
        self.name
    }
}

#[derive(Injectable)]
struct Repository {
    #[fabric(tag = "inject")]
    db: Arc<dyn Database>,
    #[fabric(tag = "inject:cache")]
    cache: Arc<dyn Database>,
    #[fabric(tag = "INJECT: audit ")]
    audit: Option<Arc<dyn Database>>,
    queries: u64,
}

fn database(container: &Container, name: &'static str) {
    container
        .register_with::<Postgres>(move |options| {
            options
                .named(name)
                .as_singleton()
                .with_named_capability::<dyn Database>(name, |db| db)
                .as_factory(move |_: &Context, _: &Container| Ok(Postgres { name }))
        })
        .unwrap();
}

#[test]
#[traced_test]
fn test_inject_by_tags() {
    let container = Container::new();
    database(&container, "");
    database(&container, "cache");
    database(&container, "audit");
    container.register_injectable::<Repository>(|options| options).unwrap();

    let ctx = Context::new();
    let repository = container.resolve::<Repository>(&ctx).unwrap();

    assert_eq!(repository.db.name(), "");
    assert_eq!(repository.cache.name(), "cache");
    assert_eq!(repository.audit.as_ref().unwrap().name(), "audit");
    assert_eq!(repository.queries, 0);

    let cache = container.resolve_named::<dyn Database>(&ctx, "cache").unwrap();
    assert!(Arc::ptr_eq(&repository.cache, &cache));
}

#[test]
#[traced_test]
fn test_missing_dependency() {
    let container = Container::new();
    database(&container, "");
    container.register_injectable::<Repository>(|options| options).unwrap();

    let err = container.resolve::<Repository>(&Context::new()).err().unwrap();
    match err {
        ResolveErrorKind::Instantiate {
            type_info,
            source: InstantiateErrorKind::Field { field, source },
            ..
        } => {
            assert_eq!(type_info, TypeInfo::of::<Repository>());
            assert_eq!(field, "cache");
            assert!(matches!(*source, ResolveErrorKind::NoRegistration { ref name, .. } if name == "cache"));
        }
        err => panic!("unexpected error: {err}"),
    }
}

#[test]
#[traced_test]
fn test_nested_resolution_runs_middleware() {
    let resolved = Arc::new(Mutex::new(Vec::new()));

    let container = Container::new();
    container.add_middleware({
        let resolved = resolved.clone();
        move |_: &Context, type_info: TypeInfo, instance: Instance| -> anyhow::Result<Instance> {
            resolved.lock().push(type_info);
            Ok(instance)
        }
    });
    database(&container, "");
    database(&container, "cache");
    database(&container, "audit");
    container
        .register_injectable::<Repository>(|options| options.as_singleton())
        .unwrap();

    let ctx = Context::new();
    let repository = container.resolve::<Repository>(&ctx).unwrap();
    assert!(Arc::ptr_eq(&repository, &container.resolve::<Repository>(&ctx).unwrap()));

    let database = TypeInfo::of::<dyn Database>();
    assert_eq!(
        *resolved.lock(),
        [database, database, database, TypeInfo::of::<Repository>()]
    );
}

#[derive(Injectable)]
struct Unmarked {
    retries: u8,
    label: String,
}

#[test]
#[traced_test]
fn test_without_tagged_fields() {
    assert!(<Unmarked as Injectable>::fields().is_empty());

    let container = Container::new();
    container.register_injectable::<Unmarked>(|options| options).unwrap();

    let unmarked = container.resolve::<Unmarked>(&Context::new()).unwrap();
    assert_eq!(unmarked.retries, 0);
    assert!(unmarked.label.is_empty());
}

#[test]
fn test_field_descriptors() {
    let fields = <Repository as Injectable>::fields();

    let descriptors = fields
        .iter()
        .map(|field| (field.name, field.type_info, field.tag))
        .collect::<Vec<_>>();
    let database = TypeInfo::of::<dyn Database>();
    assert_eq!(
        descriptors,
        [
            ("db", database, "inject"),
            ("cache", database, "inject:cache"),
            ("audit", database, "INJECT: audit "),
        ]
    );
}
