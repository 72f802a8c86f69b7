use super::*;
use crate::{
    builder::{BuilderContext, EntityBuilder},
    config::ModelConfig,
    create::CreationError,
    marker::{Alias, Immutable, Key},
    member::{Introspect, ParameterMember, TypeBuilder, TypeRegistry},
    object_type,
    reference::AccessError,
    types::{TypeToken, Typed},
    value::Value,
};
use std::{collections::BTreeSet, sync::Arc};

#[derive(Clone, Debug, Default, PartialEq)]
struct Publisher {
    name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Book {
    isbn: String,
    title: String,
    pages: u32,
    created: u64,
    authors: BTreeSet<String>,
    keywords: BTreeSet<String>,
    publisher: Publisher,
}

object_type!(Publisher, Book);

impl Introspect for Publisher {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("name", |p| &p.name, |p| &mut p.name);
    }
}

impl Introspect for Book {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("isbn", |b| &b.isbn, |b| &mut b.isbn).mark(Key);
        ty.property("title", |b| &b.title, |b| &mut b.title)
            .mark(Alias::new("name"));
        ty.property("pages", |b| &b.pages, |b| &mut b.pages)
            .mark(Immutable);
        ty.read_only("created", |b| &b.created);
        ty.collection("authors", |b| &b.authors, |b| &mut b.authors);
        ty.collection("keywords", |b| &b.keywords, |b| &mut b.keywords)
            .mark(Immutable);
        ty.property("publisher", |b| &b.publisher, |b| &mut b.publisher);
        ty.operation::<String, _>(
            "summary",
            vec![ParameterMember::of::<u32>("width")],
            |b: &mut Self, args: &[Value]| {
                let width = args.first().and_then(Value::to::<u32>).unwrap_or(0);
                let mut summary = b.title.clone();
                summary.truncate(width as usize);

                Ok(summary)
            },
        );
        ty.constructor(Self::default);
    }
}

fn entity_of<T: Typed>() -> Entity {
    let registry = TypeRegistry::new().with::<Publisher>().with::<Book>();
    let ctx = BuilderContext::new(ModelConfig::default(), Arc::new(registry)).unwrap();

    let mut builder = EntityBuilder::new(ctx).unwrap();
    builder.set_type(T::type_token()).unwrap();
    builder.build().unwrap()
}

fn book() -> Book {
    Book {
        isbn: "978-0".to_string(),
        title: "Dune Messiah".to_string(),
        pages: 256,
        created: 1969,
        ..Book::default()
    }
}

#[test]
fn property_display_lists_type_cardinality_and_flags() {
    let entity = entity_of::<Book>();

    assert_eq!(
        entity.property("isbn").unwrap().to_string(),
        "isbn: String [Nullable] key"
    );
    assert_eq!(
        entity.property("pages").unwrap().to_string(),
        "pages: u32 [Single] immutable"
    );
    assert_eq!(
        entity.property("publisher").unwrap().to_string(),
        "publisher: Publisher [Nullable] (Reference -> Publisher)"
    );
}

#[test]
fn operation_display_shows_the_signature() {
    let entity = entity_of::<Book>();

    assert_eq!(
        entity.operation("summary").unwrap().to_string(),
        "summary(width: u32) -> String"
    );
}

#[test]
fn entity_display_lists_members_and_aliases() {
    let text = entity_of::<Book>().to_string();

    assert!(text.starts_with("entity Book (Book)\n"));
    assert!(text.contains("  authors: BTreeSet [Multiple]\n"));
    assert!(text.contains("  alias name -> title\n"));
}

#[test]
fn immutable_properties_refuse_writes_but_allow_reads() {
    let entity = entity_of::<Book>();
    let mut book = book();

    let pages = entity.property("pages").unwrap();
    assert!(pages.is_immutable());
    assert!(matches!(
        pages.set_value(&mut book, Value::Uint(300)),
        Err(AccessError::ReadOnly { .. })
    ));
    assert_eq!(pages.get_value(&book).unwrap(), Value::Uint(256));

    let created = entity.property("created").unwrap();
    assert!(created.is_immutable());
    assert!(created.set_value(&mut book, Value::Uint(2000)).is_err());
    assert_eq!(book.created, 1969);
}

#[test]
fn collection_views_respect_immutability() {
    let entity = entity_of::<Book>();
    let mut book = book();

    let authors = entity.property("authors").unwrap();
    let view = authors.as_collection().unwrap();
    assert_eq!(view.element_type(), TypeToken::of::<String>());
    assert!(view.add(&mut book, &Value::from("Herbert")).unwrap());
    assert!(!view.add(&mut book, &Value::from("Herbert")).unwrap());
    assert!(view.remove(&mut book, &Value::from("Herbert")).unwrap());
    assert_eq!(view.size(&book).unwrap(), 0);

    book.keywords.insert("sand".to_string());
    let keywords = entity.property("keywords").unwrap();
    let view = keywords.as_collection().unwrap();
    assert!(matches!(
        view.add(&mut book, &Value::from("spice")),
        Err(AccessError::ReadOnly { .. })
    ));
    assert_eq!(view.values(&book).unwrap(), vec![Value::from("sand")]);
}

#[test]
fn collection_add_rejects_foreign_elements() {
    let entity = entity_of::<Book>();
    let mut book = book();
    let authors = entity.property("authors").unwrap();

    let err = authors
        .as_collection()
        .unwrap()
        .add(&mut book, &Value::Bool(true))
        .unwrap_err();

    assert!(matches!(err, AccessError::TypeMismatch { .. }));
}

#[test]
fn members_resolve_by_name_or_alias() {
    let entity = entity_of::<Book>();

    assert_eq!(entity.members().len(), 8);
    assert!(entity.member("summary").and_then(EntityMember::as_operation).is_some());
    assert_eq!(entity.member("name").map(EntityMember::name), Some("title"));
    assert!(entity.operation("title").is_none());
    assert_eq!(entity.key_property().map(|p| p.name()), Some("isbn"));
}

#[test]
fn operations_enforce_arity() {
    let entity = entity_of::<Book>();
    let summary = entity.operation("summary").unwrap();
    let mut book = book();

    let short = summary.invoke(&mut book, &[Value::Uint(4)]).unwrap();
    assert_eq!(short, Value::from("Dune"));

    let err = summary
        .invoke(&mut book, &[Value::Uint(4), Value::Uint(5)])
        .unwrap_err();
    assert!(matches!(err, AccessError::Arity { expected: 1, found: 2, .. }));
}

#[test]
fn entity_without_strategies_cannot_create() {
    let entity = entity_of::<Publisher>();

    assert!(entity.creation().is_empty());
    assert!(matches!(
        entity.create_entity(),
        Err(CreationError::NoStrategy { .. })
    ));

    let book = entity_of::<Book>().create::<Book>().unwrap();
    assert_eq!(book, Book::default());
}

#[test]
fn relation_display_includes_target_when_known() {
    let bare = RelationModel::new(RelationKind::Composition, None);
    let targeted = RelationModel::new(RelationKind::Aggregation, Some("Shelf".to_string()));

    assert_eq!(bare.to_string(), "Composition");
    assert_eq!(targeted.to_string(), "Aggregation -> Shelf");
}

#[test]
fn extensions_hold_one_value_per_type() {
    #[derive(Debug, PartialEq)]
    struct Weight(u32);

    let mut extensions = Extensions::new();
    assert!(extensions.is_empty());

    assert!(!extensions.insert(Weight(1)));
    assert!(extensions.insert(Weight(2)));
    assert!(extensions.insert(Weight(3)));
    assert_eq!(extensions.len(), 1);
    assert_eq!(extensions.get::<Weight>(), Some(&Weight(3)));
    assert!(extensions.contains::<Weight>());
    assert!(!extensions.contains::<String>());
}
