use super::*;
use crate::{
    config::NameCase,
    create::{RegistryObjectFactory, SimpleInstanceRegistry, StrategyKind},
    event::ListenerError,
    marker::{
        Alias, AliasOf, Embedded, EntityName, FactoryRef, Ignore, ImplementedBy, Key, Named,
        Presentation, Relation,
    },
    member::{Introspect, ParameterMember, TypeBuilder},
    model::{Entity, QualifiedEntity, RelationKind},
    object_type,
    qualifier::Qualifier,
    reference::AccessError,
    types::{Cardinality, Typed},
    value::Value,
};

//
// Fixtures
//

struct Admin;
struct Guest;

#[derive(Clone, Debug, Default, PartialEq)]
struct Address {
    street: String,
    city: String,
}

impl Introspect for Address {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.marker(AliasOf::new("town", "city"));
        ty.property("street", |a| &a.street, |a| &mut a.street)
            .mark(Alias::new("road"));
        ty.property("city", |a| &a.city, |a| &mut a.city);
        ty.operation::<String, _>("describe", vec![], |a: &mut Self, _: &[Value]| {
            Ok(format!("{}, {}", a.street, a.city))
        });
        ty.constructor(Self::default);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Customer {
    id: u64,
    name: String,
    address: Address,
    tags: Vec<String>,
    internal: String,
}

impl Introspect for Customer {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("id", |c| &c.id, |c| &mut c.id).mark(Key);
        ty.property("name", |c| &c.name, |c| &mut c.name)
            .mark(Presentation::new().label("name").order(1))
            .mark(Presentation::new().qualified::<Admin>().label("admin.name"));
        ty.property("address", |c| &c.address, |c| &mut c.address)
            .mark(Embedded);
        ty.collection("tags", |c| &c.tags, |c| &mut c.tags)
            .mark(Presentation::new().qualified::<Admin>().visible(false));
        ty.property("internal", |c| &c.internal, |c| &mut c.internal)
            .mark(Ignore);
        ty.operation::<(), _>(
            "rename",
            vec![
                ParameterMember::of::<String>("name")
                    .with_marker(Presentation::new().label("new name")),
            ],
            |c: &mut Self, args: &[Value]| {
                let name = args
                    .first()
                    .and_then(Value::as_text)
                    .ok_or_else(|| AccessError::invocation("rename", "missing name"))?;
                c.name = name.to_string();

                Ok(())
            },
        );
        ty.constructor(Self::default);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Order {
    id: u32,
    billing: Address,
    shipping: Address,
}

impl Introspect for Order {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("id", |o| &o.id, |o| &mut o.id);
        ty.property("billing", |o| &o.billing, |o| &mut o.billing)
            .mark(Relation::new(RelationKind::Aggregation).qualified::<Admin>());
        ty.property("shipping", |o| &o.shipping, |o| &mut o.shipping)
            .mark(Relation::composition("Addr"));
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Node {
    label: String,
    next: Option<Box<Node>>,
}

impl Introspect for Node {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("label", |n| &n.label, |n| &mut n.label);
        ty.property("next", |n| &n.next, |n| &mut n.next)
            .mark(Embedded);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Tree {
    left: Branch,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Branch {
    leaf: Leaf,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Leaf {
    back: Option<Box<Branch>>,
}

impl Introspect for Tree {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("left", |t| &t.left, |t| &mut t.left)
            .mark(Embedded);
    }
}

impl Introspect for Branch {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("leaf", |b| &b.leaf, |b| &mut b.leaf)
            .mark(Embedded);
    }
}

impl Introspect for Leaf {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("back", |l| &l.back, |l| &mut l.back)
            .mark(Embedded);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Pair {
    a: u32,
    b: u32,
}

impl Introspect for Pair {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("a", |p| &p.a, |p| &mut p.a).mark(Key);
        ty.property("b", |p| &p.b, |p| &mut p.b).mark(Key);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Loose {
    tags: Vec<String>,
}

impl Introspect for Loose {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("tags", |l| &l.tags, |l| &mut l.tags);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Odd {
    value: u32,
}

impl Introspect for Odd {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("value", |o| &o.value, |o| &mut o.value)
            .mark(Named::new("bad-name"));
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Dotted {
    value: u32,
}

impl Introspect for Dotted {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.marker(EntityName::new("bad.name"));
        ty.property("value", |d| &d.value, |d| &mut d.value);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct DottedField {
    value: u32,
}

impl Introspect for DottedField {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("value", |d| &d.value, |d| &mut d.value)
            .mark(Named::new("a.b"));
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Shelf {
    bin: Address,
}

impl Introspect for Shelf {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.read_only("bin", |s| &s.bin).mark(Embedded);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Ticket {
    code: String,
}

impl Introspect for Ticket {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("code", |t| &t.code, |t| &mut t.code);
        ty.constructor(Self::default);
        ty.factory_method::<Self, _>("issue", || {
            Ok(Self {
                code: "issued".to_string(),
            })
        });
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Vehicle {
    wheels: u8,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Car {
    wheels: u8,
}

impl Introspect for Vehicle {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.marker(ImplementedBy::of::<Car>());
        ty.property("wheels", |v| &v.wheels, |v| &mut v.wheels);
    }
}

impl Introspect for Car {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("wheels", |c| &c.wheels, |c| &mut c.wheels);
        ty.constructor(|| Self { wheels: 4 });
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Gadget {
    serial: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Workshop {
    next: u32,
}

impl Introspect for Gadget {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.marker(FactoryRef::of::<Workshop>("make"));
        ty.property("serial", |g| &g.serial, |g| &mut g.serial);
        ty.constructor(Self::default);
    }
}

impl Introspect for Workshop {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("next", |w| &w.next, |w| &mut w.next);
        ty.constructor(|| Self { next: 7 });
        ty.instance_factory_method::<Gadget, _>("make", |w: &Self| Ok(Gadget { serial: w.next }));
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Orphan {
    id: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Unregistered;

impl Introspect for Orphan {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.marker(FactoryRef::of::<Unregistered>("make"));
        ty.property("id", |o| &o.id, |o| &mut o.id);
        ty.constructor(Self::default);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct OrderLine {
    qty: u32,
}

impl Introspect for OrderLine {
    fn introspect(ty: &mut TypeBuilder<Self>) {
        ty.property("qty", |l| &l.qty, |l| &mut l.qty);
    }
}

object_type!(
    Address, Customer, Order, Node, Tree, Branch, Leaf, Pair, Loose, Odd, Dotted, DottedField,
    Shelf, Ticket, Vehicle, Car, Gadget, Workshop, Orphan, Unregistered, OrderLine,
);

fn registry() -> Arc<TypeRegistry> {
    Arc::new(
        TypeRegistry::new()
            .with::<Address>()
            .with::<Customer>()
            .with::<Order>()
            .with::<Node>()
            .with::<Tree>()
            .with::<Branch>()
            .with::<Leaf>()
            .with::<Pair>()
            .with::<Loose>()
            .with::<Odd>()
            .with::<Dotted>()
            .with::<DottedField>()
            .with::<Shelf>()
            .with::<Ticket>()
            .with::<Vehicle>()
            .with::<Car>()
            .with::<Gadget>()
            .with::<Workshop>()
            .with::<Orphan>()
            .with::<OrderLine>(),
    )
}

fn context() -> BuilderContext {
    BuilderContext::new(ModelConfig::default(), registry()).unwrap()
}

fn builder_for<T: Typed>(ctx: &BuilderContext) -> EntityBuilder {
    let mut builder = EntityBuilder::new(ctx.clone()).unwrap();
    builder.set_type(T::type_token()).unwrap();

    builder
}

fn build<T: Typed>(ctx: &BuilderContext) -> Result<Entity, BuildError> {
    builder_for::<T>(ctx).build()
}

fn visible_names(view: &QualifiedEntity) -> Vec<String> {
    view.visible_properties()
        .iter()
        .map(|p| p.delegate().name().to_string())
        .collect()
}

//
// Scanning
//

#[test]
fn entity_name_defaults_to_short_type_name() {
    let entity = build::<Customer>(&context()).unwrap();

    assert_eq!(entity.name(), "Customer");
    assert_eq!(entity.entity_type(), Customer::type_token());
}

#[test]
fn entity_case_is_applied_to_derived_names() {
    let mut config = ModelConfig::default();
    config.naming.entity_case = Some(NameCase::Snake);
    let ctx = BuilderContext::new(config, registry()).unwrap();

    let entity = build::<OrderLine>(&ctx).unwrap();

    assert_eq!(entity.name(), "order_line");
}

#[test]
fn embedded_members_are_flattened_in_declaration_order() {
    let entity = build::<Customer>(&context()).unwrap();
    let names: Vec<&str> = entity.properties().iter().map(|p| p.name()).collect();

    assert_eq!(names, vec!["id", "name", "address.street", "address.city", "tags"]);
    assert!(entity.property("internal").is_none());
    assert!(entity.operation("address.describe").is_some());
    assert!(entity.operation("rename").is_some());
}

#[test]
fn embedded_aliases_carry_the_prefix() {
    let entity = build::<Customer>(&context()).unwrap();

    assert_eq!(entity.resolve_alias("address.road"), "address.street");
    assert_eq!(entity.resolve_alias("address.town"), "address.city");
    assert_eq!(entity.property("address.road").map(|p| p.name()), Some("address.street"));
}

#[test]
fn embedded_properties_read_and_write_through_the_root() {
    let entity = build::<Customer>(&context()).unwrap();
    let street = entity.property("address.street").unwrap();
    let mut customer = Customer::default();

    street.set_value(&mut customer, Value::from("Main St")).unwrap();

    assert_eq!(customer.address.street, "Main St");
    assert_eq!(street.get_value(&customer).unwrap(), Value::from("Main St"));
}

#[test]
fn operations_invoke_on_root_and_embedded_objects() {
    let entity = build::<Customer>(&context()).unwrap();
    let mut customer = Customer {
        address: Address {
            street: "Elm".to_string(),
            city: "Oslo".to_string(),
        },
        ..Customer::default()
    };

    let described = entity
        .operation("address.describe")
        .unwrap()
        .invoke(&mut customer, &[])
        .unwrap();
    assert_eq!(described, Value::from("Elm, Oslo"));

    let rename = entity.operation("rename").unwrap();
    rename.invoke(&mut customer, &[Value::from("Bo")]).unwrap();
    assert_eq!(customer.name, "Bo");

    let err = rename.invoke(&mut customer, &[]).unwrap_err();
    assert!(matches!(err, AccessError::Arity { expected: 1, found: 0, .. }));
}

#[test]
fn parameters_carry_their_own_details() {
    let entity = build::<Customer>(&context()).unwrap();
    let rename = entity.operation("rename").unwrap();
    let parameter = &rename.parameters()[0];

    assert_eq!(parameter.name(), "name");
    assert_eq!(parameter.index(), 0);
    assert_eq!(parameter.detail().label.as_deref(), Some("new name"));
    assert_eq!(rename.result().cardinality(), Cardinality::None);
}

#[test]
fn key_and_cardinality_are_derived() {
    let entity = build::<Customer>(&context()).unwrap();

    assert_eq!(entity.key_property().map(|p| p.name()), Some("id"));
    assert_eq!(entity.property("id").unwrap().cardinality(), Cardinality::Single);
    assert_eq!(entity.property("name").unwrap().cardinality(), Cardinality::Nullable);

    let tags = entity.property("tags").unwrap();
    assert_eq!(tags.cardinality(), Cardinality::Multiple);
    assert!(tags.as_collection().is_some());
}

#[test]
fn collection_view_navigates_from_the_root() {
    let entity = build::<Customer>(&context()).unwrap();
    let tags = entity.property("tags").unwrap();
    let view = tags.as_collection().unwrap();
    let mut customer = Customer::default();

    assert!(view.add(&mut customer, &Value::from("vip")).unwrap());
    assert!(view.contains(&customer, &Value::from("vip")).unwrap());
    assert_eq!(view.size(&customer).unwrap(), 1);
    assert_eq!(customer.tags, vec!["vip".to_string()]);

    view.clear(&mut customer).unwrap();
    assert_eq!(view.size(&customer).unwrap(), 0);
}

//
// Validation
//

#[test]
fn embedding_the_root_type_is_rejected() {
    let mut builder = EntityBuilder::new(context()).unwrap();
    let err = builder.set_type(Node::type_token()).unwrap_err();

    assert!(matches!(err, BuildError::RecursiveEmbedding { .. }));
}

#[test]
fn embedding_a_type_already_on_the_path_is_rejected() {
    let mut builder = EntityBuilder::new(context()).unwrap();
    let err = builder.set_type(Tree::type_token()).unwrap_err();

    match err {
        BuildError::RecursiveEmbedding { path, .. } => assert_eq!(path, "left.leaf.back"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unknown_entity_type_is_rejected() {
    let mut builder = EntityBuilder::new(context()).unwrap();
    let err = builder.set_type(Unregistered::type_token()).unwrap_err();

    assert!(matches!(err, BuildError::UnknownType { .. }));
}

#[test]
fn invalid_member_names_fail_the_build() {
    let err = build::<Odd>(&context()).unwrap_err();

    match err {
        BuildError::InvalidName { kind, segment, .. } => {
            assert_eq!(kind, "property");
            assert_eq!(segment, "bad-name");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_entity_names_fail_the_build() {
    let mut builder = builder_for::<Customer>(&context());
    builder.set_name("9lives");

    let err = builder.build().unwrap_err();
    assert!(matches!(err, BuildError::InvalidName { kind: "entity", .. }));
}

#[test]
fn dotted_entity_names_are_matched_as_a_whole() {
    let err = build::<Dotted>(&context()).unwrap_err();

    match err {
        BuildError::InvalidName { kind, name, .. } => {
            assert_eq!(kind, "entity");
            assert_eq!(name, "bad.name");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn dotted_local_member_names_are_rejected() {
    let err = build::<DottedField>(&context()).unwrap_err();

    match err {
        BuildError::InvalidName { kind, segment, .. } => {
            assert_eq!(kind, "property");
            assert_eq!(segment, "a.b");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn properties_behind_a_read_only_embedding_are_immutable() {
    let entity = build::<Shelf>(&context()).unwrap();
    let street = entity.property("bin.street").unwrap();
    let mut shelf = Shelf {
        bin: Address {
            street: "Main".to_string(),
            city: "Oslo".to_string(),
        },
    };

    assert!(street.is_immutable());
    assert!(matches!(
        street.set_value(&mut shelf, Value::from("Elm")),
        Err(AccessError::ReadOnly { .. })
    ));
    assert_eq!(street.get_value(&shelf).unwrap(), Value::from("Main"));
}

#[test]
fn duplicate_keys_are_rejected() {
    let err = build::<Pair>(&context()).unwrap_err();

    assert!(matches!(err, BuildError::DuplicateKey { .. }));
}

#[test]
fn multi_valued_property_needs_collection_ops() {
    let err = build::<Loose>(&context()).unwrap_err();

    match err {
        BuildError::CollectionAccess { name } => assert_eq!(name, "tags"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn self_alias_is_rejected() {
    let mut builder = builder_for::<Customer>(&context());
    builder.add_alias("name", "name");

    assert!(matches!(builder.build(), Err(BuildError::SelfAlias { .. })));
}

#[test]
fn alias_to_unknown_member_is_rejected() {
    let mut builder = builder_for::<Customer>(&context());
    builder.add_alias("missing", "gone");

    assert!(matches!(
        builder.build(),
        Err(BuildError::UnknownAliasTarget { .. })
    ));
}

#[test]
fn alias_shadowing_a_member_is_rejected() {
    let mut builder = builder_for::<Customer>(&context());
    builder.add_alias("id", "name");

    assert!(matches!(builder.build(), Err(BuildError::AliasCollision { .. })));
}

#[test]
fn alias_mapped_to_two_targets_is_rejected() {
    let mut builder = builder_for::<Customer>(&context());
    builder.add_alias("id", "ident").add_alias("name", "ident");

    assert!(matches!(builder.build(), Err(BuildError::AliasCollision { .. })));
}

#[test]
fn repeated_identical_alias_is_accepted() {
    let mut builder = builder_for::<Customer>(&context());
    builder.add_alias("id", "ident").add_alias("id", "ident");

    let entity = builder.build().unwrap();
    assert_eq!(entity.property("ident").map(|p| p.name()), Some("id"));
}

//
// Qualifiers
//

#[test]
fn qualified_details_overlay_the_default() {
    let entity = build::<Customer>(&context()).unwrap();
    let admin = Qualifier::of::<Admin>();
    let name = entity.property("name").unwrap();

    assert_eq!(name.unqualified().label(), Some("name"));
    assert_eq!(name.qualified(&admin).label(), Some("admin.name"));
    assert_eq!(name.qualified(&admin).order(), Some(1));
}

#[test]
fn every_member_gets_an_overlay_for_entity_qualifiers() {
    let entity = build::<Customer>(&context()).unwrap();
    let admin = Qualifier::of::<Admin>();

    assert!(entity.overlay(&admin).is_some());
    assert!(entity.property("id").unwrap().overlay(&admin).is_some());
    assert!(entity.property("address.city").unwrap().overlay(&admin).is_some());
    assert!(entity.operation("rename").unwrap().overlay(&admin).is_some());
}

#[test]
fn unknown_qualifier_falls_back_to_unqualified() {
    let entity = build::<Customer>(&context()).unwrap();
    let guest = Qualifier::of::<Guest>();
    let name = entity.property("name").unwrap();

    assert!(name.overlay(&guest).is_none());
    assert!(Arc::ptr_eq(name.qualified(&guest), name.unqualified()));
}

#[test]
fn qualified_entity_view_filters_invisible_properties() {
    let entity = build::<Customer>(&context()).unwrap();
    let admin = Qualifier::of::<Admin>();

    let all = visible_names(entity.unqualified());
    let admin_view = visible_names(entity.qualified(&admin));

    assert!(all.iter().any(|name| name == "tags"));
    assert!(!admin_view.iter().any(|name| name == "tags"));
    assert_eq!(admin_view.first().map(String::as_str), Some("name"));
}

//
// Relations
//

#[test]
fn registered_object_types_become_references() {
    let entity = build::<Order>(&context()).unwrap();
    let billing = entity.property("billing").unwrap();

    let relation = billing.as_relation().unwrap();
    assert_eq!(relation.kind, RelationKind::Reference);
    assert_eq!(relation.target.as_deref(), Some("Address"));
    assert!(entity.property("id").unwrap().as_relation().is_none());
}

#[test]
fn explicit_relation_wins_over_detection() {
    let entity = build::<Order>(&context()).unwrap();
    let shipping = entity.property("shipping").unwrap();

    let relation = shipping.as_relation().unwrap();
    assert_eq!(relation.kind, RelationKind::Composition);
    assert_eq!(relation.target.as_deref(), Some("Addr"));
}

#[test]
fn qualified_relation_shadows_the_property_relation() {
    let entity = build::<Order>(&context()).unwrap();
    let admin = Qualifier::of::<Admin>();
    let billing = entity.property("billing").unwrap();

    let qualified = billing.qualified(&admin).as_relation().unwrap();
    assert_eq!(qualified.kind, RelationKind::Aggregation);

    let shipping = entity.property("shipping").unwrap();
    assert_eq!(
        shipping.qualified(&admin).as_relation().map(|r| r.kind),
        Some(RelationKind::Composition)
    );
}

//
// Creational strategies
//

#[test]
fn fallback_strategies_follow_registration_order() {
    let registry = registry();
    let instances = SimpleInstanceRegistry::new().with_instance(Ticket {
        code: "registered".to_string(),
    });
    let ctx = BuilderContext::new(ModelConfig::default(), Arc::clone(&registry))
        .unwrap()
        .with_object_factory(Arc::new(RegistryObjectFactory::new(registry)))
        .with_instance_registry(Arc::new(instances));

    let entity = build::<Ticket>(&ctx).unwrap();

    assert_eq!(
        entity.creation().kinds(),
        vec![
            StrategyKind::FactoryMethod,
            StrategyKind::ObjectFactory,
            StrategyKind::Registry,
            StrategyKind::Constructor,
        ]
    );
    assert_eq!(entity.create::<Ticket>().unwrap().code, "issued");
}

#[test]
fn implementation_type_supplies_the_constructor() {
    let entity = build::<Vehicle>(&context()).unwrap();

    assert_eq!(entity.creation().kinds(), vec![StrategyKind::Constructor]);

    let instance = entity.create_entity().unwrap();
    assert_eq!(instance.take::<Car>(), Some(Car { wheels: 4 }));
}

#[test]
fn factory_reference_replaces_the_fallbacks() {
    let entity = build::<Gadget>(&context()).unwrap();

    assert_eq!(entity.creation().kinds(), vec![StrategyKind::FactoryInstance]);
    assert_eq!(entity.create::<Gadget>().unwrap(), Gadget { serial: 7 });
}

#[test]
fn unusable_factory_reference_keeps_the_fallbacks() {
    let mut builder = EntityBuilder::new(context()).unwrap();
    builder.set_type(Orphan::type_token()).unwrap();

    let entity = builder.build().unwrap();
    assert_eq!(entity.creation().kinds(), vec![StrategyKind::Constructor]);
}

//
// Post-processors
//

#[derive(Debug)]
struct Audit;

#[derive(Debug, PartialEq)]
struct Audited(Vec<String>);

impl EntityPostProcessor for Audit {
    fn name(&self) -> &'static str {
        "audit"
    }

    fn process(&self, entity: &mut EntityState) -> Result<(), ListenerError> {
        let names = entity
            .property_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        entity.extensions_mut().insert(Audited(names));

        Ok(())
    }
}

#[derive(Debug)]
struct Width;

#[derive(Debug, PartialEq)]
struct Columns(usize);

impl PropertyPostProcessor for Width {
    fn name(&self) -> &'static str {
        "width"
    }

    fn process(&self, property: &mut PropertyState) -> Result<(), ListenerError> {
        let width = property.name().map_or(0, str::len);
        property.extensions_mut().insert(Columns(width));

        Ok(())
    }
}

#[test]
fn post_processors_attach_extensions() {
    let ctx = context()
        .with_entity_processor(Arc::new(Audit))
        .with_property_processor(Arc::new(Width));

    let entity = build::<Customer>(&ctx).unwrap();

    let audited = entity.extension::<Audited>().unwrap();
    assert_eq!(audited.0.len(), 5);
    assert_eq!(audited.0[2], "address.street");

    let street = entity.property("address.street").unwrap();
    assert_eq!(street.extension::<Columns>(), Some(&Columns(14)));
}
