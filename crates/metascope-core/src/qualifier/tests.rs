use super::*;
use crate::{detail::DetailPatch, model::RelationKind};

struct Admin;
struct Public;

fn presentation(qualifier: Option<Qualifier>, patch: DetailPatch) -> Presentation {
    Presentation {
        qualifier,
        detail: patch,
    }
}

#[test]
fn qualifier_patch_beats_default_patch_beats_base() {
    let admin = Qualifier::of::<Admin>();
    let mut details = QualifiedDetails::new();
    details.declare(&presentation(
        None,
        DetailPatch {
            label: Some("name".into()),
            order: Some(2),
            ..DetailPatch::default()
        },
    ));
    details.declare(&presentation(
        Some(admin),
        DetailPatch {
            label: Some("admin.name".into()),
            ..DetailPatch::default()
        },
    ));

    let base = Detail::new(true, false);
    let detail = details.detail_for(&admin, &base);

    assert_eq!(detail.label.as_deref(), Some("admin.name"));
    assert_eq!(detail.order, Some(2));
    assert!(detail.visible);
    assert_eq!(details.default_detail(&base).label.as_deref(), Some("name"));
}

#[test]
fn later_declarations_win_per_field() {
    let mut details = QualifiedDetails::new();
    details.declare(&Presentation::new().label("first").order(1));
    details.declare(&Presentation::new().label("second"));

    let detail = details.default_detail(&Detail::default());

    assert_eq!(detail.label.as_deref(), Some("second"));
    assert_eq!(detail.order, Some(1));
}

#[test]
fn unknown_qualifier_falls_back_to_default_detail() {
    let admin = Qualifier::of::<Admin>();
    let public = Qualifier::of::<Public>();
    let mut details = QualifiedDetails::new();
    details.declare(&Presentation::new().qualified::<Admin>().visible(false));

    assert!(!details.detail_for(&admin, &Detail::default()).visible);
    assert!(details.detail_for(&public, &Detail::default()).visible);
    assert!(details.qualifiers().contains(&admin));
    assert!(!details.qualifiers().contains(&public));
}

#[test]
fn inherited_base_keeps_only_visibility_and_inline() {
    let admin = Qualifier::of::<Admin>();
    let mut owner = QualifiedDetails::new();
    owner.declare(&Presentation::new().label("owner").inline(true));
    owner.declare(&Presentation::new().qualified::<Admin>().visible(false));

    let inherited = InheritedDetails::new(owner, Detail::default());
    let unqualified = inherited.base_for(None);
    let qualified = inherited.base_for(Some(&admin));

    assert!(unqualified.visible);
    assert!(unqualified.inline);
    assert_eq!(unqualified.label, None);
    assert!(!qualified.visible);
    assert!(qualified.inline);
}

#[test]
fn overlay_cache_returns_the_same_arc() {
    let admin = Qualifier::of::<Admin>();
    let mut cache = OverlayCache::new();

    let first = Overlay::new(Some(admin), Detail::default(), Arc::new(1_u8));
    let first = Arc::clone(cache.insert(admin, first));
    let second = Overlay::new(Some(admin), Detail::new(false, false), Arc::new(2_u8));
    let second = Arc::clone(cache.insert(admin, second));

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(cache.get(&admin).unwrap(), &first));
    assert_eq!(**first, 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn overlay_answers_presentation_and_forwards_the_rest() {
    let admin = Qualifier::of::<Admin>();
    let detail = Presentation::new()
        .label("secret")
        .render("masked")
        .format("***");
    let overlay = Overlay::new(
        Some(admin),
        Detail::new(false, true).patched(&detail.detail),
        Arc::new(String::from("delegate")),
    );

    assert_eq!(overlay.qualifier(), Some(admin));
    assert!(!overlay.is_visible());
    assert!(overlay.is_inline());
    assert_eq!(overlay.label(), Some("secret"));
    assert_eq!(overlay.render_hints(), ["masked".to_string()]);
    assert_eq!(overlay.format(), Some("***"));
    assert_eq!(overlay.len(), "delegate".len());
}

#[test]
fn overlay_relation_shadows_nothing_until_set() {
    let overlay = Overlay::new(None, Detail::default(), Arc::new(()));
    assert!(overlay.own_relation().is_none());

    let overlay = overlay.with_relation(Some(RelationModel::new(
        RelationKind::Composition,
        Some("Part".into()),
    )));
    assert_eq!(
        overlay.own_relation().map(ToString::to_string).as_deref(),
        Some("Composition -> Part")
    );
}

#[test]
fn qualifiers_order_by_name() {
    let admin = Qualifier::of::<Admin>();
    let public = Qualifier::of::<Public>();

    assert!(admin < public);
    assert_eq!(admin.to_string(), "Admin");
    assert_eq!(format!("{public:?}"), "Qualifier(Public)");
}
