//! Read accessors of the OTM model arena.

use otm_model::{EntityKind, FacetType, LibraryKind, ModelBuilder, ModelError, Version, XSD_NAMESPACE};
use pretty_assertions::assert_eq;

fn builder_with_library() -> (ModelBuilder, otm_model::LibraryId) {
    let mut builder = ModelBuilder::new();
    let lib = builder
        .library("Common", "http://example.com/common", "c", "1.2.0")
        .unwrap();
    (builder, lib)
}

#[test]
fn test_xsd_builtins_are_preloaded() {
    let model = ModelBuilder::new().build();
    let string = model.xsd_builtin("string").unwrap();
    let idrefs = model.xsd_builtin("IDREFS").unwrap();

    assert_eq!(model.namespace(string), XSD_NAMESPACE);
    assert!(model.is_xsd_builtin(idrefs, "IDREFS"));
    assert!(!model.is_xsd_builtin(string, "IDREFS"));
    assert_eq!(model.library_of(string).kind, LibraryKind::Legacy);
    assert!(model.xsd_builtin("nonsense").is_none());
}

#[test]
fn test_business_object_facet_chain() {
    let (mut builder, lib) = builder_with_library();
    let trip = builder.business_object(lib, "Trip").unwrap();
    let model = builder.build();

    assert_eq!(model.facet_chain(trip.detail), vec![trip.id, trip.summary, trip.detail]);
    assert_eq!(model.detail_chain(trip.summary), vec![trip.detail, trip.summary, trip.id]);
    assert_eq!(model.natural_facet(trip.object), Some(trip.summary));
    assert_eq!(model.owning_object(trip.detail), trip.object);
    assert_eq!(model.owning_object(trip.object), trip.object);
    assert_eq!(model.facet_type(trip.id), Some(FacetType::Id));
}

#[test]
fn test_inherited_members_keep_chain_order() {
    let (mut builder, lib) = builder_with_library();
    let string = builder.xsd_builtin("string").unwrap();
    let id = builder.xsd_builtin("ID").unwrap();
    let trip = builder.business_object(lib, "Trip").unwrap();
    let detail_prop = builder.property(trip.detail, "Status", string, 1).unwrap();
    let summary_prop = builder.property(trip.summary, "Name", string, 1).unwrap();
    let id_attr = builder.attribute(trip.id, "id", id).unwrap();
    let flag = builder.indicator(trip.summary, "Active", true).unwrap();
    let model = builder.build();

    assert_eq!(model.inherited_properties(trip.detail), vec![summary_prop, detail_prop]);
    assert_eq!(model.inherited_attributes(trip.detail), vec![id_attr]);
    assert_eq!(model.inherited_indicators(trip.summary), vec![flag]);
    assert!(model.is_indicator_element(flag));
    assert_eq!(model.owner(detail_prop), Some(trip.detail));
    assert_eq!(model.member_type(summary_prop), Some(string));
}

#[test]
fn test_facet_cycles_are_safe() {
    let (mut builder, lib) = builder_with_library();
    let choice = builder.choice_object(lib, "Payment").unwrap();
    let card = builder
        .contextual_facet(choice.object, FacetType::Choice, "Card", None)
        .unwrap();
    builder.set_facet_parent(choice.shared, card).unwrap();
    let model = builder.build();

    assert_eq!(model.facet_chain(card), vec![choice.shared, card]);
    assert_eq!(model.facet_chain(choice.shared), vec![card, choice.shared]);
    assert!(!model.declares_content(card));
}

#[test]
fn test_declares_content() {
    let (mut builder, lib) = builder_with_library();
    let string = builder.xsd_builtin("string").unwrap();
    let vehicle = builder.core_object(lib, "Vehicle").unwrap();
    let empty = builder.core_object(lib, "Empty").unwrap();
    builder.property(vehicle.summary, "Name", string, 1).unwrap();
    let model = builder.build();

    assert!(model.declares_content(vehicle.summary));
    assert!(model.declares_content(vehicle.detail));
    assert!(model.declares_content(vehicle.summary_list));
    assert!(!model.declares_content(vehicle.simple));
    assert!(model.declares_content(vehicle.object));
    assert!(!model.declares_content(empty.object));
    assert!(!model.declares_content(empty.detail_list));
}

#[test]
fn test_enumeration_values_include_parent_literals() {
    let (mut builder, lib) = builder_with_library();
    let base = builder
        .enumeration(lib, "BaseMode", false, &["Air", "Rail"])
        .unwrap();
    let mode = builder
        .enumeration(lib, "Mode", true, &["Sea", "Air"])
        .unwrap();
    builder.set_enumeration_parent(mode, base).unwrap();
    let vehicle = builder.core_object(lib, "Vehicle").unwrap();
    builder.add_role(vehicle.object, "Owner").unwrap();
    let model = builder.build();

    assert_eq!(model.enumeration_values(mode), vec!["Air", "Rail", "Sea"]);
    assert!(model.is_open_enumeration(mode));
    assert!(!model.is_open_enumeration(base));
    assert_eq!(model.enumeration_values(vehicle.roles), vec!["Owner"]);
    assert_eq!(model.roles(vehicle.object), ["Owner".to_string()]);
}

#[test]
fn test_version_predecessor_matches_facet() {
    let mut builder = ModelBuilder::new();
    let v1 = builder
        .library("Travel", "http://example.com/travel/v1", "t", "1.0.0")
        .unwrap();
    let v2 = builder
        .library("Travel", "http://example.com/travel/v1_1", "t", "1.1.0")
        .unwrap();
    let old = builder.business_object(v1, "Trip").unwrap();
    let old_query = builder
        .contextual_facet(old.object, FacetType::Query, "ByName", None)
        .unwrap();
    let new = builder.business_object(v2, "Trip").unwrap();
    let new_query = builder
        .contextual_facet(new.object, FacetType::Query, "ByName", None)
        .unwrap();
    builder.set_version_of(new.object, old.object).unwrap();
    let model = builder.build();

    assert_eq!(model.version_of(new.object), Some(old.object));
    assert_eq!(model.version_predecessor(new.detail), Some(old.detail));
    assert_eq!(model.version_predecessor(new_query), Some(old_query));
    assert_eq!(model.version_predecessor(old.detail), None);
    assert_eq!(model.library_of(new.detail).version, Version::new(1, 1, 0));
}

#[test]
fn test_find_by_namespace_and_name() {
    let (mut builder, lib) = builder_with_library();
    let vehicle = builder.core_object(lib, "Vehicle").unwrap();
    let model = builder.build();

    assert_eq!(model.find("http://example.com/common", "Vehicle"), Some(vehicle.object));
    assert_eq!(model.find("http://example.com/other", "Vehicle"), None);
    assert!(matches!(model.kind(vehicle.object), EntityKind::CoreObject(_)));
}

#[test]
fn test_builder_rejects_bad_input() {
    let mut builder = ModelBuilder::new();
    let err = builder
        .library("Bad", "http://example.com/bad", "b", "one")
        .unwrap_err();
    assert!(matches!(err, ModelError::InvalidVersion(_)));

    let err = builder.xsd_builtin("nonsense").unwrap_err();
    assert!(matches!(err, ModelError::UnknownBuiltin(name) if name == "nonsense"));

    let lib = builder
        .library("Common", "http://example.com/common", "c", "1.0")
        .unwrap();
    let string = builder.xsd_builtin("string").unwrap();
    let err = builder.add_role(string, "Owner").unwrap_err();
    assert!(matches!(err, ModelError::UnexpectedKind { .. }));

    let vehicle = builder.core_object(lib, "Vehicle").unwrap();
    let err = builder
        .extension_point_facet(lib, "Bad", vehicle.object)
        .unwrap_err();
    assert!(matches!(err, ModelError::UnexpectedKind { expected: "facet", .. }));
}
