//! Identifier generation and deferred reference resolution.

mod common;

use common::{common_library, travel_model};
use otm_example::{
    navigate, DomAssembler, ExampleError, ExampleGenerator, ExampleVisitor, GenerationOptions,
    JsonAssembler,
};
use otm_model::ModelBuilder;
use pretty_assertions::assert_eq;

#[test]
fn test_idref_points_at_generated_id() {
    let travel = travel_model();
    let mut generator = ExampleGenerator::new(&travel.model, GenerationOptions::default());
    let document = generator.generate_xml(travel.trip.object).unwrap();

    let root = document.root_element().unwrap();
    assert_eq!(root.attribute("id"), Some("trip_1"));
    let previous = document.find_all("PreviousTrip");
    assert_eq!(previous[0].text.as_deref(), Some("trip_1"));
}

#[test]
fn test_idrefs_written_before_targets_exist() {
    let travel = travel_model();
    let mut generator = ExampleGenerator::new(&travel.model, GenerationOptions::default());
    let document = generator.generate_xml(travel.trip.object).unwrap();

    let legs: Vec<_> = document
        .find_all("LegDetail")
        .into_iter()
        .filter_map(|leg| leg.attribute("id"))
        .collect();
    assert_eq!(legs, vec!["leg_1", "leg_2", "leg_3"]);

    let refs = document.find_all("LegRefs");
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].text.as_deref(), Some("leg_1 leg_2 leg_3"));
}

#[test]
fn test_idrefs_token_count_follows_repeat() {
    let travel = travel_model();
    let options = GenerationOptions::default().with_max_repeat(2);
    let mut generator = ExampleGenerator::new(&travel.model, options);
    let document = generator.generate_xml(travel.trip.object).unwrap();

    assert_eq!(document.find_all("LegDetail").len(), 2);
    assert_eq!(
        document.find_all("LegRefs")[0].text.as_deref(),
        Some("leg_1 leg_2")
    );
}

#[test]
fn test_reference_without_target_is_empty() {
    let mut builder = ModelBuilder::new();
    let lib = common_library(&mut builder);
    let trip = builder.business_object(lib, "Trip").unwrap();
    let ghost = builder.business_object(lib, "Ghost").unwrap();
    builder
        .reference_attribute(trip.summary, "ghostRef", ghost.object, 1)
        .unwrap();
    let model = builder.build();

    let mut generator = ExampleGenerator::new(&model, GenerationOptions::default());
    let document = generator.generate_xml(trip.summary).unwrap();
    assert_eq!(document.root_element().unwrap().attribute("ghostRef"), Some(""));
}

#[test]
fn test_document_resolves_once() {
    let travel = travel_model();
    let options = GenerationOptions::default();
    let mut assembler = DomAssembler::new(&travel.model, options.clone());
    navigate(&travel.model, Some(travel.trip.object), &mut assembler, &options).unwrap();

    assert_eq!(assembler.pending_references(), 2);
    assert_eq!(
        assembler.tree().find_all("PreviousTrip")[0].text.as_deref(),
        Some("")
    );

    let first = assembler.document().clone();
    assert_eq!(assembler.pending_references(), 0);
    let second = assembler.document().clone();
    assert_eq!(first, second);
    assert_eq!(
        second.find_all("PreviousTrip")[0].text.as_deref(),
        Some("trip_1")
    );
}

#[test]
fn test_identifiers_restart_after_reset() {
    let travel = travel_model();
    let mut generator = ExampleGenerator::new(&travel.model, GenerationOptions::default());

    let first = generator.generate_xml(travel.trip.object).unwrap();
    let second = generator.generate_xml(travel.trip.object).unwrap();
    for document in [&first, &second] {
        assert_eq!(document.root_element().unwrap().attribute("id"), Some("trip_1"));
        assert_eq!(
            document.find_all("LegRefs")[0].text.as_deref(),
            Some("leg_1 leg_2 leg_3")
        );
    }
}

#[test]
fn test_json_references_resolve() {
    let travel = travel_model();
    let options = GenerationOptions::default();
    let mut assembler = JsonAssembler::new(&travel.model, options.clone());
    navigate(&travel.model, Some(travel.trip.object), &mut assembler, &options).unwrap();
    let value = assembler.into_document().to_value();

    assert_eq!(value["TripDetail"]["LegRefs"], "leg_1 leg_2 leg_3");
    assert_eq!(value["TripDetail"]["PreviousTrip"], "trip_1");
}

#[test]
fn test_attribute_outside_element_is_illegal() {
    let travel = travel_model();
    let id = travel
        .model
        .inherited_attributes(travel.trip.detail)
        .into_iter()
        .next()
        .unwrap();

    let mut assembler = DomAssembler::new(&travel.model, GenerationOptions::default());
    let err = assembler.start_attribute(id).unwrap_err();
    assert!(matches!(err, ExampleError::IllegalState(_)));

    let err = assembler.end_element(travel.trip.detail).unwrap_err();
    assert!(matches!(err, ExampleError::IllegalState(_)));
}
