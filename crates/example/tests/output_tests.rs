//! Serialized XML and JSON documents.

mod common;

use common::{init_tracing, travel_model, COMMON_NS, TRAVEL_NS};
use otm_example::{DetailLevel, ExampleError, ExampleGenerator, GenerationOptions};
use otm_model::ModelBuilder;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;

#[test]
fn test_trip_xml_document() {
    init_tracing();
    let travel = travel_model();
    let mut generator = ExampleGenerator::new(&travel.model, GenerationOptions::default());
    let xml = generator.generate_xml_string(travel.trip.object).unwrap();

    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(&format!(r#"xmlns:t="{}""#, TRAVEL_NS)));
    assert!(xml.contains(&format!(r#"xmlns:c="{}""#, COMMON_NS)));
    assert!(xml.contains(r#"id="trip_1""#));
    assert!(xml.contains("<t:Name>Summer Tour</t:Name>"));
    assert!(xml.contains("<t:LegRefs>leg_1 leg_2 leg_3</t:LegRefs>"));
    assert!(xml.contains(r#"<t:LegDetail id="leg_2">"#));
    assert!(xml.contains("<c:VehicleDetail>"));
    assert!(xml.contains("<c:Name>Roadster</c:Name>"));
    assert!(xml.contains("<c:Mode>Air</c:Mode>"));
    assert!(xml.contains("<t:PreviousTrip>trip_1</t:PreviousTrip>"));
    assert!(xml.trim_end().ends_with("</t:TripDetail>"));

    // Namespaces are declared on the root only.
    assert_eq!(xml.matches("xmlns:c=").count(), 1);
}

#[test]
fn test_library_versions_sharing_a_prefix() {
    let mut builder = ModelBuilder::new();
    let v1 = builder
        .library("Common", "http://example.com/common/v1", "c", "1.0.0")
        .unwrap();
    let v2 = builder
        .library("Common", "http://example.com/common/v2", "c", "2.0.0")
        .unwrap();
    let string = builder.xsd_builtin("string").unwrap();
    let old = builder.business_object(v1, "Trip").unwrap();
    builder.property(old.detail, "OldName", string, 1).unwrap();
    let new = builder.business_object(v2, "Trip").unwrap();
    builder.property(new.detail, "NewName", string, 1).unwrap();
    builder.set_facet_parent(new.id, old.detail).unwrap();
    let model = builder.build();

    let mut generator = ExampleGenerator::new(&model, GenerationOptions::default());
    let xml = generator.generate_xml_string(new.object).unwrap();

    assert!(xml.contains(r#"<c:TripDetail xmlns:c="http://example.com/common/v2" xmlns:c2="http://example.com/common/v1">"#));
    assert!(xml.contains("<c2:OldName>TextValue</c2:OldName>"));
    assert!(xml.contains("<c:NewName>"));
}

#[test]
fn test_trip_json_document() {
    let travel = travel_model();
    let mut generator = ExampleGenerator::new(&travel.model, GenerationOptions::default());
    let value = generator.generate_json_value(travel.trip.object).unwrap();

    assert_eq!(
        value,
        json!({
            "TripDetail": {
                "id": "trip_1",
                "Name": "Summer Tour",
                "LegRefs": "leg_1 leg_2 leg_3",
                "LegDetail": [
                    {"id": "leg_1", "Origin": "AMS"},
                    {"id": "leg_2", "Origin": "AMS"},
                    {"id": "leg_3", "Origin": "AMS"}
                ],
                "VehicleDetail": {"Name": "Roadster", "Mode": "Air"},
                "PreviousTrip": "trip_1"
            }
        })
    );
}

#[test]
fn test_json_string_is_pretty_printed() {
    let travel = travel_model();
    let options = GenerationOptions::default().with_detail_level(DetailLevel::Minimum);
    let mut generator = ExampleGenerator::new(&travel.model, options);
    let json = generator.generate_json_string(travel.vehicle.object).unwrap();

    assert_eq!(json, "{\n  \"Vehicle\": {\n    \"Name\": \"Roadster\"\n  }\n}");
}

#[test]
fn test_options_from_file() {
    let travel = travel_model();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"detailLevel": "MINIMUM", "maxRepeat": 1}}"#).unwrap();

    let options = GenerationOptions::from_file(file.path()).unwrap();
    assert_eq!(options.detail_level, DetailLevel::Minimum);
    assert_eq!(options.max_repeat, 1);
    assert_eq!(options.max_recursion_depth, 2);

    let mut generator = ExampleGenerator::new(&travel.model, options);
    let document = generator.generate_xml(travel.trip.object).unwrap();
    assert_eq!(document.root_element().unwrap().name.local, "Trip");
}

#[test]
fn test_unknown_preferred_facet_from_config() {
    let travel = travel_model();
    let json = format!(
        r#"{{"preferredFacets": {{"{}": 99999, "{}": {}}}}}"#,
        travel.trip.object.index(),
        travel.vehicle.object.index(),
        travel.mode.index()
    );
    let options = GenerationOptions::from_json_str(&json).unwrap();

    let mut generator = ExampleGenerator::new(&travel.model, options);
    let document = generator.generate_xml(travel.trip.object).unwrap();
    assert_eq!(document.root_element().unwrap().name.local, "TripDetail");
    assert_eq!(document.find_all("VehicleDetail").len(), 1);
}

#[test]
fn test_options_file_errors() {
    let missing = GenerationOptions::from_file("/nonexistent/otm-example-options.json").unwrap_err();
    assert!(matches!(missing, ExampleError::Io(_)));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"maxRecursionDepth": -1}}"#).unwrap();
    let invalid = GenerationOptions::from_file(file.path()).unwrap_err();
    assert!(matches!(invalid, ExampleError::Config(_)));
}
