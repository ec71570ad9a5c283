//! Shared fixtures for the example generation tests.

#![allow(dead_code)]

use otm_example::{ExampleVisitor, Result};
use otm_model::{BusinessObjectIds, CoreObjectIds, EntityId, LibraryId, Model, ModelBuilder};
use tracing_subscriber::EnvFilter;

pub const COMMON_NS: &str = "http://example.com/common";
pub const TRAVEL_NS: &str = "http://example.com/travel";

/// Route `tracing` output to the test harness. Set `RUST_LOG=otm_example=trace`
/// to see navigation decisions.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn common_library(builder: &mut ModelBuilder) -> LibraryId {
    builder
        .library("Common", COMMON_NS, "c", "1.0.0")
        .expect("common library")
}

pub fn travel_library(builder: &mut ModelBuilder) -> LibraryId {
    builder
        .library("Travel", TRAVEL_NS, "t", "1.0.0")
        .expect("travel library")
}

/// A trip with identified legs, a vehicle and references back to both.
pub struct TravelModel {
    pub model: Model,
    pub vehicle: CoreObjectIds,
    pub leg: BusinessObjectIds,
    pub trip: BusinessObjectIds,
    pub mode: EntityId,
}

/// Builds:
///
/// ```text
/// Vehicle (core, c)   summary: Name="Roadster"   detail: Mode (Air|Rail|Sea)
/// Leg (bo, t)         id: @id                    summary: Origin="AMS"
/// Trip (bo, t)        id: @id                    summary: Name="Summer Tour"
///                     detail: LegRefs (IDREFS to Leg), Leg x3, Vehicle,
///                             PreviousTrip (IDREF to Trip)
/// ```
pub fn travel_model() -> TravelModel {
    let mut builder = ModelBuilder::new();
    let common = common_library(&mut builder);
    let travel = travel_library(&mut builder);
    let string = builder.xsd_builtin("string").unwrap();
    let id = builder.xsd_builtin("ID").unwrap();

    let mode = builder
        .enumeration(common, "TransportMode", false, &["Air", "Rail", "Sea"])
        .unwrap();

    let vehicle = builder.core_object(common, "Vehicle").unwrap();
    let vehicle_name = builder.property(vehicle.summary, "Name", string, 1).unwrap();
    builder.example(vehicle_name, "default", "Roadster").unwrap();
    builder.property(vehicle.detail, "Mode", mode, 1).unwrap();

    let leg = builder.business_object(travel, "Leg").unwrap();
    builder.attribute(leg.id, "id", id).unwrap();
    let origin = builder.property(leg.summary, "Origin", string, 1).unwrap();
    builder.example(origin, "default", "AMS").unwrap();

    let trip = builder.business_object(travel, "Trip").unwrap();
    builder.attribute(trip.id, "id", id).unwrap();
    let trip_name = builder.property(trip.summary, "Name", string, 1).unwrap();
    builder.example(trip_name, "default", "Summer Tour").unwrap();
    builder
        .reference_property(trip.detail, "LegRefs", leg.object, -1)
        .unwrap();
    builder.property(trip.detail, "Leg", leg.object, 3).unwrap();
    builder.property(trip.detail, "Vehicle", vehicle.object, 1).unwrap();
    builder
        .reference_property(trip.detail, "PreviousTrip", trip.object, 0)
        .unwrap();

    TravelModel {
        model: builder.build(),
        vehicle,
        leg,
        trip,
        mode,
    }
}

/// Visitor that records the structural events it receives.
///
/// Events are logged as `+kind name` / `-kind name`, with facets named by
/// entity name.
pub struct EventRecorder<'m> {
    model: &'m Model,
    pub events: Vec<String>,
    facet_depth: usize,
    pub max_facet_depth: usize,
}

impl<'m> EventRecorder<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            events: Vec::new(),
            facet_depth: 0,
            max_facet_depth: 0,
        }
    }

    fn record(&mut self, marker: char, kind: &str, entity: EntityId) {
        self.events
            .push(format!("{}{} {}", marker, kind, self.model.name(entity)));
    }

    pub fn count(&self, event: &str) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    /// True if every start event is closed by its matching end, innermost first.
    pub fn is_balanced(&self) -> bool {
        let mut open: Vec<&str> = Vec::new();
        for event in &self.events {
            if let Some(started) = event.strip_prefix('+') {
                open.push(started);
            } else if let Some(ended) = event.strip_prefix('-') {
                if open.pop() != Some(ended) {
                    return false;
                }
            }
        }
        open.is_empty()
    }
}

impl ExampleVisitor for EventRecorder<'_> {
    fn start_facet(&mut self, facet: EntityId) -> Result<()> {
        self.facet_depth += 1;
        self.max_facet_depth = self.max_facet_depth.max(self.facet_depth);
        self.record('+', "facet", facet);
        Ok(())
    }

    fn end_facet(&mut self, facet: EntityId) -> Result<()> {
        self.facet_depth -= 1;
        self.record('-', "facet", facet);
        Ok(())
    }

    fn start_list_facet(&mut self, list: EntityId, role: Option<&str>) -> Result<()> {
        let kind = format!("list[{}]", role.unwrap_or("-"));
        self.record('+', &kind, list);
        Ok(())
    }

    fn end_list_facet(&mut self, list: EntityId, role: Option<&str>) -> Result<()> {
        let kind = format!("list[{}]", role.unwrap_or("-"));
        self.record('-', &kind, list);
        Ok(())
    }

    fn start_element(&mut self, property: EntityId) -> Result<()> {
        self.record('+', "element", property);
        Ok(())
    }

    fn end_element(&mut self, property: EntityId) -> Result<()> {
        self.record('-', "element", property);
        Ok(())
    }

    fn start_attribute(&mut self, attribute: EntityId) -> Result<()> {
        self.record('+', "attribute", attribute);
        Ok(())
    }

    fn end_attribute(&mut self, attribute: EntityId) -> Result<()> {
        self.record('-', "attribute", attribute);
        Ok(())
    }

    fn start_extension_point(&mut self, facet: EntityId) -> Result<()> {
        self.record('+', "extension", facet);
        Ok(())
    }

    fn end_extension_point(&mut self, facet: EntityId) -> Result<()> {
        self.record('-', "extension", facet);
        Ok(())
    }

    fn start_action_payload(&mut self, action: EntityId) -> Result<()> {
        self.record('+', "payload", action);
        Ok(())
    }

    fn end_action_payload(&mut self, action: EntityId) -> Result<()> {
        self.record('-', "payload", action);
        Ok(())
    }
}
