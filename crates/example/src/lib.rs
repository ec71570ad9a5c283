//! # otm-example
//!
//! Example document generation for OTM models.
//!
//! Given a validated [`otm_model::Model`] and a root entity, this crate
//! synthesizes a representative XML or JSON instance document: every facet
//! member gets a plausible value, repeating members repeat, and ID/IDREF
//! pairs point at each other even when the reference is emitted before the
//! identifier it targets.
//!
//! ## Architecture
//!
//! 1. **Navigate** - [`navigate`] walks the model depth first from the root
//!    and emits start/end events, bounding recursion and repetition
//! 2. **Assemble** - an [`ExampleVisitor`] implementation builds the output
//!    tree ([`DomAssembler`] for XML, [`JsonAssembler`] for JSON)
//! 3. **Synthesize** - leaf values come from the shared
//!    [`ExampleValueGenerator`], which rotates enumeration literals and falls
//!    back through parent types
//! 4. **Resolve** - identifier references are queued during assembly and
//!    written once the tree is complete
//!
//! ## Usage
//!
//! ```
//! use otm_example::{ExampleGenerator, GenerationOptions};
//! use otm_model::ModelBuilder;
//!
//! let mut builder = ModelBuilder::new();
//! let lib = builder.library("Common", "http://example.com/common", "c", "1.0.0")?;
//! let string = builder.xsd_builtin("string")?;
//! let vehicle = builder.core_object(lib, "Vehicle")?;
//! let name = builder.property(vehicle.summary, "Name", string, 1)?;
//! builder.example(name, "default", "Roadster")?;
//! let model = builder.build();
//!
//! let mut generator = ExampleGenerator::new(&model, GenerationOptions::default());
//! let xml = generator.generate_xml_string(vehicle.object)?;
//! assert!(xml.contains("<c:Name>Roadster</c:Name>"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod assembler;
pub mod generator;
pub mod navigate;
pub mod options;
pub mod reference;
pub mod value;
pub mod visitor;

use otm_model::EntityId;
use thiserror::Error;

pub use assembler::dom::{DomAssembler, XmlDocument, XmlElement};
pub use assembler::json::{JsonAssembler, JsonTree};
pub use assembler::{ExampleTree, NodeId, TreeAssembler};
pub use generator::ExampleGenerator;
pub use navigate::{navigate, select_example_facet};
pub use options::{DetailLevel, GenerationOptions};
pub use reference::{IdRegistry, ReferenceResolver};
pub use value::{ExampleValueGenerator, UNKNOWN_VALUE};
pub use visitor::ExampleVisitor;

#[derive(Debug, Error)]
pub enum ExampleError {
    /// A visitor event arrived that the current state cannot accept.
    #[error("illegal example state: {0}")]
    IllegalState(String),

    #[error("no root entity to generate an example for")]
    MissingRoot,

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("example generation failed for '{root}': {source}")]
    Generation {
        root: String,
        #[source]
        source: Box<ExampleError>,
    },

    #[error("XML serialization error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ExampleError {
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Wrap an error raised while generating the example for `root`.
    pub fn generation(root: impl Into<String>, source: ExampleError) -> Self {
        Self::Generation {
            root: root.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExampleError>;
