//! # otm-model
//!
//! Read-only arena model of OTM libraries and the entities they declare.
//!
//! The model is the external collaborator of the example generation engine:
//! it is built once (see [`ModelBuilder`]), assumed to be validated, and then
//! only ever read. Entities reference each other through [`EntityId`]s, which
//! keeps cyclic structures (facets extending facets, objects referring to
//! themselves) cheap to represent and lets callers compare entities by
//! identity.
//!
//! ## Usage
//!
//! ```
//! use otm_model::ModelBuilder;
//!
//! let mut builder = ModelBuilder::new();
//! let lib = builder.library("Common", "http://example.com/common", "c", "1.0.0")?;
//! let string = builder.xsd_builtin("string")?;
//! let vehicle = builder.core_object(lib, "Vehicle")?;
//! builder.property(vehicle.summary, "Name", string, 1)?;
//!
//! let model = builder.build();
//! assert!(model.declares_content(vehicle.summary));
//! # Ok::<(), otm_model::ModelError>(())
//! ```

pub mod builder;
pub mod entity;
pub mod id;
pub mod library;
pub mod model;

use thiserror::Error;

pub use builder::{BusinessObjectIds, ChoiceObjectIds, CoreObjectIds, ModelBuilder};
pub use entity::*;
pub use id::{EntityId, LibraryId};
pub use library::{Library, LibraryKind, Version, XSD_NAMESPACE};
pub use model::Model;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("unknown library {0}")]
    UnknownLibrary(LibraryId),

    #[error("'{name}' is a {actual}, expected a {expected}")]
    UnexpectedKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("{0:?} facets are not contextual")]
    NotContextual(FacetType),

    #[error("invalid library version '{0}'")]
    InvalidVersion(String),

    #[error("unknown XSD built-in type '{0}'")]
    UnknownBuiltin(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
