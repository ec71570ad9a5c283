//! One-call example generation.

use crate::assembler::dom::{DomAssembler, XmlDocument};
use crate::assembler::json::{JsonAssembler, JsonTree};
use crate::navigate::navigate;
use crate::options::GenerationOptions;
use crate::value::ExampleValueGenerator;
use crate::{ExampleError, Result};
use otm_model::{EntityId, Model};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Generates XML and JSON examples for entities of one model.
///
/// Holds one assembler per output format and reuses them between calls.
/// Enumeration rotation carries over from one call to the next through the
/// shared [`ExampleValueGenerator`].
pub struct ExampleGenerator<'m> {
    model: &'m Model,
    options: GenerationOptions,
    values: Arc<ExampleValueGenerator>,
    dom: DomAssembler<'m>,
    json: JsonAssembler<'m>,
}

impl<'m> ExampleGenerator<'m> {
    pub fn new(model: &'m Model, options: GenerationOptions) -> Self {
        Self::with_value_generator(model, options, Arc::new(ExampleValueGenerator::default()))
    }

    /// Generator sharing `values` (and its rotation state) with other users.
    pub fn with_value_generator(
        model: &'m Model,
        options: GenerationOptions,
        values: Arc<ExampleValueGenerator>,
    ) -> Self {
        Self {
            model,
            dom: DomAssembler::with_value_generator(model, options.clone(), Arc::clone(&values)),
            json: JsonAssembler::with_value_generator(model, options.clone(), Arc::clone(&values)),
            options,
            values,
        }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn value_generator(&self) -> &Arc<ExampleValueGenerator> {
        &self.values
    }

    #[instrument(
        name = "otm.example.xml",
        skip(self, root),
        fields(root = %root),
        err
    )]
    pub fn generate_xml(&mut self, root: EntityId) -> Result<XmlDocument> {
        self.dom.reset();
        navigate(self.model, Some(root), &mut self.dom, &self.options)
            .map_err(|e| ExampleError::generation(root_name(self.model, root), e))?;
        let document = self.dom.document().clone();
        debug!("generated XML example with {} elements", document.len());
        Ok(document)
    }

    pub fn generate_xml_string(&mut self, root: EntityId) -> Result<String> {
        self.generate_xml(root)?
            .to_xml_string()
            .map_err(|e| ExampleError::generation(root_name(self.model, root), e))
    }

    #[instrument(
        name = "otm.example.json",
        skip(self, root),
        fields(root = %root),
        err
    )]
    pub fn generate_json(&mut self, root: EntityId) -> Result<JsonTree> {
        self.json.reset();
        navigate(self.model, Some(root), &mut self.json, &self.options)
            .map_err(|e| ExampleError::generation(root_name(self.model, root), e))?;
        Ok(self.json.document().clone())
    }

    pub fn generate_json_value(&mut self, root: EntityId) -> Result<Value> {
        Ok(self.generate_json(root)?.to_value())
    }

    pub fn generate_json_string(&mut self, root: EntityId) -> Result<String> {
        self.generate_json(root)?
            .to_json_string()
            .map_err(|e| ExampleError::generation(root_name(self.model, root), e))
    }
}

fn root_name(model: &Model, root: EntityId) -> String {
    model
        .get(root)
        .map(|entity| entity.name.clone())
        .unwrap_or_else(|| root.to_string())
}
