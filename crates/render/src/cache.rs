//! The immutable page cache and its render units.

use std::collections::HashMap;

use serde::Serialize;
use tera::{Context, Tera};

use crate::error::RenderError;

/// One composed, executable template set: the shared base layout, every
/// shared partial, and a single page fragment, resolvable as one graph.
///
/// Units are built once at startup and never mutated, so they may be read
/// from any number of request tasks without synchronization.
#[derive(Debug)]
pub struct RenderUnit {
    name: String,
    engine: Tera,
}

impl RenderUnit {
    pub(crate) fn new(name: String, engine: Tera) -> Self {
        Self { name, engine }
    }

    /// The page identifier this unit renders.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Executes the unit against `data` into a private buffer.
    ///
    /// The buffer is only returned on complete success. Execution is not
    /// atomic — a fault can occur after output has been produced — so on any
    /// error the buffer is discarded whole and the caller gets nothing to
    /// accidentally forward to a client.
    pub fn render<T: Serialize>(&self, data: &T) -> Result<Vec<u8>, RenderError> {
        let context = Context::from_serialize(data).map_err(|source| RenderError::Context {
            page: self.name.clone(),
            source,
        })?;

        let mut buf = Vec::new();
        match self.engine.render_to(&self.name, &context, &mut buf) {
            Ok(()) => Ok(buf),
            Err(source) => Err(RenderError::Execute {
                page: self.name.clone(),
                source,
            }),
        }
    }
}

/// Mapping from page identifier to its composed render unit.
///
/// Built synchronously before the server starts accepting connections and
/// read-only afterwards. A lookup miss means a route references a page the
/// builder never registered — a deployment defect, reported as an internal
/// error rather than a 404.
#[derive(Debug, Default)]
pub struct TemplateCache {
    units: HashMap<String, RenderUnit>,
}

impl TemplateCache {
    pub(crate) fn from_units(units: HashMap<String, RenderUnit>) -> Self {
        Self { units }
    }

    /// Resolves a page identifier to its render unit.
    pub fn lookup(&self, page: &str) -> Option<&RenderUnit> {
        self.units.get(page)
    }

    /// Resolves and executes a page in one step.
    pub fn render<T: Serialize>(&self, page: &str, data: &T) -> Result<Vec<u8>, RenderError> {
        let unit = self
            .lookup(page)
            .ok_or_else(|| RenderError::UnknownPage(page.to_string()))?;
        unit.render(data)
    }

    /// Registered page identifiers, in no particular order.
    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
