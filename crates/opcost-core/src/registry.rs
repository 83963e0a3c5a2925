use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::{Count, Metric, OpHandler, Result, ShapeDescriptor};

#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn OpHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Installs `handler` under its operator type, replacing any earlier one.
    pub fn register<H: OpHandler>(&mut self, handler: H) {
        let op_type = handler.op_type().to_string();
        if self
            .handlers
            .insert(op_type.clone(), Arc::new(handler))
            .is_some()
        {
            debug!(op_type = %op_type, "replaced cost handler");
        } else {
            debug!(op_type = %op_type, "registered cost handler");
        }
    }

    /// Registered spelling of `name`, matched ignoring ASCII case.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some((op_type, _)) = self.handlers.get_key_value(name) {
            return Some(op_type.as_str());
        }
        self.handlers
            .keys()
            .find(|op_type| op_type.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    pub fn contains(&self, op_type: &str) -> bool {
        self.handlers.contains_key(op_type)
    }

    pub fn op_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// `None` when no handler is registered for `op_type`.
    pub fn estimate(
        &self,
        op_type: &str,
        inputs: &[&dyn ShapeDescriptor],
        outputs: &[&dyn ShapeDescriptor],
        metric: Metric,
    ) -> Option<Result<Count>> {
        let handler = self.handlers.get(op_type)?;
        Some(handler.estimate(inputs, outputs, metric))
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("op_types", &self.op_types())
            .finish()
    }
}
