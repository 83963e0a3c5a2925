use crate::{Count, Metric, Result, ShapeDescriptor};

/// Cost callback for one operator type.
///
/// Handlers are stateless; the same instance may be called for every
/// matching node, from any thread.
pub trait OpHandler: Send + Sync + 'static {
    /// Operator type the handler is registered under, e.g. `"GRU"`.
    fn op_type(&self) -> &'static str;

    fn estimate(
        &self,
        inputs: &[&dyn ShapeDescriptor],
        outputs: &[&dyn ShapeDescriptor],
        metric: Metric,
    ) -> Result<Count>;
}
