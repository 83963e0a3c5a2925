use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{Count, CostError, HandlerRegistry, Metric, Result, ShapeDescriptor, ValueInfo};

/// One operator node as seen by the host graph walker.
#[derive(Clone, Debug)]
pub struct OpNode {
    pub name: String,
    pub op_type: String,
    pub inputs: Vec<ValueInfo>,
    pub outputs: Vec<ValueInfo>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedNode {
    pub name: String,
    pub op_type: String,
    pub reason: CostError,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostReport {
    pub metric: Metric,
    pub total: Count,
    pub per_op_type: BTreeMap<String, Count>,
    pub skipped: Vec<SkippedNode>,
    /// Nodes whose operator type has no registered handler.
    pub unhandled: usize,
}

impl CostReport {
    fn empty(metric: Metric) -> Self {
        Self {
            metric,
            total: 0,
            per_op_type: BTreeMap::new(),
            skipped: Vec::new(),
            unhandled: 0,
        }
    }
}

/// Sums `metric` over `nodes`.
///
/// Nodes with unresolved shapes are skipped and recorded; an unsupported
/// metric aborts the walk.
pub fn profile(registry: &HandlerRegistry, nodes: &[OpNode], metric: Metric) -> Result<CostReport> {
    let mut report = CostReport::empty(metric);

    for node in nodes {
        let inputs: Vec<&dyn ShapeDescriptor> = node
            .inputs
            .iter()
            .map(|v| v as &dyn ShapeDescriptor)
            .collect();
        let outputs: Vec<&dyn ShapeDescriptor> = node
            .outputs
            .iter()
            .map(|v| v as &dyn ShapeDescriptor)
            .collect();

        match registry.estimate(&node.op_type, &inputs, &outputs, metric) {
            None => {
                debug!(node = %node.name, op_type = %node.op_type, "no cost handler");
                report.unhandled += 1;
            }
            Some(Ok(count)) => {
                debug!(node = %node.name, op_type = %node.op_type, %metric, count, "estimated");
                report.total = report
                    .total
                    .checked_add(count)
                    .ok_or(CostError::Overflow { metric })?;
                let per_op = report.per_op_type.entry(node.op_type.clone()).or_default();
                *per_op = per_op
                    .checked_add(count)
                    .ok_or(CostError::Overflow { metric })?;
            }
            Some(Err(err)) if err.is_shape_error() => {
                warn!(node = %node.name, op_type = %node.op_type, error = %err, "skipping node");
                report.skipped.push(SkippedNode {
                    name: node.name.clone(),
                    op_type: node.op_type.clone(),
                    reason: err,
                });
            }
            Some(Err(err)) => return Err(err),
        }
    }

    Ok(report)
}
