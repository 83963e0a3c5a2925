use std::fmt;

use crate::Metric;

/// Which operand of an operator node an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    Input(usize),
    Output(usize),
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Input(i) => write!(f, "input {i}"),
            Port::Output(i) => write!(f, "output {i}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CostError {
    /// The shape of a required operand is unresolved, or the operand is missing.
    #[error("shape of {port} is not available")]
    ShapeUnavailable { port: Port },

    #[error("{port} has rank {rank}, expected at least {required}")]
    RankTooLow {
        port: Port,
        rank: usize,
        required: usize,
    },

    #[error("metric {0} not implemented")]
    UnsupportedMetric(String),

    /// The exact count does not fit in a `Count`.
    #[error("{metric} count overflows u64")]
    Overflow { metric: Metric },
}

impl CostError {
    /// Shape problems depend only on the graph, so the node can be skipped.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            CostError::ShapeUnavailable { .. } | CostError::RankTooLow { .. }
        )
    }
}

pub type Result<T, E = CostError> = std::result::Result<T, E>;
