//! FLOPs and activation estimates for GRU operators.
//!
//! The operator is described only by its operand shapes: `inputs[0]` is the
//! input sequence (`[batch, seq_len, input_size]`), `outputs[0]` the output
//! sequence (last dim `output_size`) and `outputs[1]` the final hidden state
//! (first dim `num_layers`).

use opcost_core::{
    Count, CostError, HandlerRegistry, Metric, OpHandler, Port, Result, Shape, ShapeDescriptor,
};

pub const OP_TYPE: &str = "GRU";

/// Intermediate tensors produced per cell step, each `[output_size]`:
///
/// | step                                  | count |
/// |---------------------------------------|-------|
/// | `r_ir = W_ir x_t + b_ir`              | 1     |
/// | `r_hr = W_hr h_(t-1) + b_hr`          | 1     |
/// | `r_t = sigmoid(r_ir + r_hr)`          | 2     |
/// | `z_iz = W_iz x_t + b_iz`              | 1     |
/// | `z_hz = W_hz h_(t-1) + b_hz`          | 1     |
/// | `z_t = sigmoid(z_iz + z_hz)`          | 2     |
/// | `n_in = W_in x_t + b_in`              | 1     |
/// | `n_hn = W_hn h_(t-1) + b_hn`          | 1     |
/// | `n_r_t = n_hn * r_t`                  | 1     |
/// | `n_t = tanh(n_in + n_r_t)`            | 1     |
/// | `h_zn_t = (1 - z_t) * n_t`            | 2     |
/// | `h_zh_t = z_t * h_(t-1)`              | 1     |
/// | `h_t = h_zn_t + h_zh_t`               | 1     |
pub const ACTIVATIONS_PER_STEP: Count = 16;

/// The four sizes the cost model needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GruDims {
    pub seq_len: Count,
    pub input_size: Count,
    pub output_size: Count,
    pub num_layers: Count,
}

impl GruDims {
    pub fn from_values<I, O>(inputs: &[I], outputs: &[O]) -> Result<Self>
    where
        I: ShapeDescriptor,
        O: ShapeDescriptor,
    {
        let x = resolved(inputs, Port::Input(0))?;
        let y = resolved(outputs, Port::Output(0))?;
        let h = resolved(outputs, Port::Output(1))?;

        Ok(Self {
            seq_len: dim(&x, Port::Input(0), 1)?,
            input_size: dim(&x, Port::Input(0), -1)?,
            output_size: dim(&y, Port::Output(0), -1)?,
            num_layers: dim(&h, Port::Output(1), 0)?,
        })
    }

    /// One forward pass through the layer stack. The first layer takes
    /// `input_size` features in, every later layer `output_size`.
    pub fn flops(&self) -> Result<Count> {
        let overflow = || CostError::Overflow {
            metric: Metric::Flops,
        };

        let step = self
            .seq_len
            .checked_mul(self.output_size)
            .ok_or_else(overflow)?;
        if step == 0 || self.num_layers == 0 {
            return Ok(0);
        }

        let layer = |w_in: Count| -> Option<Count> {
            let flops_r = step.checked_mul(w_in.checked_add(self.output_size)?)?;
            let flops_z = flops_r;
            let flops_n = flops_r.checked_add(step)?;
            let flops_h = step.checked_mul(4)?;
            [flops_z, flops_n, flops_h]
                .into_iter()
                .try_fold(flops_r, Count::checked_add)
        };

        // Layers after the first all see the same widths.
        let first = layer(self.input_size).ok_or_else(overflow)?;
        let rest = match self.num_layers - 1 {
            0 => 0,
            n => layer(self.output_size)
                .and_then(|l| l.checked_mul(n))
                .ok_or_else(overflow)?,
        };
        first.checked_add(rest).ok_or_else(overflow)
    }

    pub fn activations(&self) -> Result<Count> {
        let factors = [self.num_layers, self.seq_len, self.output_size];
        if factors.contains(&0) {
            return Ok(0);
        }
        factors
            .into_iter()
            .try_fold(ACTIVATIONS_PER_STEP, Count::checked_mul)
            .ok_or(CostError::Overflow {
                metric: Metric::Activations,
            })
    }

    pub fn count(&self, metric: Metric) -> Result<Count> {
        match metric {
            Metric::Flops => self.flops(),
            Metric::Activations => self.activations(),
        }
    }
}

fn resolved<D: ShapeDescriptor>(values: &[D], port: Port) -> Result<Shape> {
    let index = match port {
        Port::Input(i) | Port::Output(i) => i,
    };
    values
        .get(index)
        .filter(|d| d.is_complete())
        .and_then(|d| d.sizes())
        .ok_or(CostError::ShapeUnavailable { port })
}

fn dim(shape: &Shape, port: Port, index: isize) -> Result<Count> {
    let size = shape.dim(index).ok_or(CostError::RankTooLow {
        port,
        rank: shape.rank(),
        required: if index < 0 {
            index.unsigned_abs()
        } else {
            index as usize + 1
        },
    })?;
    Ok(size as Count)
}

pub fn estimate<I, O>(inputs: &[I], outputs: &[O], metric: Metric) -> Result<Count>
where
    I: ShapeDescriptor,
    O: ShapeDescriptor,
{
    GruDims::from_values(inputs, outputs)?.count(metric)
}

pub fn estimate_flops<I, O>(inputs: &[I], outputs: &[O]) -> Result<Count>
where
    I: ShapeDescriptor,
    O: ShapeDescriptor,
{
    estimate(inputs, outputs, Metric::Flops)
}

pub fn estimate_activations<I, O>(inputs: &[I], outputs: &[O]) -> Result<Count>
where
    I: ShapeDescriptor,
    O: ShapeDescriptor,
{
    estimate(inputs, outputs, Metric::Activations)
}

/// Like [`estimate`], with the metric given by name (`"FLOPs"`, `"activations"`).
pub fn estimate_kind<I, O>(inputs: &[I], outputs: &[O], kind: &str) -> Result<Count>
where
    I: ShapeDescriptor,
    O: ShapeDescriptor,
{
    let metric: Metric = kind.parse()?;
    estimate(inputs, outputs, metric)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GruHandler;

impl OpHandler for GruHandler {
    fn op_type(&self) -> &'static str {
        OP_TYPE
    }

    fn estimate(
        &self,
        inputs: &[&dyn ShapeDescriptor],
        outputs: &[&dyn ShapeDescriptor],
        metric: Metric,
    ) -> Result<Count> {
        estimate(inputs, outputs, metric)
    }
}

pub fn register(registry: &mut HandlerRegistry) {
    registry.register(GruHandler);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(seq_len: Count, input_size: Count, output_size: Count, num_layers: Count) -> GruDims {
        GruDims {
            seq_len,
            input_size,
            output_size,
            num_layers,
        }
    }

    #[test]
    fn single_layer_closed_form() {
        let d = dims(10, 8, 16, 1);
        let expected = 3 * 10 * 16 * (8 + 16) + 10 * 16 + 4 * 10 * 16;
        assert_eq!(d.flops(), Ok(expected));
        assert_eq!(d.flops(), Ok(12320));
        assert_eq!(d.activations(), Ok(2560));
    }

    #[test]
    fn later_layers_take_output_width() {
        let d = dims(10, 8, 16, 2);
        let second = 3 * 10 * 16 * (16 + 16) + 10 * 16 + 4 * 10 * 16;
        assert_eq!(second, 16160);
        assert_eq!(d.flops(), Ok(12320 + second));
        assert_ne!(d.flops(), Ok(2 * 12320));
    }

    #[test]
    fn zero_layers_cost_nothing() {
        let d = dims(10, 8, 16, 0);
        assert_eq!(d.flops(), Ok(0));
        assert_eq!(d.activations(), Ok(0));
    }

    #[test]
    fn zero_factor_wins_over_huge_ones() {
        let d = dims(0, Count::MAX, Count::MAX, Count::MAX);
        assert_eq!(d.flops(), Ok(0));
        assert_eq!(d.activations(), Ok(0));
    }

    #[test]
    fn count_dispatches_on_metric() {
        let d = dims(3, 4, 5, 2);
        assert_eq!(d.count(Metric::Flops), d.flops());
        assert_eq!(d.count(Metric::Activations), d.activations());
    }

    #[test]
    fn oversized_dims_overflow() {
        let d = dims(1 << 32, 8, 1 << 32, 1);
        assert_eq!(
            d.flops(),
            Err(CostError::Overflow {
                metric: Metric::Flops
            })
        );
        assert_eq!(
            d.activations(),
            Err(CostError::Overflow {
                metric: Metric::Activations
            })
        );
    }

    #[test]
    fn many_layers_overflow_without_looping() {
        let d = dims(10, 8, 16, Count::MAX);
        assert_eq!(
            d.flops(),
            Err(CostError::Overflow {
                metric: Metric::Flops
            })
        );
    }

    #[test]
    fn largest_exact_activation_count() {
        // 16 * 2^30 * 2^16 * 2^13 == 2^63
        let d = dims(1 << 16, 1, 1 << 13, 1 << 30);
        assert_eq!(d.activations(), Ok(1 << 63));
    }
}
