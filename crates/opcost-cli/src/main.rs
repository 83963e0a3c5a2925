mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Command, MetricArg};
use opcost_core::{profile, Count, HandlerRegistry, Metric, OpNode, ValueInfo};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.log.as_deref() {
        Some(directives) => EnvFilter::try_new(directives).context("invalid --log filter")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let registry = default_registry();

    match cli.command {
        Command::Estimate {
            op,
            inputs,
            outputs,
            metric,
        } => {
            for (metric, count) in estimate(&registry, &op, &inputs, &outputs, metric)? {
                println!("{metric}: {count}");
            }
            Ok(())
        }
        Command::Ops => {
            for op_type in registry.op_types() {
                println!("{op_type}");
            }
            Ok(())
        }
    }
}

fn default_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    opcost_gru::register(&mut registry);
    registry
}

fn estimate(
    registry: &HandlerRegistry,
    op: &str,
    inputs: &[String],
    outputs: &[String],
    metric: MetricArg,
) -> Result<Vec<(Metric, Count)>> {
    let Some(op_type) = registry.resolve(op) else {
        bail!(
            "no cost handler for operator {op} (known: {})",
            registry.op_types().join(", ")
        );
    };

    let node = OpNode {
        name: op_type.to_lowercase(),
        op_type: op_type.to_string(),
        inputs: values("input", inputs)?,
        outputs: values("output", outputs)?,
    };

    let metrics: &[Metric] = match metric {
        MetricArg::Flops => &[Metric::Flops],
        MetricArg::Activations => &[Metric::Activations],
        MetricArg::All => &Metric::ALL,
    };

    let mut counts = Vec::with_capacity(metrics.len());
    for &metric in metrics {
        let report = profile(registry, std::slice::from_ref(&node), metric)
            .with_context(|| format!("estimating {metric} for {}", node.op_type))?;
        if let Some(skipped) = report.skipped.first() {
            bail!("cannot estimate {}: {}", skipped.op_type, skipped.reason);
        }
        counts.push((metric, report.total));
    }
    Ok(counts)
}

fn values(prefix: &str, shapes: &[String]) -> Result<Vec<ValueInfo>> {
    shapes
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let dims =
                parse_shape(raw).with_context(|| format!("{prefix} {i}: bad shape {raw:?}"))?;
            Ok(ValueInfo::dynamic(format!("{prefix}{i}"), dims))
        })
        .collect()
}

/// `1x10x8`, `1,10,8` or `1x?x8`; an empty string is a scalar.
fn parse_shape(raw: &str) -> Result<Vec<Option<usize>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    raw.split(['x', 'X', ','])
        .map(|d| {
            let d = d.trim();
            if d == "?" {
                return Ok(None);
            }
            let size: usize = d.parse().with_context(|| format!("invalid dim {d:?}"))?;
            Ok(Some(size))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_separators() {
        assert_eq!(parse_shape("1x10x8").unwrap(), vec![Some(1), Some(10), Some(8)]);
        assert_eq!(parse_shape("2, 1, 16").unwrap(), vec![Some(2), Some(1), Some(16)]);
        assert_eq!(parse_shape("1x?x8").unwrap(), vec![Some(1), None, Some(8)]);
        assert!(parse_shape("").unwrap().is_empty());
    }

    #[test]
    fn shape_rejects_garbage() {
        assert!(parse_shape("1xfoo").is_err());
        assert!(parse_shape("1x-2").is_err());
    }

    #[test]
    fn default_registry_knows_gru() {
        let registry = default_registry();
        assert!(registry.contains("GRU"));
    }

    #[test]
    fn estimate_rejects_unknown_op() {
        let registry = default_registry();
        let err = estimate(
            &registry,
            "LSTM",
            &["1x10x8".to_string()],
            &["1x10x16".to_string()],
            MetricArg::All,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no cost handler for operator LSTM"));
    }

    #[test]
    fn estimate_surfaces_unresolved_shapes() {
        let registry = default_registry();
        let err = estimate(
            &registry,
            "GRU",
            &["1x?x8".to_string()],
            &["1x10x16".to_string(), "1x1x16".to_string()],
            MetricArg::Flops,
        )
        .unwrap_err();
        assert!(err.to_string().contains("shape of input 0 is not available"));
    }

    fn shapes(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn estimate_single_layer() {
        let registry = default_registry();
        let counts = estimate(
            &registry,
            "gru",
            &shapes(&["1x10x8"]),
            &shapes(&["1x10x16", "1x1x16"]),
            MetricArg::All,
        )
        .unwrap();
        let lines: Vec<String> = counts
            .iter()
            .map(|(metric, count)| format!("{metric}: {count}"))
            .collect();
        assert_eq!(lines, vec!["FLOPs: 12320", "activations: 2560"]);
    }

    #[test]
    fn estimate_op_name_ignores_case() {
        let registry = default_registry();
        for op in ["GRU", "gru", "Gru"] {
            let counts = estimate(
                &registry,
                op,
                &shapes(&["1x10x8"]),
                &shapes(&["1x10x16", "1x1x16"]),
                MetricArg::Flops,
            )
            .unwrap();
            assert_eq!(counts, vec![(Metric::Flops, 12320)]);
        }
    }

    #[test]
    fn estimate_reports_overflow() {
        let registry = default_registry();
        let err = estimate(
            &registry,
            "GRU",
            &shapes(&["1x4294967296x8"]),
            &shapes(&["1x4294967296x4294967296", "1x1x16"]),
            MetricArg::Activations,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("activations count overflows u64"));
    }

    #[test]
    fn node_values_are_named_by_position() {
        let vs = values("output", &["1x10x16".to_string(), "1x1x16".to_string()]).unwrap();
        assert_eq!(vs[1].name.0, "output1");
        assert_eq!(vs[1].dims, vec![Some(1), Some(1), Some(16)]);
    }
}
