use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "opcost", version, about = "Static cost estimates for graph operators")]
pub struct Cli {
    /// Log filter (RUST_LOG syntax); overrides RUST_LOG, defaults to `warn`
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Estimate the cost of one operator node from its operand shapes
    Estimate {
        /// Operator type of the node, matched ignoring case
        #[arg(long, default_value = "GRU")]
        op: String,

        /// Input shape, dims separated by `x` or `,`; `?` marks an unknown dim
        #[arg(long = "input", required = true)]
        inputs: Vec<String>,

        /// Output shape, same syntax as --input
        #[arg(long = "output", required = true)]
        outputs: Vec<String>,

        /// Which count to report
        #[arg(long, value_enum, default_value_t = MetricArg::All)]
        metric: MetricArg,
    },
    /// List operator types with a registered cost handler
    Ops,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    Flops,
    Activations,
    All,
}
