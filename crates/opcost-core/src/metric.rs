use std::fmt;
use std::str::FromStr;

use crate::CostError;

/// Operation or activation counts. Exact, never rounded.
pub type Count = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    Flops,
    Activations,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Flops, Metric::Activations];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Flops => "FLOPs",
            Metric::Activations => "activations",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("flops") {
            return Ok(Metric::Flops);
        }
        if s.eq_ignore_ascii_case("activations") || s.eq_ignore_ascii_case("acts") {
            return Ok(Metric::Activations);
        }
        Err(CostError::UnsupportedMetric(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!("FLOPs".parse::<Metric>(), Ok(Metric::Flops));
        assert_eq!("flops".parse::<Metric>(), Ok(Metric::Flops));
        assert_eq!("activations".parse::<Metric>(), Ok(Metric::Activations));
        assert_eq!("acts".parse::<Metric>(), Ok(Metric::Activations));
    }

    #[test]
    fn rejects_unknown_kind() {
        assert_eq!(
            "bogus".parse::<Metric>(),
            Err(CostError::UnsupportedMetric("bogus".to_string()))
        );
    }

    #[test]
    fn display_round_trips() {
        for metric in Metric::ALL {
            assert_eq!(metric.to_string().parse::<Metric>(), Ok(metric));
        }
    }
}
