//! Controller variant tags.

use crate::error::ControlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    Classical,
    Adaptive,
    SuperTwisting,
    Hybrid,
}

impl ControllerKind {
    pub const ALL: [ControllerKind; 4] = [
        ControllerKind::Classical,
        ControllerKind::Adaptive,
        ControllerKind::SuperTwisting,
        ControllerKind::Hybrid,
    ];

    /// Length of the gain vector for this variant.
    pub fn gain_count(self) -> usize {
        match self {
            ControllerKind::Classical => 6,
            ControllerKind::Adaptive => 5,
            ControllerKind::SuperTwisting => 6,
            ControllerKind::Hybrid => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ControllerKind::Classical => "classical_smc",
            ControllerKind::Adaptive => "adaptive_smc",
            ControllerKind::SuperTwisting => "sta_smc",
            ControllerKind::Hybrid => "hybrid_adaptive_sta_smc",
        }
    }

    /// Names of the gains, in vector order.
    pub fn gain_names(self) -> &'static [&'static str] {
        match self {
            ControllerKind::Classical => &["k1", "k2", "lambda1", "lambda2", "K", "kd"],
            ControllerKind::Adaptive => &["k1", "k2", "lambda1", "lambda2", "gamma"],
            ControllerKind::SuperTwisting => &["K1", "K2", "k1", "k2", "lambda1", "lambda2"],
            ControllerKind::Hybrid => &["c1", "lambda1", "c2", "lambda2"],
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControllerKind {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classical_smc" | "classical" => Ok(ControllerKind::Classical),
            "adaptive_smc" | "adaptive" => Ok(ControllerKind::Adaptive),
            "sta_smc" | "super_twisting" | "sta" => Ok(ControllerKind::SuperTwisting),
            "hybrid_adaptive_sta_smc" | "hybrid" => Ok(ControllerKind::Hybrid),
            other => Err(ControlError::UnknownKind {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_counts() {
        assert_eq!(ControllerKind::Classical.gain_count(), 6);
        assert_eq!(ControllerKind::Adaptive.gain_count(), 5);
        assert_eq!(ControllerKind::SuperTwisting.gain_count(), 6);
        assert_eq!(ControllerKind::Hybrid.gain_count(), 4);
        for kind in ControllerKind::ALL {
            assert_eq!(kind.gain_names().len(), kind.gain_count());
        }
    }

    #[test]
    fn parses_canonical_and_short_names() {
        for kind in ControllerKind::ALL {
            assert_eq!(kind.as_str().parse::<ControllerKind>().unwrap(), kind);
        }
        assert_eq!(
            "super_twisting".parse::<ControllerKind>().unwrap(),
            ControllerKind::SuperTwisting
        );
        assert!("mpc".parse::<ControllerKind>().is_err());
    }
}
