// Breakpoint domain model - viewport width tiers
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Viewport width tier. Declaration order is ascending by width, so the
/// derived `Ord` sorts from the narrowest tier to the widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    #[default]
    Xxs,
    Xs,
    Sm,
    Md,
    Lg,
    Xl,
}

impl Breakpoint {
    /// Every tier, narrowest first.
    pub const ALL: [Breakpoint; 6] = [
        Breakpoint::Xxs,
        Breakpoint::Xs,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
    ];

    /// Minimum viewport width (px) at which this tier applies.
    pub const fn min_width(self) -> u32 {
        match self {
            Breakpoint::Xl => 1600,
            Breakpoint::Lg => 1200,
            Breakpoint::Md => 996,
            Breakpoint::Sm => 768,
            Breakpoint::Xs => 480,
            Breakpoint::Xxs => 0,
        }
    }

    /// Grid column count for this tier.
    pub const fn cols(self) -> u32 {
        match self {
            Breakpoint::Xl | Breakpoint::Lg => 12,
            Breakpoint::Md => 10,
            Breakpoint::Sm => 6,
            Breakpoint::Xs => 4,
            Breakpoint::Xxs => 2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Breakpoint::Xxs => "xxs",
            Breakpoint::Xs => "xs",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
        }
    }

    /// Map a viewport width to its tier: thresholds are tested from the
    /// widest tier down and the first match wins, defaulting to `Xxs`.
    pub fn resolve(width: u32) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|bp| width >= bp.min_width())
            .unwrap_or(Breakpoint::Xxs)
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown breakpoint '{0}'")]
pub struct UnknownBreakpoint(pub String);

impl FromStr for Breakpoint {
    type Err = UnknownBreakpoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|bp| bp.as_str() == s)
            .ok_or_else(|| UnknownBreakpoint(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_thresholds() {
        assert_eq!(Breakpoint::resolve(1920), Breakpoint::Xl);
        assert_eq!(Breakpoint::resolve(1600), Breakpoint::Xl);
        assert_eq!(Breakpoint::resolve(1599), Breakpoint::Lg);
        assert_eq!(Breakpoint::resolve(1200), Breakpoint::Lg);
        assert_eq!(Breakpoint::resolve(1000), Breakpoint::Md);
        assert_eq!(Breakpoint::resolve(800), Breakpoint::Sm);
        assert_eq!(Breakpoint::resolve(480), Breakpoint::Xs);
        assert_eq!(Breakpoint::resolve(320), Breakpoint::Xxs);
        assert_eq!(Breakpoint::resolve(0), Breakpoint::Xxs);
    }

    #[test]
    fn test_lg_has_twelve_columns() {
        assert_eq!(Breakpoint::Lg.cols(), 12);
    }

    #[test]
    fn test_serde_uses_lowercase_keys() {
        assert_eq!(serde_json::to_string(&Breakpoint::Xxs).unwrap(), "\"xxs\"");
        let bp: Breakpoint = serde_json::from_str("\"md\"").unwrap();
        assert_eq!(bp, Breakpoint::Md);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("lg".parse::<Breakpoint>().unwrap(), Breakpoint::Lg);
        assert!("huge".parse::<Breakpoint>().is_err());
    }
}
