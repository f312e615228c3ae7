use std::fmt;

/// Discrete confidence bucket for a probability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    VeryLow,
}

/// Display color group of a [`ConfidenceLevel`].
///
/// `Low` and `VeryLow` share `Doubtful`, so four labels map onto three colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorTier {
    Confident,
    Hesitant,
    Doubtful,
}

impl ConfidenceLevel {
    /// Buckets `probability` with inclusive lower bounds at 0.8, 0.5 and 0.2.
    /// NaN falls through to `VeryLow`.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.8 {
            ConfidenceLevel::High
        } else if probability >= 0.5 {
            ConfidenceLevel::Medium
        } else if probability >= 0.2 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::High => "HIGH",
            ConfidenceLevel::Medium => "MED",
            ConfidenceLevel::Low => "LOW",
            ConfidenceLevel::VeryLow => "VLOW",
        }
    }

    pub fn tier(self) -> ColorTier {
        match self {
            ConfidenceLevel::High => ColorTier::Confident,
            ConfidenceLevel::Medium => ColorTier::Hesitant,
            ConfidenceLevel::Low | ConfidenceLevel::VeryLow => ColorTier::Doubtful,
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
