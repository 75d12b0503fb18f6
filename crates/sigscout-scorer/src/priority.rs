/// Score thresholds separating the priority tiers.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub high: u32,
    pub medium: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 70,
            medium: 50,
        }
    }
}

/// Discrete triage bucket derived from a total score.
///
/// Ordered `Low < Medium < High` so tier comparisons follow score
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Bucket a total score: `>= high` is High, `>= medium` is Medium,
    /// everything else Low.
    #[must_use]
    pub fn from_total(total: u32, thresholds: &Thresholds) -> Self {
        if total >= thresholds.high {
            Priority::High
        } else if total >= thresholds.medium {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds_bucket_correctly() {
        let t = Thresholds::default();
        assert_eq!(Priority::from_total(70, &t), Priority::High);
        assert_eq!(Priority::from_total(69, &t), Priority::Medium);
        assert_eq!(Priority::from_total(50, &t), Priority::Medium);
        assert_eq!(Priority::from_total(49, &t), Priority::Low);
        assert_eq!(Priority::from_total(0, &t), Priority::Low);
        assert_eq!(Priority::from_total(100, &t), Priority::High);
    }

    #[test]
    fn custom_thresholds_respected() {
        let t = Thresholds {
            high: 90,
            medium: 30,
        };
        assert_eq!(Priority::from_total(89, &t), Priority::Medium);
        assert_eq!(Priority::from_total(90, &t), Priority::High);
        assert_eq!(Priority::from_total(29, &t), Priority::Low);
    }

    #[test]
    fn tiering_is_monotonic_in_total() {
        let t = Thresholds::default();
        let mut previous = Priority::Low;
        for total in 0..=100 {
            let tier = Priority::from_total(total, &t);
            assert!(
                tier >= previous,
                "tier regressed at total {total}: {tier:?} < {previous:?}"
            );
            previous = tier;
        }
    }

    #[test]
    fn priority_display_is_lowercase() {
        assert_eq!(Priority::Low.to_string(), "low");
        assert_eq!(Priority::Medium.to_string(), "medium");
        assert_eq!(Priority::High.to_string(), "high");
    }
}
