/// How well a register row matches an extracted document record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchLevel {
    /// Neither strong field (name, spec) matched.
    None = 0,
    /// At least one strong field matched but discrepancies remain.
    Partial = 1,
    /// No discrepancies at all.
    Full = 2,
}

impl MatchLevel {
    pub fn label(&self) -> &'static str {
        match self {
            MatchLevel::None => "no match",
            MatchLevel::Partial => "partial match",
            MatchLevel::Full => "full match",
        }
    }
}

/// Outcome of matching one document against the register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub level: MatchLevel,
    /// Human-readable discrepancy messages, in comparison order.
    pub discrepancies: Vec<String>,
    /// Physical register row that matched, or `None` when no row did.
    pub matched_row: Option<u32>,
}

impl MatchResult {
    pub fn none(discrepancies: Vec<String>) -> Self {
        Self {
            level: MatchLevel::None,
            discrepancies,
            matched_row: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.level == MatchLevel::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(MatchLevel::Full > MatchLevel::Partial);
        assert!(MatchLevel::Partial > MatchLevel::None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(MatchLevel::Full.label(), "full match");
        assert_eq!(MatchLevel::Partial.label(), "partial match");
        assert_eq!(MatchLevel::None.label(), "no match");
    }
}
