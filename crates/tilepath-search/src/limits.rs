/// Bounds on how far a search may expand.
///
/// With no limits a search covers everything reachable on the map.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchLimits {
    /// Highest number of turn boundaries a path may cross.
    pub max_turns: Option<u32>,
    /// Highest cumulative cost a path may reach.
    pub max_cost: Option<i32>,
}

impl SearchLimits {
    /// No limits.
    pub const NONE: Self = Self {
        max_turns: None,
        max_cost: None,
    };

    /// Limit the search to paths crossing at most `turns` turn boundaries.
    pub fn turns(turns: u32) -> Self {
        Self {
            max_turns: Some(turns),
            ..Self::NONE
        }
    }

    /// Also limit cumulative cost.
    pub fn with_max_cost(mut self, cost: i32) -> Self {
        self.max_cost = Some(cost);
        self
    }

    /// Whether a node with the given turns and cost is within bounds.
    #[inline]
    pub fn allows(&self, turns: u32, cost: i32) -> bool {
        self.max_turns.is_none_or(|t| turns <= t) && self.max_cost.is_none_or(|c| cost <= c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_everything() {
        let l = SearchLimits::default();
        assert_eq!(l, SearchLimits::NONE);
        assert!(l.allows(u32::MAX, i32::MAX));
    }

    #[test]
    fn turn_and_cost_bounds_are_inclusive() {
        let l = SearchLimits::turns(2).with_max_cost(10);
        assert!(l.allows(2, 10));
        assert!(!l.allows(3, 0));
        assert!(!l.allows(0, 11));
    }
}
