use std::fmt;
use std::str::FromStr;

use minion_core::harness::vectors::{
    all_n_msgs, basic_multiple_msgs, basic_single_msgs, random_msgs, MsgPair,
};

/// Traffic patterns from the minion's directed and random test table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// One write then a read of the same word.
    BasicSingle,
    /// Write/read pairs at the first, a middle and the last word.
    BasicMultiple,
    /// Fill every word, then random reads and writes.
    Random,
    /// Constant-value traffic.
    AllN,
}

impl Scenario {
    /// Every scenario in listing order.
    pub const ALL: [Self; 4] = [Self::BasicSingle, Self::BasicMultiple, Self::Random, Self::AllN];

    /// Command-line name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BasicSingle => "basic_single",
            Self::BasicMultiple => "basic_multiple",
            Self::Random => "random",
            Self::AllN => "all_n",
        }
    }

    /// One-line description for `list`.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::BasicSingle => "write 0xdeadbeef to word 0 and read it back",
            Self::BasicMultiple => "write/read pairs at words 0, 2 and 126",
            Self::Random => "128 seeded writes then 128 random reads and writes",
            Self::AllN => "fill with one value then 150 random accesses",
        }
    }

    /// Request/response pairs; `seed` drives the random scenarios and
    /// `value` is the constant for [`Self::AllN`].
    #[must_use]
    pub fn pairs(self, seed: u64, value: u32) -> Vec<MsgPair> {
        match self {
            Self::BasicSingle => basic_single_msgs(),
            Self::BasicMultiple => basic_multiple_msgs(),
            Self::Random => random_msgs(seed),
            Self::AllN => all_n_msgs(value, seed),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| format!("unknown scenario: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::Scenario;

    #[test]
    fn names_round_trip_through_from_str() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.name().parse::<Scenario>(), Ok(scenario));
        }
        assert!("random_3_5".parse::<Scenario>().is_err());
    }

    #[test]
    fn all_n_uses_the_requested_value() {
        let pairs = Scenario::AllN.pairs(1, 0x5a5a_5a5a);
        assert!(pairs
            .iter()
            .all(|(req, _)| req.data == 0 || req.data == 0x5a5a_5a5a));
        assert_eq!(Scenario::BasicSingle.pairs(1, 0).len(), 2);
    }
}
