//! Scenario keys and the scenario catalog
//!
//! The nine grid scenarios combine an RT-axis change with an accuracy-axis
//! change. Two composite scenarios take priority over their grid cell:
//! `rt_short_acc_up_synergy` and `rt_slow_acc_down_fatigue`.

use crate::error::UnknownScenarioKey;
use crate::profile::Language;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Direction of the reaction-time change between two blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RtAxis {
    /// Faster by at least the RT threshold
    Short,
    /// Slower by at least the RT threshold
    Slow,
    /// Within the threshold
    Same,
}

/// Direction of the accuracy change between two blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccAxis {
    /// Improved by at least the accuracy threshold
    Up,
    /// Dropped by at least the accuracy threshold
    Down,
    /// Within the threshold
    Same,
}

/// One of the eleven behavioural scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKey {
    RtShortAccUp,
    RtShortAccDown,
    RtShortAccSame,
    RtSlowAccUp,
    RtSlowAccDown,
    RtSlowAccSame,
    RtSameAccUp,
    RtSameAccDown,
    RtSameAccSame,
    /// Much faster and much more accurate
    RtShortAccUpSynergy,
    /// Much slower and much less accurate
    RtSlowAccDownFatigue,
}

impl ScenarioKey {
    /// Every scenario, in catalog order
    pub const ALL: [ScenarioKey; 11] = [
        Self::RtShortAccUp,
        Self::RtShortAccDown,
        Self::RtShortAccSame,
        Self::RtSlowAccUp,
        Self::RtSlowAccDown,
        Self::RtSlowAccSame,
        Self::RtSameAccUp,
        Self::RtSameAccDown,
        Self::RtSameAccSame,
        Self::RtShortAccUpSynergy,
        Self::RtSlowAccDownFatigue,
    ];

    /// Number of scenarios
    pub const COUNT: usize = Self::ALL.len();

    /// Grid cell for an axis pair
    #[inline]
    #[must_use]
    pub const fn grid(rt: RtAxis, acc: AccAxis) -> Self {
        match (rt, acc) {
            (RtAxis::Short, AccAxis::Up) => Self::RtShortAccUp,
            (RtAxis::Short, AccAxis::Down) => Self::RtShortAccDown,
            (RtAxis::Short, AccAxis::Same) => Self::RtShortAccSame,
            (RtAxis::Slow, AccAxis::Up) => Self::RtSlowAccUp,
            (RtAxis::Slow, AccAxis::Down) => Self::RtSlowAccDown,
            (RtAxis::Slow, AccAxis::Same) => Self::RtSlowAccSame,
            (RtAxis::Same, AccAxis::Up) => Self::RtSameAccUp,
            (RtAxis::Same, AccAxis::Down) => Self::RtSameAccDown,
            (RtAxis::Same, AccAxis::Same) => Self::RtSameAccSame,
        }
    }

    /// Wire name (`rt_short_acc_up`, ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RtShortAccUp => "rt_short_acc_up",
            Self::RtShortAccDown => "rt_short_acc_down",
            Self::RtShortAccSame => "rt_short_acc_same",
            Self::RtSlowAccUp => "rt_slow_acc_up",
            Self::RtSlowAccDown => "rt_slow_acc_down",
            Self::RtSlowAccSame => "rt_slow_acc_same",
            Self::RtSameAccUp => "rt_same_acc_up",
            Self::RtSameAccDown => "rt_same_acc_down",
            Self::RtSameAccSame => "rt_same_acc_same",
            Self::RtShortAccUpSynergy => "rt_short_acc_up_synergy",
            Self::RtSlowAccDownFatigue => "rt_slow_acc_down_fatigue",
        }
    }

    /// Whether this is one of the two composite scenarios
    #[inline]
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::RtShortAccUpSynergy | Self::RtSlowAccDownFatigue)
    }

    /// Human description handed to the generator
    #[must_use]
    pub const fn description(self, language: Language) -> &'static str {
        match language {
            Language::En => match self {
                Self::RtShortAccUp => "Responses got faster and accuracy improved.",
                Self::RtShortAccDown => "Responses got faster but accuracy dropped.",
                Self::RtShortAccSame => "Responses got faster while accuracy held steady.",
                Self::RtSlowAccUp => "Responses got slower but accuracy improved.",
                Self::RtSlowAccDown => "Responses got slower and accuracy dropped.",
                Self::RtSlowAccSame => "Responses got slower while accuracy held steady.",
                Self::RtSameAccUp => "Response speed held steady and accuracy improved.",
                Self::RtSameAccDown => "Response speed held steady but accuracy dropped.",
                Self::RtSameAccSame => "Both response speed and accuracy held steady.",
                Self::RtShortAccUpSynergy => {
                    "Responses got faster and accuracy improved substantially at the same time."
                }
                Self::RtSlowAccDownFatigue => {
                    "Responses got much slower and accuracy dropped substantially, suggesting fatigue."
                }
            },
            Language::Ja => match self {
                Self::RtShortAccUp => "反応が速くなり、正答率も上がった。",
                Self::RtShortAccDown => "反応は速くなったが、正答率が下がった。",
                Self::RtShortAccSame => "反応が速くなり、正答率は維持された。",
                Self::RtSlowAccUp => "反応は遅くなったが、正答率が上がった。",
                Self::RtSlowAccDown => "反応が遅くなり、正答率も下がった。",
                Self::RtSlowAccSame => "反応が遅くなり、正答率は変わらなかった。",
                Self::RtSameAccUp => "反応速度は変わらず、正答率が上がった。",
                Self::RtSameAccDown => "反応速度は変わらず、正答率が下がった。",
                Self::RtSameAccSame => "反応速度も正答率も安定していた。",
                Self::RtShortAccUpSynergy => "反応が速くなり、同時に正答率も大きく上がった。",
                Self::RtSlowAccDownFatigue => {
                    "反応が大きく遅くなり、正答率も大きく下がった。疲労の可能性がある。"
                }
            },
        }
    }

    /// Full catalog in one language
    #[must_use]
    pub fn catalog(language: Language) -> Vec<ScenarioDescriptor> {
        Self::ALL
            .iter()
            .map(|&key| ScenarioDescriptor {
                key,
                description: key.description(language).to_string(),
            })
            .collect()
    }
}

impl Display for ScenarioKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKey {
    type Err = UnknownScenarioKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownScenarioKey(s.to_string()))
    }
}

/// Catalog entry sent to the generator: machine key plus description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDescriptor {
    pub key: ScenarioKey,
    pub description: String,
}
