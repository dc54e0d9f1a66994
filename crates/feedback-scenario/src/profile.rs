//! Participant profile
//!
//! Created upstream during onboarding and read-only here. The profile
//! parameterizes message generation; its [`ProfileHash`] records which
//! profile a cached pattern set was generated from.

use crate::hash::ProfileHash;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use ulid::Ulid;

/// Opaque participant identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Wrap an existing identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Assign a fresh identifier (ULID)
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    /// Borrow as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ParticipantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Register of the generated messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TonePreference {
    Casual,
    #[default]
    Gentle,
    Formal,
}

/// How the messages try to motivate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotivationStyle {
    #[default]
    Empathetic,
    Cheerleader,
    Advisor,
}

/// What the messages evaluate performance against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationFocus {
    #[default]
    SelfProgress,
    SocialComparison,
    PositiveFocus,
}

/// Display language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ja,
    En,
}

macro_rules! wire_name {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Wire name
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_name!(TonePreference {
    Casual => "casual",
    Gentle => "gentle",
    Formal => "formal",
});

wire_name!(MotivationStyle {
    Empathetic => "empathetic",
    Cheerleader => "cheerleader",
    Advisor => "advisor",
});

wire_name!(EvaluationFocus {
    SelfProgress => "self-progress",
    SocialComparison => "social-comparison",
    PositiveFocus => "positive-focus",
});

wire_name!(Language {
    Ja => "ja",
    En => "en",
});

/// Participant preferences that shape generated feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantProfile {
    /// Absent until the orchestrator assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ParticipantId>,
    pub nickname: String,
    #[serde(default)]
    pub preferred_praise: BTreeSet<String>,
    #[serde(default)]
    pub tone_preference: TonePreference,
    #[serde(default)]
    pub motivation_style: MotivationStyle,
    #[serde(default)]
    pub evaluation_focus: EvaluationFocus,
    #[serde(default)]
    pub language: Language,
}

impl ParticipantProfile {
    /// Create profile with default preferences
    #[must_use]
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            id: None,
            nickname: nickname.into(),
            preferred_praise: BTreeSet::new(),
            tone_preference: TonePreference::default(),
            motivation_style: MotivationStyle::default(),
            evaluation_focus: EvaluationFocus::default(),
            language: Language::default(),
        }
    }

    /// With participant id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: impl Into<ParticipantId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// With preferred praise labels
    #[must_use]
    pub fn with_praise<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_praise = labels.into_iter().map(Into::into).collect();
        self
    }

    /// With tone
    #[inline]
    #[must_use]
    pub fn with_tone(mut self, tone: TonePreference) -> Self {
        self.tone_preference = tone;
        self
    }

    /// With motivation style
    #[inline]
    #[must_use]
    pub fn with_motivation(mut self, style: MotivationStyle) -> Self {
        self.motivation_style = style;
        self
    }

    /// With evaluation focus
    #[inline]
    #[must_use]
    pub fn with_evaluation(mut self, focus: EvaluationFocus) -> Self {
        self.evaluation_focus = focus;
        self
    }

    /// With language
    #[inline]
    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Fingerprint of the generation-relevant fields
    ///
    /// The id is excluded: the same preferences hash the same for any participant.
    #[must_use]
    pub fn profile_hash(&self) -> ProfileHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.nickname.as_bytes());
        hasher.update(&[0]);
        for label in &self.preferred_praise {
            hasher.update(label.as_bytes());
            hasher.update(&[0]);
        }
        hasher.update(&[0xff]);
        hasher.update(self.tone_preference.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(self.motivation_style.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(self.evaluation_focus.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(self.language.as_str().as_bytes());
        ProfileHash::new(*hasher.finalize().as_bytes())
    }
}
