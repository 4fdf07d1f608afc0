use serde::{Deserialize, Serialize};

/// Speaker category a message is attributed to, derived from its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerType {
    Lyra,
    User,
    Unknown,
}

impl SpeakerType {
    /// Classify a raw tag string into a speaker category.
    ///
    /// Closed mapping, first match wins, case-sensitive substring match:
    /// "LLM" or "Lyra" attribute to the model, "STT" to the user.
    pub fn classify(tag: &str) -> Self {
        if tag.contains("LLM") {
            Self::Lyra
        } else if tag.contains("Lyra") {
            Self::Lyra
        } else if tag.contains("STT") {
            Self::User
        } else {
            Self::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lyra => "lyra",
            Self::User => "user",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SpeakerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SpeakerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lyra" => Ok(Self::Lyra),
            "user" => Ok(Self::User),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown speaker type: {}", other)),
        }
    }
}
