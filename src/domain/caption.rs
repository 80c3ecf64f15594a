use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::domain::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionStyle {
    Humorous,
    Emotional,
    Concise,
    Poetic,
    Foodie,
    Travel,
    Minimalist,
    Storytelling,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StyleProfile {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
}

impl CaptionStyle {
    pub const ALL: [CaptionStyle; 8] = [
        CaptionStyle::Humorous,
        CaptionStyle::Emotional,
        CaptionStyle::Concise,
        CaptionStyle::Poetic,
        CaptionStyle::Foodie,
        CaptionStyle::Travel,
        CaptionStyle::Minimalist,
        CaptionStyle::Storytelling,
    ];

    /// Styles used when the caller does not pick any.
    pub const DEFAULT_SET: [CaptionStyle; 3] = [
        CaptionStyle::Humorous,
        CaptionStyle::Emotional,
        CaptionStyle::Concise,
    ];

    pub fn profile(self) -> StyleProfile {
        match self {
            CaptionStyle::Humorous => StyleProfile {
                key: "humorous",
                label: "Humorous",
                description: "playful, witty and light-hearted, with a punchline",
                emoji: "😂",
            },
            CaptionStyle::Emotional => StyleProfile {
                key: "emotional",
                label: "Heartfelt",
                description: "warm and sentimental, speaking to feelings and memories",
                emoji: "🥹",
            },
            CaptionStyle::Concise => StyleProfile {
                key: "concise",
                label: "Short & punchy",
                description: "brief, direct and confident, one or two strong lines",
                emoji: "⚡",
            },
            CaptionStyle::Poetic => StyleProfile {
                key: "poetic",
                label: "Poetic",
                description: "lyrical imagery and rhythm, like a short verse",
                emoji: "🌙",
            },
            CaptionStyle::Foodie => StyleProfile {
                key: "foodie",
                label: "Foodie",
                description: "mouth-watering detail about taste, texture and aroma",
                emoji: "🍜",
            },
            CaptionStyle::Travel => StyleProfile {
                key: "travel",
                label: "Travel diary",
                description: "a traveller's first-hand impressions of the place and the journey",
                emoji: "✈️",
            },
            CaptionStyle::Minimalist => StyleProfile {
                key: "minimalist",
                label: "Minimalist",
                description: "understated and calm, very few words with lots of space",
                emoji: "▫️",
            },
            CaptionStyle::Storytelling => StyleProfile {
                key: "storytelling",
                label: "Storytelling",
                description: "a tiny narrative with a beginning, a twist and an ending",
                emoji: "📖",
            },
        }
    }
}

impl fmt::Display for CaptionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile().key)
    }
}

impl FromStr for CaptionStyle {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim().to_lowercase();
        CaptionStyle::ALL
            .iter()
            .copied()
            .find(|style| style.profile().key == needle)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown caption style: {}", value)))
    }
}

/// Tone that matches a 1-5 star rating.
pub fn rating_tone(rating: u8) -> Option<&'static str> {
    match rating {
        1 => Some("disappointed but fair; an honest warning to others without being rude"),
        2 => Some("mildly unimpressed; point out what fell short and what was okay"),
        3 => Some("balanced and neutral; mention both the good and the average"),
        4 => Some("positive and recommending; highlight what made it worth it"),
        5 => Some("enthusiastic and glowing; a must-visit that you cannot stop talking about"),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CaptionRequest {
    #[validate(length(max = 1000))]
    pub description: String,
    #[validate(length(max = 5))]
    pub styles: Vec<CaptionStyle>,
    #[validate(length(min = 1, max = 200))]
    pub place_name: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
}

impl CaptionRequest {
    /// Styles to request from the model, falling back to the default trio.
    pub fn effective_styles(&self) -> Vec<CaptionStyle> {
        if self.styles.is_empty() {
            CaptionStyle::DEFAULT_SET.to_vec()
        } else {
            self.styles.clone()
        }
    }

    pub fn description_or_default(&self) -> &str {
        let trimmed = self.description.trim();
        if trimmed.is_empty() {
            "this photo"
        } else {
            trimmed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Caption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCaption {
    Plain(String),
    Structured {
        #[serde(default)]
        style: Option<String>,
        #[serde(alias = "content", alias = "caption")]
        text: String,
    },
}

// Models answer either `["..."]` or `[{"style": .., "text": ..}]`.
impl<'de> Deserialize<'de> for Caption {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawCaption::deserialize(deserializer)? {
            RawCaption::Plain(text) => Caption { style: None, text },
            RawCaption::Structured { style, text } => Caption { style, text },
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CaptionResponse {
    pub captions: Vec<Caption>,
}
