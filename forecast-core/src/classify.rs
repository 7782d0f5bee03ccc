//! Condition-string classification.
//!
//! Free-text condition labels are bucketed by case-insensitive substring
//! match against [`RULES`], evaluated top to bottom. The first rule that
//! matches wins; nothing matching yields [`Category::Default`].

/// Coarse weather bucket derived from a condition label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Sunny,
    Rain,
    Snow,
    PartlyCloudy,
    Fog,
    Cloudy,
    Default,
}

/// Symbolic card icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Sun,
    CloudRain,
    CloudSnow,
    CloudSun,
    CloudFog,
    Cloud,
}

/// Three-stop colour gradient used for the card stripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gradient {
    /// yellow → orange → red
    Sunset,
    /// blue 400 → 600
    Ocean,
    /// blue 100 → 300
    Frost,
    /// yellow → light blue → blue
    Dawn,
    /// gray 400 → 600
    Slate,
    /// blue → purple → pink
    Aurora,
}

/// Ordered rule table. `partly`/`partial` must stay above `cloud` so that
/// "Partly Cloudy" is not swallowed by the generic cloud rule.
pub const RULES: &[(&[&str], Category)] = &[
    (&["sunny", "clear"], Category::Sunny),
    (&["rain", "shower"], Category::Rain),
    (&["snow"], Category::Snow),
    (&["partly", "partial"], Category::PartlyCloudy),
    (&["fog", "mist"], Category::Fog),
    (&["cloud", "overcast"], Category::Cloudy),
];

pub fn classify(condition: &str) -> Category {
    let lower = condition.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Default)
}

impl Category {
    pub fn icon(self) -> Icon {
        match self {
            Category::Sunny => Icon::Sun,
            Category::Rain => Icon::CloudRain,
            Category::Snow => Icon::CloudSnow,
            Category::PartlyCloudy => Icon::CloudSun,
            Category::Fog => Icon::CloudFog,
            Category::Cloudy | Category::Default => Icon::Cloud,
        }
    }

    /// Fog has no gradient of its own and shares the default one.
    pub fn gradient(self) -> Gradient {
        match self {
            Category::Sunny => Gradient::Sunset,
            Category::Rain => Gradient::Ocean,
            Category::Snow => Gradient::Frost,
            Category::PartlyCloudy => Gradient::Dawn,
            Category::Cloudy => Gradient::Slate,
            Category::Fog | Category::Default => Gradient::Aurora,
        }
    }
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Sun => "☀",
            Icon::CloudRain => "☂",
            Icon::CloudSnow => "❄",
            Icon::CloudSun => "⛅",
            Icon::CloudFog => "≋",
            Icon::Cloud => "☁",
        }
    }
}

impl Gradient {
    /// RGB stops, left to right.
    pub fn stops(self) -> [(u8, u8, u8); 3] {
        match self {
            Gradient::Sunset => [(250, 204, 21), (251, 146, 60), (248, 113, 113)],
            Gradient::Ocean => [(96, 165, 250), (59, 130, 246), (37, 99, 235)],
            Gradient::Frost => [(219, 234, 254), (191, 219, 254), (147, 197, 253)],
            Gradient::Dawn => [(253, 224, 71), (147, 197, 253), (96, 165, 250)],
            Gradient::Slate => [(156, 163, 175), (107, 114, 128), (75, 85, 99)],
            Gradient::Aurora => [(96, 165, 250), (192, 132, 252), (244, 114, 182)],
        }
    }
}
