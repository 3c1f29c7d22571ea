//! Mapping of free-text condition descriptions to icon glyphs.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Rain,
    Cloud,
    Clear,
    Snow,
    Storm,
    Fog,
    Default,
}

impl WeatherIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherIcon::Rain => "🌧️",
            WeatherIcon::Cloud => "☁️",
            WeatherIcon::Clear => "☀️",
            WeatherIcon::Snow => "❄️",
            WeatherIcon::Storm => "⛈️",
            WeatherIcon::Fog => "🌫️",
            WeatherIcon::Default => "🌈",
        }
    }
}

impl std::fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

impl Serialize for WeatherIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.glyph())
    }
}

/// A rule matches when the lowercased description contains any of its keywords.
#[derive(Debug, Clone, Copy)]
pub struct IconRule {
    pub keywords: &'static [&'static str],
    pub icon: WeatherIcon,
}

impl IconRule {
    pub fn matches(&self, lowercase_description: &str) -> bool {
        self.keywords.iter().any(|kw| lowercase_description.contains(kw))
    }
}

/// Evaluated top to bottom; the first match wins.
pub const ICON_RULES: &[IconRule] = &[
    IconRule { keywords: &["rain"], icon: WeatherIcon::Rain },
    IconRule { keywords: &["cloud"], icon: WeatherIcon::Cloud },
    IconRule { keywords: &["clear"], icon: WeatherIcon::Clear },
    IconRule { keywords: &["snow"], icon: WeatherIcon::Snow },
    IconRule { keywords: &["storm"], icon: WeatherIcon::Storm },
    IconRule { keywords: &["fog", "mist"], icon: WeatherIcon::Fog },
];

pub fn icon_for(description: &str) -> WeatherIcon {
    let lower = description.to_lowercase();
    ICON_RULES
        .iter()
        .find(|rule| rule.matches(&lower))
        .map(|rule| rule.icon)
        .unwrap_or(WeatherIcon::Default)
}
