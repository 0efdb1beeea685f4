//! Linguistic labels for inputs and output categories

use serde::{Deserialize, Serialize};

/// Eye-openness labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeLabel {
    Closed,
    Tired,
    Open,
}

/// Yawn-rate labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YawnLabel {
    None,
    Rare,
    Moderate,
    Frequent,
}

/// Slow-blink-rate labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkLabel {
    Normal,
    Worrying,
    Critical,
}

/// Vigilance output categories, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Danger,
    StrongFatigue,
    LightFatigue,
    Alert,
}

impl Category {
    /// Number of categories
    pub const COUNT: usize = 4;

    /// All categories in descending severity
    pub const ALL: [Category; Category::COUNT] = [
        Category::Danger,
        Category::StrongFatigue,
        Category::LightFatigue,
        Category::Alert,
    ];

    /// Position in [`Category::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Danger => "danger",
            Category::StrongFatigue => "strong_fatigue",
            Category::LightFatigue => "light_fatigue",
            Category::Alert => "alert",
        }
    }
}
