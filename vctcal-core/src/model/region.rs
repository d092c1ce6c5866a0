use std::fmt;

use serde::{Deserialize, Serialize};
use slug::slugify;

/// Token used for brackets that are not tied to a league (Masters, Champions).
const INTERNATIONAL: &str = "international";

/// A sub-bracket of a stage, stored as a lowercase slug (`americas`, `emea`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    /// Normalize a free-form region name. Empty names mean an international bracket.
    pub fn new(name: &str) -> Self {
        let slug = slugify(name.trim());
        if slug.is_empty() {
            Region(INTERNATIONAL.to_string())
        } else {
            Region(slug)
        }
    }

    pub fn international() -> Self {
        Region(INTERNATIONAL.to_string())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Name shown in event titles; `None` for international brackets.
    pub fn display_name(&self) -> Option<String> {
        let name = match self.0.as_str() {
            INTERNATIONAL => return None,
            "americas" => "Americas".to_string(),
            "emea" => "EMEA".to_string(),
            "pacific" => "Pacific".to_string(),
            "china" => "China".to_string(),
            other => other
                .split('-')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        };
        Some(name)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
