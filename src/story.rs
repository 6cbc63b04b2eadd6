//! Menu content: story text, choices and their outcomes

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Shown when an index has no matching choice
pub const INVALID_SELECTION: &str = "Invalid selection.";

/// One selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown in the menu
    pub label: String,
    /// Text shown once this choice is confirmed
    pub outcome: String,
}

impl Choice {
    pub fn new(label: &str, outcome: &str) -> Self {
        Self {
            label: label.to_string(),
            outcome: outcome.to_string(),
        }
    }
}

/// A scene and the choices it offers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub text: String,
    pub choices: Vec<Choice>,
}

/// Built-in scene used when the configuration supplies none
pub static FOREST_STORY: Lazy<Story> = Lazy::new(|| Story {
    text: "You are in a dark forest. You hear strange noises around you.".to_string(),
    choices: vec![
        Choice::new(
            "Go left towards the sound.",
            "You go left towards the sound. You find a hidden treasure!",
        ),
        Choice::new(
            "Go right towards the light.",
            "You go right towards the light. It leads you out of the forest.",
        ),
        Choice::new(
            "Stay where you are.",
            "You stay where you are. The noises grow louder, and you feel uneasy.",
        ),
    ],
});

impl Default for Story {
    fn default() -> Self {
        FOREST_STORY.clone()
    }
}

impl Story {
    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    /// Menu label of choice `index`
    pub fn label(&self, index: usize) -> Option<&str> {
        self.choices.get(index).map(|c| c.label.as_str())
    }

    /// Outcome text for the confirmed `index`
    pub fn resolve(&self, index: usize) -> &str {
        self.choices
            .get(index)
            .map(|c| c.outcome.as_str())
            .unwrap_or(INVALID_SELECTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forest_story_outcomes() {
        let story = Story::default();
        assert_eq!(story.choice_count(), 3);
        assert_eq!(story.label(1), Some("Go right towards the light."));
        assert!(story.resolve(0).contains("hidden treasure"));
        assert!(story.resolve(2).contains("feel uneasy"));
    }

    #[test]
    fn test_out_of_range_resolves_invalid() {
        let story = Story::default();
        assert_eq!(story.resolve(3), INVALID_SELECTION);
        assert_eq!(story.label(7), None);
    }
}
