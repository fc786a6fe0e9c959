//! Content published on a surface.

use serde::{Deserialize, Serialize};

/// A rich embed block: title plus body text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
}

/// An interactive control attached to a post, identified by its `custom_id`.
///
/// The relay only cares about the token; how the platform renders the
/// control is not its concern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affordance {
    pub label: String,
    pub custom_id: String,
}

impl Affordance {
    pub fn new(label: impl Into<String>, custom_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            custom_id: custom_id.into(),
        }
    }
}

/// Everything a single post carries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContent {
    pub content: String,
    pub embeds: Vec<Embed>,
    pub components: Vec<Affordance>,
}

impl PostContent {
    /// Whether the post carries an affordance with this `custom_id`.
    pub fn has_affordance(&self, custom_id: &str) -> bool {
        self.components.iter().any(|a| a.custom_id == custom_id)
    }
}

/// Full replacement of a post's content, embeds and components.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEdit {
    pub content: String,
    pub embeds: Vec<Embed>,
    pub components: Vec<Affordance>,
}

impl PostEdit {
    /// An edit that keeps content and embeds of `current` but removes every
    /// interactive component.
    pub fn strip_affordances(current: &PostContent) -> Self {
        Self {
            content: current.content.clone(),
            embeds: current.embeds.clone(),
            components: Vec::new(),
        }
    }

    /// Apply this edit to a stored post.
    pub fn apply(self, post: &mut PostContent) {
        post.content = self.content;
        post.embeds = self.embeds;
        post.components = self.components;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> PostContent {
        PostContent {
            content: String::new(),
            embeds: vec![Embed {
                title: "Confession #1".into(),
                description: "I never read the docs".into(),
            }],
            components: vec![Affordance::new("Submit a confession!", "confess_button")],
        }
    }

    #[test]
    fn strip_keeps_embeds_and_drops_components() {
        let post = sample_post();
        let edit = PostEdit::strip_affordances(&post);
        assert_eq!(edit.embeds, post.embeds);
        assert_eq!(edit.content, post.content);
        assert!(edit.components.is_empty());
    }

    #[test]
    fn apply_replaces_everything() {
        let mut post = sample_post();
        assert!(post.has_affordance("confess_button"));
        PostEdit::strip_affordances(&post.clone()).apply(&mut post);
        assert!(!post.has_affordance("confess_button"));
        assert_eq!(post.embeds.len(), 1);
    }
}
