//! Slash commands the platform adapter registers on startup.

use serde::{Deserialize, Serialize};

use crate::interaction::OptionKind;

pub const CONFESS: &str = "confess";
pub const SELECT_CHANNEL: &str = "select-channel";
pub const TOGGLE_CONFESSIONS: &str = "toggle-confessions";
pub const SET_MAX_CONFESSIONS: &str = "set-max-confessions";
pub const RESET_POST_COUNTER: &str = "reset-post-counter";

/// Modal shown when the invitation button is clicked.
pub const CONFESSION_MODAL_ID: &str = "confession_modal";
/// Text input inside [`CONFESSION_MODAL_ID`].
pub const CONFESSION_INPUT_ID: &str = "confession_input";

/// Upper bound of the `set-max-confessions` count option.
pub const MAX_CONFESSION_LIMIT: i64 = 1 << 31;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
}

impl OptionSpec {
    fn required(name: &str, description: &str, kind: OptionKind) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: true,
            min_value: None,
            max_value: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    /// Only privileged members may run it.
    pub privileged: bool,
    pub options: Vec<OptionSpec>,
}

/// Every command the dispatcher understands.
pub fn command_catalog() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: CONFESS.into(),
            description: "post anonymous confession".into(),
            privileged: false,
            options: vec![OptionSpec::required("text", "confession body", OptionKind::String)],
        },
        CommandSpec {
            name: SELECT_CHANNEL.into(),
            description: "choose confession channel target".into(),
            privileged: true,
            options: vec![OptionSpec::required("channel", "target channel", OptionKind::Channel)],
        },
        CommandSpec {
            name: TOGGLE_CONFESSIONS.into(),
            description: "enable or disable confessions".into(),
            privileged: true,
            options: vec![OptionSpec::required(
                "open",
                "true means confessions are open",
                OptionKind::Boolean,
            )],
        },
        CommandSpec {
            name: SET_MAX_CONFESSIONS.into(),
            description: "set the maximum number of confessions per user".into(),
            privileged: true,
            options: vec![OptionSpec {
                min_value: Some(1),
                max_value: Some(MAX_CONFESSION_LIMIT),
                ..OptionSpec::required(
                    "count",
                    "# of confessions allowed per user",
                    OptionKind::Integer,
                )
            }],
        },
        CommandSpec {
            name: RESET_POST_COUNTER.into(),
            description: "allow everyone to confess again, i.e. reset the post counter".into(),
            privileged: true,
            options: Vec::new(),
        },
    ]
}

/// Look up a command by name.
pub fn find_command(name: &str) -> Option<CommandSpec> {
    command_catalog().into_iter().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        let catalog = command_catalog();
        let mut names: Vec<_> = catalog.iter().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn only_confess_is_unprivileged() {
        for cmd in command_catalog() {
            assert_eq!(cmd.privileged, cmd.name != CONFESS, "{}", cmd.name);
        }
    }

    #[test]
    fn limit_option_is_bounded() {
        let cmd = find_command(SET_MAX_CONFESSIONS).unwrap();
        assert_eq!(cmd.options[0].min_value, Some(1));
        assert_eq!(cmd.options[0].max_value, Some(MAX_CONFESSION_LIMIT));
    }

    #[test]
    fn catalog_serializes_kinds_in_snake_case() {
        let json = serde_json::to_string(&find_command(CONFESS).unwrap()).unwrap();
        assert!(json.contains("\"kind\":\"string\""));
        assert!(!json.contains("min_value"));
    }
}
