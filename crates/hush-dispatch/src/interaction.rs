//! Inbound interactions and the responses sent back to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use hush_types::{CommunityId, UserId};

use crate::error::{DispatchError, DispatchResult};

/// Who triggered an interaction, and where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller {
    pub community: CommunityId,
    pub user: UserId,
}

impl Caller {
    pub fn new(community: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            community: CommunityId::new(community),
            user: UserId::new(user),
        }
    }
}

/// Type of a slash command option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    String,
    Channel,
    Boolean,
    Integer,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Channel => f.write_str("channel"),
            Self::Boolean => f.write_str("boolean"),
            Self::Integer => f.write_str("integer"),
        }
    }
}

/// A value supplied for a slash command option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    String(String),
    Channel(String),
    Boolean(bool),
    Integer(i64),
}

/// A named option as delivered by the platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
}

impl CommandOption {
    pub fn new(name: impl Into<String>, value: OptionValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A text field of a submitted modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalField {
    pub custom_id: String,
    pub value: String,
}

/// Everything the platform can deliver to the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interaction {
    Command {
        caller: Caller,
        name: String,
        options: Vec<CommandOption>,
    },
    ButtonClick {
        caller: Caller,
        custom_id: String,
    },
    ModalSubmit {
        caller: Caller,
        custom_id: String,
        fields: Vec<ModalField>,
    },
}

impl Interaction {
    pub fn caller(&self) -> &Caller {
        match self {
            Self::Command { caller, .. }
            | Self::ButtonClick { caller, .. }
            | Self::ModalSubmit { caller, .. } => caller,
        }
    }
}

/// Typed accessors over a command's options.
pub(crate) struct Options<'a>(pub &'a [CommandOption]);

impl Options<'_> {
    fn find(&self, name: &'static str) -> DispatchResult<&OptionValue> {
        self.0
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.value)
            .ok_or(DispatchError::MissingOption(name))
    }

    pub fn string(&self, name: &'static str) -> DispatchResult<&str> {
        match self.find(name)? {
            OptionValue::String(s) => Ok(s),
            _ => Err(wrong_type(name, OptionKind::String)),
        }
    }

    pub fn channel(&self, name: &'static str) -> DispatchResult<&str> {
        match self.find(name)? {
            OptionValue::Channel(c) => Ok(c),
            _ => Err(wrong_type(name, OptionKind::Channel)),
        }
    }

    pub fn boolean(&self, name: &'static str) -> DispatchResult<bool> {
        match self.find(name)? {
            OptionValue::Boolean(b) => Ok(*b),
            _ => Err(wrong_type(name, OptionKind::Boolean)),
        }
    }

    pub fn integer(&self, name: &'static str) -> DispatchResult<i64> {
        match self.find(name)? {
            OptionValue::Integer(i) => Ok(*i),
            _ => Err(wrong_type(name, OptionKind::Integer)),
        }
    }
}

fn wrong_type(option: &'static str, expected: OptionKind) -> DispatchError {
    DispatchError::WrongType { option, expected }
}

/// A form the platform shows in response to a button click.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalForm {
    pub custom_id: String,
    pub title: String,
    pub input_custom_id: String,
    pub input_label: String,
    pub placeholder: String,
    pub required: bool,
}

/// What the dispatcher answers with. Messages are visible to the caller only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionResponse {
    Ephemeral(String),
    Modal(ModalForm),
}

impl InteractionResponse {
    /// The message text, if this is an ephemeral message.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ephemeral(text) => Some(text),
            Self::Modal(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_option_access() {
        let opts = vec![
            CommandOption::new("open", OptionValue::Boolean(true)),
            CommandOption::new("count", OptionValue::Integer(3)),
        ];
        let options = Options(&opts);
        assert!(options.boolean("open").unwrap());
        assert_eq!(options.integer("count").unwrap(), 3);
    }

    #[test]
    fn missing_and_mistyped_options() {
        let opts = vec![CommandOption::new("open", OptionValue::String("yes".into()))];
        let options = Options(&opts);
        assert_eq!(options.integer("count"), Err(DispatchError::MissingOption("count")));
        assert_eq!(
            options.boolean("open"),
            Err(DispatchError::WrongType {
                option: "open",
                expected: OptionKind::Boolean,
            })
        );
    }

    #[test]
    fn caller_is_reachable_from_every_variant() {
        let caller = Caller::new("g", "u");
        let click = Interaction::ButtonClick {
            caller: caller.clone(),
            custom_id: "x".into(),
        };
        assert_eq!(click.caller(), &caller);
    }
}
