//! Interaction routing for the Hush confession relay.
//!
//! The platform adapter turns gateway events into [`Interaction`]s and hands
//! them to the [`Dispatcher`], which:
//!
//! - routes `/confess`, the invitation button and the confession modal to
//!   the same submission path,
//! - gates administrative commands behind a [`PrivilegeCheck`],
//! - phrases every outcome as a message only the caller can see.
//!
//! [`command_catalog`] lists the slash commands to register.

pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod interaction;
pub mod privilege;

pub use catalog::{command_catalog, find_command, CommandSpec, OptionSpec};
pub use dispatcher::{confession_form, Dispatcher};
pub use error::{DispatchError, DispatchResult};
pub use interaction::{
    Caller, CommandOption, Interaction, InteractionResponse, ModalField, ModalForm, OptionKind,
    OptionValue,
};
pub use privilege::{PrivilegeCheck, StaticPrivileges};
