use std::sync::Arc;

use tracing::{debug, warn};

use hush_relay::{ConfessionRelay, RelayError, SubmissionOutcome, CONFESS_BUTTON_ID};
use hush_types::SurfaceId;

use crate::catalog::{
    find_command, CONFESS, CONFESSION_INPUT_ID, CONFESSION_MODAL_ID, MAX_CONFESSION_LIMIT,
    RESET_POST_COUNTER, SELECT_CHANNEL, SET_MAX_CONFESSIONS, TOGGLE_CONFESSIONS,
};
use crate::error::{DispatchError, DispatchResult};
use crate::interaction::{
    Caller, CommandOption, Interaction, InteractionResponse, ModalField, ModalForm, Options,
};
use crate::privilege::PrivilegeCheck;

pub const POSTED: &str = ":white_check_mark: Your confession has been posted.";
pub const QUOTA_EXCEEDED: &str = ":x: You have exceeded the maximum number of allowed posts.";
pub const NOT_ALLOWED: &str = ":x: You can't do that.";
pub const CHANNEL_UPDATED: &str = ":white_check_mark: Channel updated.";
pub const RESET_COMPLETE: &str = ":white_check_mark: Reset complete.";

/// Routes platform interactions to the relay and phrases the replies.
///
/// Unknown commands, buttons and modals get no response.
pub struct Dispatcher {
    relay: Arc<ConfessionRelay>,
    privileges: Arc<dyn PrivilegeCheck>,
}

impl Dispatcher {
    pub fn new(relay: Arc<ConfessionRelay>, privileges: Arc<dyn PrivilegeCheck>) -> Self {
        Self { relay, privileges }
    }

    pub fn relay(&self) -> &Arc<ConfessionRelay> {
        &self.relay
    }

    pub async fn dispatch(&self, interaction: Interaction) -> Option<InteractionResponse> {
        match interaction {
            Interaction::Command {
                caller,
                name,
                options,
            } => self.handle_command(&caller, &name, &options).await,
            Interaction::ButtonClick { custom_id, .. } if custom_id == CONFESS_BUTTON_ID => {
                Some(InteractionResponse::Modal(confession_form()))
            }
            Interaction::ModalSubmit {
                caller,
                custom_id,
                fields,
            } if custom_id == CONFESSION_MODAL_ID => {
                Some(self.handle_modal(&caller, &fields).await)
            }
            _ => {
                debug!("ignoring unrouted interaction");
                None
            }
        }
    }

    async fn handle_command(
        &self,
        caller: &Caller,
        name: &str,
        options: &[CommandOption],
    ) -> Option<InteractionResponse> {
        let options = Options(options);
        let reply = match name {
            CONFESS => match options.string("text") {
                Ok(text) => self.submit(caller, text).await,
                Err(e) => option_error(e),
            },
            _ => match self.admin(caller, name, &options).await {
                Ok(reply) => reply,
                Err(AdminFailure::Unknown) => {
                    debug!(command = name, "ignoring unknown command");
                    return None;
                }
                Err(AdminFailure::Relay(denied @ RelayError::PermissionDenied { .. })) => {
                    debug!(
                        community = %caller.community,
                        error = %denied,
                        "admin command refused"
                    );
                    NOT_ALLOWED.into()
                }
                Err(AdminFailure::Relay(e)) => format!(":x: {e}"),
                Err(AdminFailure::Options(e)) => option_error(e),
            },
        };
        Some(InteractionResponse::Ephemeral(reply))
    }

    /// Run a privileged command after checking the caller may.
    async fn admin(
        &self,
        caller: &Caller,
        name: &str,
        options: &Options<'_>,
    ) -> Result<String, AdminFailure> {
        if !find_command(name).is_some_and(|spec| spec.privileged) {
            return Err(AdminFailure::Unknown);
        }
        self.authorize(caller, name).await?;
        match name {
            SELECT_CHANNEL => {
                let channel = SurfaceId::parse(options.channel("channel")?).map_err(|e| {
                    DispatchError::InvalidValue {
                        option: "channel",
                        reason: e.to_string(),
                    }
                })?;
                self.relay.set_target_surface(channel).await;
                Ok(CHANNEL_UPDATED.into())
            }
            TOGGLE_CONFESSIONS => {
                let open = options.boolean("open")?;
                self.relay.set_active(open).await;
                Ok(format!("Taking confessions: {open}"))
            }
            SET_MAX_CONFESSIONS => {
                let limit = limit_from_option(options.integer("count")?)?;
                self.relay.set_max_allowed(limit).await?;
                Ok(format!("Max # of posts allowed is now: {limit}"))
            }
            RESET_POST_COUNTER => {
                self.relay.reset_quota().await;
                Ok(RESET_COMPLETE.into())
            }
            _ => Err(AdminFailure::Unknown),
        }
    }

    async fn authorize(&self, caller: &Caller, operation: &str) -> Result<(), RelayError> {
        if self.privileges.is_privileged(&caller.community, &caller.user).await {
            Ok(())
        } else {
            Err(RelayError::PermissionDenied {
                operation: operation.to_string(),
            })
        }
    }

    async fn handle_modal(&self, caller: &Caller, fields: &[ModalField]) -> InteractionResponse {
        let reply = match fields.iter().find(|f| f.custom_id == CONFESSION_INPUT_ID) {
            Some(field) => self.submit(caller, &field.value).await,
            None => option_error(DispatchError::MissingOption(CONFESSION_INPUT_ID)),
        };
        InteractionResponse::Ephemeral(reply)
    }

    async fn submit(&self, caller: &Caller, text: &str) -> String {
        let result = self
            .relay
            .submit_confession(&caller.community, &caller.user, text)
            .await;
        match SubmissionOutcome::from(result) {
            SubmissionOutcome::Posted(receipt) => {
                if !receipt.cleanup.is_clean() {
                    warn!(post = %receipt.post, "previous confession still shows the button");
                }
                posted_message(receipt.remaining)
            }
            SubmissionOutcome::Denied(RelayError::QuotaExceeded) => QUOTA_EXCEEDED.into(),
            SubmissionOutcome::Denied(e) | SubmissionOutcome::Failed(e) => {
                format!(":x: There was an error processing your confession: {e}")
            }
        }
    }
}

/// The form answering a click on the invitation button.
pub fn confession_form() -> ModalForm {
    ModalForm {
        custom_id: CONFESSION_MODAL_ID.into(),
        title: "Submit Your Confession".into(),
        input_custom_id: CONFESSION_INPUT_ID.into(),
        input_label: "Your Confession".into(),
        placeholder: "Type your confession here...".into(),
        required: true,
    }
}

fn posted_message(remaining: u32) -> String {
    match remaining {
        0 => format!("{POSTED} That was your last one until the next reset."),
        1 => format!("{POSTED} You can confess 1 more time."),
        n => format!("{POSTED} You can confess {n} more times."),
    }
}

fn limit_from_option(count: i64) -> DispatchResult<u32> {
    if !(1..=MAX_CONFESSION_LIMIT).contains(&count) {
        return Err(DispatchError::InvalidValue {
            option: "count",
            reason: format!("must be between 1 and {MAX_CONFESSION_LIMIT}"),
        });
    }
    u32::try_from(count).map_err(|e| DispatchError::InvalidValue {
        option: "count",
        reason: e.to_string(),
    })
}

/// Why an administrative command produced no success reply.
#[derive(Debug)]
enum AdminFailure {
    /// Not a privileged command in the catalog.
    Unknown,
    Relay(RelayError),
    Options(DispatchError),
}

impl From<RelayError> for AdminFailure {
    fn from(e: RelayError) -> Self {
        Self::Relay(e)
    }
}

impl From<DispatchError> for AdminFailure {
    fn from(e: DispatchError) -> Self {
        Self::Options(e)
    }
}

fn option_error(e: DispatchError) -> String {
    format!(":x: Problem reading the command: {e}")
}
