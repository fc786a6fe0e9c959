//! Line-oriented console that stands in for the chat platform.
//!
//! Each line is `<user-id> <input>`, where input is a slash command, `click`
//! (the invitation button), `modal <text>` (the confession form), `status`
//! or `help`.

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use hush_dispatch::{
    catalog::{CONFESSION_INPUT_ID, CONFESSION_MODAL_ID},
    find_command, Caller, CommandOption, Dispatcher, Interaction, InteractionResponse, ModalField,
    OptionKind, OptionValue,
};
use hush_relay::{InMemorySurface, SurfaceCall, CONFESS_BUTTON_ID};
use hush_types::CommunityId;

/// One parsed console line.
#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleInput {
    Blank,
    Help,
    Status,
    Interaction(Interaction),
}

pub fn parse_line(line: &str, community: &CommunityId) -> anyhow::Result<ConsoleInput> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(ConsoleInput::Blank);
    }
    let (user, rest) = split_word(line);
    match user {
        "help" => return Ok(ConsoleInput::Help),
        "status" => return Ok(ConsoleInput::Status),
        _ => {}
    }
    let caller = Caller::new(community.as_str(), user);
    let (verb, args) = split_word(rest);

    let interaction = match verb {
        "" => bail!("missing input after user id {user:?}"),
        "status" => return Ok(ConsoleInput::Status),
        "click" => Interaction::ButtonClick {
            caller,
            custom_id: CONFESS_BUTTON_ID.into(),
        },
        "modal" => Interaction::ModalSubmit {
            caller,
            custom_id: CONFESSION_MODAL_ID.into(),
            fields: vec![ModalField {
                custom_id: CONFESSION_INPUT_ID.into(),
                value: args.to_string(),
            }],
        },
        command => {
            let name = command
                .strip_prefix('/')
                .ok_or_else(|| anyhow!("unknown input {command:?}, try `help`"))?;
            Interaction::Command {
                caller,
                name: name.to_string(),
                options: command_options(name, args)?,
            }
        }
    };
    Ok(ConsoleInput::Interaction(interaction))
}

/// Build typed options from the catalog entry for `name`.
///
/// A single string option takes the whole remainder of the line. Unknown
/// commands are passed through without options.
fn command_options(name: &str, args: &str) -> anyhow::Result<Vec<CommandOption>> {
    let Some(spec) = find_command(name) else {
        return Ok(Vec::new());
    };
    let mut options = Vec::with_capacity(spec.options.len());
    let mut rest = args;
    for option in &spec.options {
        let raw = if option.kind == OptionKind::String {
            std::mem::take(&mut rest)
        } else {
            let (word, tail) = split_word(rest);
            rest = tail;
            word
        };
        if raw.is_empty() {
            if option.required {
                bail!("/{name} needs <{}>", option.name);
            }
            continue;
        }
        let value = match option.kind {
            OptionKind::String => OptionValue::String(raw.to_string()),
            OptionKind::Channel => OptionValue::Channel(raw.to_string()),
            OptionKind::Boolean => OptionValue::Boolean(
                raw.parse::<bool>()
                    .with_context(|| format!("<{}> must be true or false", option.name))?,
            ),
            OptionKind::Integer => OptionValue::Integer(
                raw.parse::<i64>()
                    .with_context(|| format!("<{}> must be a whole number", option.name))?,
            ),
        };
        options.push(CommandOption::new(option.name.clone(), value));
    }
    Ok(options)
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (s, ""),
    }
}

/// Read stdin until EOF, dispatching each line.
pub async fn run(
    dispatcher: &Dispatcher,
    surface: &InMemorySurface,
    community: &CommunityId,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut seen = surface.calls().len();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line, community) {
            Ok(ConsoleInput::Blank) => {}
            Ok(ConsoleInput::Help) => print_help(),
            Ok(ConsoleInput::Status) => {
                let snapshot = dispatcher.relay().status();
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            Ok(ConsoleInput::Interaction(interaction)) => {
                match dispatcher.dispatch(interaction).await {
                    Some(response) => print_response(&response),
                    None => println!("{}", "(no response)".dimmed()),
                }
            }
            Err(e) => eprintln!("{} {e:#}", "error:".red().bold()),
        }
        seen = print_activity(surface, seen);
    }
    Ok(())
}

fn print_response(response: &InteractionResponse) {
    match response {
        InteractionResponse::Ephemeral(message) => {
            println!("{} {}", "[only you]".dimmed(), message);
        }
        InteractionResponse::Modal(form) => {
            println!(
                "{} {} ({}), answer with `<user> modal <text>`",
                "[form]".cyan(),
                form.title.bold(),
                form.input_label
            );
        }
    }
}

/// Print channel activity recorded since `seen` and return the new mark.
fn print_activity(surface: &InMemorySurface, seen: usize) -> usize {
    let calls = surface.calls();
    for call in calls.iter().skip(seen) {
        match call {
            SurfaceCall::Create {
                surface: channel,
                post: Some(id),
            } => {
                let Some(stored) = surface.post(id) else { continue };
                for embed in &stored.content.embeds {
                    println!("{} {}", format!("#{channel}").blue(), embed.title.bold());
                    println!("    {}", embed.description);
                }
                for button in &stored.content.components {
                    println!("    [{}]", button.label.green());
                }
            }
            SurfaceCall::Create {
                surface: channel,
                post: None,
            } => {
                println!("{} {}", format!("#{channel}").blue(), "post failed".red());
            }
            SurfaceCall::Edit { post, .. } => {
                println!("{}", format!("    (button removed from {post})").dimmed());
            }
            SurfaceCall::Fetch { .. } => {}
        }
    }
    calls.len()
}

fn print_help() {
    println!("{}", "Lines are `<user-id> <input>`:".bold());
    println!("  /confess <text>");
    println!("  /select-channel <channel-id>");
    println!("  /toggle-confessions <true|false>");
    println!("  /set-max-confessions <n>");
    println!("  /reset-post-counter");
    println!("  click             press the confession button");
    println!("  modal <text>      submit the confession form");
    println!("  status            show relay state");
}
