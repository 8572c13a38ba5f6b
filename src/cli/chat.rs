//! Console transport: feeds stdin lines to the dispatcher as chat events.

use super::ui;
use crate::core::session::UserId;
use crate::dispatcher::{Action, Dispatcher, Event, Reply};
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Event(Event),
    Quit,
    Skip,
    UnknownCommand(String),
}

fn parse_line(user: UserId, line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Skip;
    }

    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Event(Event::Text {
            user,
            text: line.to_string(),
        });
    };

    match command {
        "start" | "menu" => Input::Event(Event::Start { user }),
        "quit" | "exit" => Input::Quit,
        other => match other.parse::<Action>() {
            Ok(action) => Input::Event(Event::Button { user, action }),
            Err(_) => Input::UnknownCommand(trimmed.to_string()),
        },
    }
}

fn write_reply<W: Write>(out: &mut W, reply: &Reply) -> Result<()> {
    writeln!(out, "{}", reply.text)?;
    if let Some(rows) = &reply.keyboard {
        writeln!(out, "{}", ui::format_keyboard(rows))?;
    }
    writeln!(out)?;
    Ok(())
}

/// Runs the chat loop until `/quit` or end of input.
pub async fn run<R, W>(
    dispatcher: &Dispatcher,
    user: UserId,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match parse_line(user, &line) {
            Input::Event(event) => {
                if let Some(reply) = dispatcher.handle(event).await {
                    write_reply(out, &reply)?;
                }
            }
            Input::Quit => break,
            Input::Skip => {}
            Input::UnknownCommand(command) => {
                debug!(%command, "Unknown command");
                writeln!(
                    out,
                    "{}\n",
                    ui::style_text(&format!("Unknown command: {command}"), ui::StyleType::Error)
                )?;
            }
        }
        out.flush()?;
    }
    Ok(())
}
