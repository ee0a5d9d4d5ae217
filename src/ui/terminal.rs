//! Interactive terminal loop.
//!
//! Reads commands from stdin and redraws the screen on every bus event.
//! Rendering itself lives in [`crate::ui::render`].

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::client::{ActionOutcome, DeskClient};
use crate::ui::commands::{Command, HELP};
use crate::ui::render::{render, RenderOptions};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const PROMPT: &str = "> ";

pub async fn run(client: Arc<DeskClient>, options: RenderOptions) -> Result<()> {
    let mut events = client.bus().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    client.login().await;
    redraw(&client, &options, &mut stdout, None).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    redraw(&client, &options, &mut stdout, None).await?;
                    continue;
                }
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => redraw(&client, &options, &mut stdout, Some(HELP)).await?,
                    Ok(command) => {
                        dispatch(&client, command).await;
                        redraw(&client, &options, &mut stdout, None).await?;
                    }
                    Err(e) => {
                        let text = format!("{}\n{}", e, HELP);
                        redraw(&client, &options, &mut stdout, Some(&text)).await?;
                    }
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => debug!(event = event.event_type(), "redraw"),
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "UI fell behind the event bus"),
                    Err(RecvError::Closed) => break,
                }
                redraw(&client, &options, &mut stdout, None).await?;
            }
        }
    }

    client.shutdown().await;
    Ok(())
}

async fn dispatch(client: &DeskClient, command: Command) {
    match command {
        Command::Select(id) => {
            client.select(&id).await;
        }
        Command::Auto => {
            client.smart_assign().await;
        }
        Command::Book => {
            if client.book().await == ActionOutcome::Skipped {
                debug!("book ignored, nothing selected");
            }
        }
        Command::Release => {
            if client.release().await == ActionOutcome::Skipped {
                debug!("release ignored, nothing selected");
            }
        }
        Command::Search(query) => client.set_search(&query).await,
        Command::Date(date) => client.set_date(&date).await,
        Command::Time(slot) => client.set_time_slot(&slot).await,
        Command::Login => {
            client.login().await;
        }
        Command::Cookie(value) => {
            client.set_session_cookie(&value);
            client.login().await;
        }
        Command::Logout => client.logout().await,
        Command::Refresh => client.refresh().await,
        Command::Help | Command::Quit => {}
    }
}

async fn redraw(
    client: &DeskClient,
    options: &RenderOptions,
    stdout: &mut tokio::io::Stdout,
    footer: Option<&str>,
) -> Result<()> {
    let screen = {
        let state = client.state().read().await;
        render(&state, &client.login_url(), chrono::Utc::now(), options)
    };

    let mut out = String::new();
    if options.color {
        out.push_str(CLEAR_SCREEN);
    }
    out.push_str(&screen);
    if let Some(footer) = footer {
        out.push('\n');
        out.push_str(footer);
        out.push('\n');
    }
    out.push_str(PROMPT);

    stdout.write_all(out.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
