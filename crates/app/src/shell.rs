//! Interactive shell
//!
//! Line-oriented front end over the controller. Each command maps onto one
//! controller operation; the presenters are re-rendered after every command.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use rt_core::task::Filter;

use crate::controller::Controller;
use crate::view::{ErrorBanner, FooterView, TaskListView};

const HELP: &str = "\
Commands:
  add <title>            create a task
  ls                     show the task list
  filter <all|active|completed>
  toggle <id>            flip a task's completed flag
  edit <id> <title>      rename a task
  rm <id>                delete a task
  toggle-all             complete everything (or un-complete, if done)
  clear-completed        delete all completed tasks
  dismiss                hide the error banner
  help
  quit";

pub async fn run(controller: Arc<Controller>) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    render(&controller, &mut stdout).await?;
    stdout.write_all(b"> ").await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        debug!("shell command: {:?}", line);

        if !line.is_empty() && !dispatch(&controller, line, &mut stdout).await? {
            break;
        }

        render(&controller, &mut stdout).await?;
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Run one command; returns false when the shell should exit
async fn dispatch(
    controller: &Controller,
    line: &str,
    stdout: &mut tokio::io::Stdout,
) -> Result<bool> {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "add" => {
            if controller.snapshot().await.adding {
                stdout.write_all(b"a create is already in flight\n").await?;
            } else {
                controller.set_input(rest).await;
                controller.submit().await;
            }
        }
        "ls" => {}
        "filter" => match rest.parse::<Filter>() {
            Ok(filter) => controller.set_filter(filter).await,
            Err(e) => stdout.write_all(format!("{}\n", e).as_bytes()).await?,
        },
        "toggle" => match rest.parse::<i64>() {
            Ok(id) => controller.toggle(id).await,
            Err(_) => stdout.write_all(b"usage: toggle <id>\n").await?,
        },
        "edit" => match rest
            .split_once(char::is_whitespace)
            .and_then(|(id, title)| id.parse::<i64>().ok().map(|id| (id, title.trim())))
        {
            Some((id, title)) => controller.rename(id, title).await,
            None => stdout.write_all(b"usage: edit <id> <title>\n").await?,
        },
        "rm" => match rest.parse::<i64>() {
            Ok(id) => controller.remove(id).await,
            Err(_) => stdout.write_all(b"usage: rm <id>\n").await?,
        },
        "toggle-all" => controller.toggle_all().await,
        "clear-completed" => controller.clear_completed().await,
        "dismiss" => controller.dismiss_error().await,
        "help" => stdout.write_all(format!("{}\n", HELP).as_bytes()).await?,
        "quit" | "exit" => return Ok(false),
        other => {
            stdout
                .write_all(format!("unknown command: {} (try `help`)\n", other).as_bytes())
                .await?;
        }
    }

    Ok(true)
}

async fn render(controller: &Controller, stdout: &mut tokio::io::Stdout) -> Result<()> {
    let state = controller.snapshot().await;

    let mut out = String::new();
    out.push_str(&ErrorBanner::build(&state).to_string());
    out.push_str(&TaskListView::build(&state).to_string());
    out.push_str(&FooterView::build(&state).to_string());

    stdout.write_all(out.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
