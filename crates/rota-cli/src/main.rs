use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use rota_core::ports::TracingEventSink;

mod config;
mod console;
mod observability;

use config::CliConfig;
use console::{Input, Session};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let config = CliConfig::from_env_or_file()?;
    let app = config
        .builder()?
        .event_sink(Arc::new(TracingEventSink))
        .build()
        .context("build chore board")?;

    // 購読側: スナップショットの公開をログに流す
    let mut snapshots = app.board.subscribe();
    let watcher = tokio::spawn(async move {
        while snapshots.changed().await.is_ok() {
            let board = snapshots.borrow_and_update().clone();
            tracing::debug!(
                version = board.version,
                pending = board.pending_approvals().len(),
                "snapshot published"
            );
        }
    });

    let mut session = Session::new(app);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(b"rota console - type 'help' for commands\n")
        .await
        .context("write stdout")?;

    loop {
        let prompt = match session.current_user() {
            Some(user) => format!("{}> ", user.name),
            None => "> ".to_string(),
        };
        stdout.write_all(prompt.as_bytes()).await.context("write stdout")?;
        stdout.flush().await.context("flush stdout")?;

        let Some(line) = lines.next_line().await.context("read stdin")? else {
            break;
        };
        let output = match session.parse(&line) {
            Ok(None) => continue,
            Ok(Some(Input::Quit)) => break,
            Ok(Some(input)) => match session.execute(input) {
                Ok(text) => text,
                Err(err) => format!("error: {err:#}"),
            },
            Err(err) => format!("error: {err:#}"),
        };
        stdout
            .write_all(format!("{output}\n").as_bytes())
            .await
            .context("write stdout")?;
    }

    watcher.abort();
    tracing::info!("console closed");
    Ok(())
}
