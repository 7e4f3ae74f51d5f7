use anyhow::{Context, Result, bail};
use rideup_application::ReconcileError;
use rideup_infrastructure::LocalAuthSessionSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::print_json;
use crate::context::AppContext;

/// One line of watch input.
#[derive(Debug, PartialEq, Eq)]
enum WatchCommand {
    SignIn(String),
    SignOut,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<WatchCommand>> {
    let mut words = line.split_whitespace();
    let command = match (words.next(), words.next(), words.next()) {
        (None, _, _) => return Ok(None),
        (Some("signin"), Some(identity), None) => WatchCommand::SignIn(identity.to_string()),
        (Some("signout"), None, _) => WatchCommand::SignOut,
        (Some("quit"), None, _) => WatchCommand::Quit,
        _ => bail!("Unrecognized input {:?}; expected `signin <id>`, `signout` or `quit`", line.trim()),
    };
    Ok(Some(command))
}

pub async fn run(ctx: &AppContext) -> Result<()> {
    let source = LocalAuthSessionSource::new();
    let reconciler = Arc::new(ctx.reconciler());

    let (tx, mut outcomes) = mpsc::unbounded_channel();
    reconciler.set_outcome_sender(tx).await;

    let write_failures = Arc::new(AtomicUsize::new(0));
    let counter = write_failures.clone();
    reconciler
        .set_error_callback(Arc::new(move |_: &ReconcileError| {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .await;

    reconciler.start(&source)?;
    tracing::info!(
        collection = %reconciler.settings().collection,
        "[Watch] Reading sign-in events from stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match parse_line(&line) {
                    Ok(Some(WatchCommand::SignIn(identity))) => source.sign_in(identity),
                    Ok(Some(WatchCommand::SignOut)) => {
                        if source.current().is_none() {
                            tracing::warn!("[Watch] Nobody is signed in");
                        }
                        source.sign_out();
                    }
                    Ok(Some(WatchCommand::Quit)) => break,
                    Ok(None) => {}
                    Err(e) => tracing::warn!("[Watch] {}", e),
                }
            }
            Some(outcome) = outcomes.recv() => print_json(&outcome)?,
            _ = &mut ctrl_c => {
                tracing::info!("[Watch] Interrupted");
                break;
            }
        }
    }

    reconciler.stop();
    let pending = reconciler.in_flight();
    if pending > 0 {
        tracing::info!("[Watch] Waiting for {} event(s) to finish", pending);
    }
    reconciler.drain().await;
    while let Ok(outcome) = outcomes.try_recv() {
        print_json(&outcome)?;
    }

    let failures = write_failures.load(Ordering::SeqCst);
    if failures > 0 {
        tracing::warn!("[Watch] {} profile write(s) failed", failures);
    }
    Ok(())
}
