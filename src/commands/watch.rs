//! Live task list.
//!
//! Attaches a [`TaskSession`] for the signed-in user and redraws the grouped
//! list whenever the store changes or the local date rolls over. Writes made
//! by other `gigtask` processes are picked up by polling the database.
//! Ctrl-C releases the session and exits.

use super::context::AppContext;
use super::list;
use crate::{
    libs::{messages::Message, session::TaskSession, store::TaskStore},
    msg_info, msg_print, msg_warning,
};
use anyhow::Result;
use chrono::{DateTime, Days, Local, NaiveTime};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

pub async fn cmd() -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.require_user()?;
    let show_completed = ctx.config.display().show_completed;

    let store = TaskStore::with_filter(ctx.config.default_filter());
    let (changed_tx, mut changed_rx) = mpsc::unbounded_channel();
    let _redraw = store.subscribe(move |_| {
        let _ = changed_tx.send(());
    });
    let mut session = TaskSession::start(ctx.identity.clone(), ctx.service.clone(), store.clone());

    msg_info!(Message::WatchStarted(user.email.clone()));
    render(&store, show_completed)?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut poll = time::interval(POLL_INTERVAL);
    poll.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
    loop {
        let midnight = time::sleep(until_next_midnight(&Local::now()));
        tokio::select! {
            _ = &mut ctrl_c => break,
            Some(()) = changed_rx.recv() => {
                // Several mutations may land together; draw once.
                while changed_rx.try_recv().is_ok() {}
                render(&store, show_completed)?;
            }
            _ = midnight => {
                msg_info!(Message::DayRolledOver(Local::now().format("%Y-%m-%d").to_string()));
                render(&store, show_completed)?;
            }
            _ = poll.tick() => {
                if let Err(e) = ctx.tasks.refresh() {
                    msg_warning!(Message::RefreshFailed(e.to_string()));
                }
            }
        }
    }

    session.close();
    msg_info!(Message::WatchStopped);
    Ok(())
}

fn render(store: &TaskStore, show_completed: bool) -> Result<()> {
    let now = Local::now();
    msg_print!(Message::WatchHeader(now.format("%Y-%m-%d %H:%M").to_string()), true);
    list::show(&store.snapshot(), "", now, show_completed)
}

/// Time left until the next local midnight, at least one second.
fn until_next_midnight(now: &DateTime<Local>) -> Duration {
    let next_midnight = now
        .date_naive()
        .checked_add_days(Days::new(1))
        .map(|day| day.and_time(NaiveTime::MIN))
        .and_then(|naive| naive.and_local_timezone(Local).earliest());

    match next_midnight {
        Some(midnight) => (midnight - *now).to_std().unwrap_or_default().max(Duration::from_secs(1)),
        None => Duration::from_secs(60),
    }
}
