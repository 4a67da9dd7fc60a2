use super::context::AppContext;
use crate::{
    libs::{
        filter::{FilterPatch, PriorityFilter, StatusFilter},
        messages::Message,
        store::{StoreState, TaskStore},
        view::View,
        view_model::{build_view_model, ViewModel},
    },
    msg_info, msg_print,
};
use anyhow::Result;
use chrono::{DateTime, Local};
use clap::Args;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only tasks whose title or description contains this text
    #[arg(short, long, default_value = "")]
    search: String,
    /// Priority filter: all, low, medium or high
    #[arg(short, long)]
    priority: Option<PriorityFilter>,
    /// Status filter: all, completed or incomplete
    #[arg(long)]
    status: Option<StatusFilter>,
}

pub fn cmd(args: ListArgs) -> Result<()> {
    let ctx = AppContext::new()?;
    let user = ctx.require_user()?;

    let store = TaskStore::with_filter(ctx.config.default_filter());
    store.set_filter(FilterPatch {
        priority: args.priority,
        status: args.status,
    });
    store.set_tasks(ctx.service.get_tasks(&user.id)?);

    show(&store.snapshot(), &args.search, Local::now(), ctx.config.display().show_completed)
}

/// Prints the grouped list for `state`, or a notice when there is nothing to list.
pub(super) fn show(state: &StoreState, query: &str, now: DateTime<Local>, show_completed: bool) -> Result<()> {
    let view_model = build_view_model(&state.tasks, query, &state.filter, now);

    let notice = empty_notice(state, &view_model);
    if !matches!(notice, Some(Message::NoTasksYet)) {
        if let Some(badge) = state.filter.badge_text() {
            msg_print!(Message::ActiveFilters(badge));
        }
    }
    if let Some(notice) = notice {
        msg_info!(notice);
        return Ok(());
    }

    msg_print!(Message::TasksHeader(view_model.matched), true);
    View::view_model(&view_model, &now, show_completed)
}

fn empty_notice(state: &StoreState, view_model: &ViewModel) -> Option<Message> {
    if state.tasks.is_empty() {
        Some(Message::NoTasksYet)
    } else if view_model.is_empty() {
        Some(Message::NoTasksMatchFilters)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::filter::Filter;
    use crate::libs::task::{NewTask, Priority, TaskId};
    use chrono::TimeZone;

    fn state(titles: &[&str], filter: Filter) -> StoreState {
        let due = Local.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        StoreState {
            tasks: titles
                .iter()
                .map(|title| NewTask::new("u1", title, "", due, Priority::Low).into_task(TaskId::from(*title), due))
                .collect(),
            filter,
            loading: false,
        }
    }

    fn notice(state: &StoreState, query: &str) -> Option<String> {
        let now = Local.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let view_model = build_view_model(&state.tasks, query, &state.filter, now);
        empty_notice(state, &view_model).map(|m| m.to_string())
    }

    #[test]
    fn test_empty_notice() {
        let empty = state(&[], Filter::default());
        assert_eq!(notice(&empty, ""), Some(Message::NoTasksYet.to_string()));

        let high_only = state(&["buy milk"], Filter::new(PriorityFilter::High, StatusFilter::All));
        assert_eq!(notice(&high_only, ""), Some(Message::NoTasksMatchFilters.to_string()));

        let all = state(&["buy milk"], Filter::default());
        assert_eq!(notice(&all, "MILK"), None);
    }

    #[test]
    fn test_search_query_is_matched_as_given() {
        let all = state(&["milk"], Filter::default());
        assert_eq!(notice(&all, " milk"), Some(Message::NoTasksMatchFilters.to_string()));
        assert_eq!(notice(&all, "milk"), None);
    }
}
