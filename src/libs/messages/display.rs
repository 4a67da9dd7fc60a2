//! Display implementation for gigtask messages.
//!
//! All user-facing text lives here so commands only ever name a [`Message`]
//! variant. Messages are written in sentence case with the relevant
//! parameters interpolated; the output macros add the status prefix.

use super::types::Message;
use std::fmt;

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            // === TASK MESSAGES ===
            Message::TaskCreated(title) => format!("Task \"{}\" created", title),
            Message::TaskUpdated(title) => format!("Task \"{}\" updated", title),
            Message::TaskDeleted(title) => format!("Task \"{}\" deleted", title),
            Message::TaskCompleted(title) => format!("Great job completing \"{}\"! Keep up the excellent work.", title),
            Message::TaskReopened(title) => format!("Task \"{}\" marked as not done", title),
            Message::TaskNotFound(id) => format!("No task found with id starting with '{}'", id),
            Message::TaskIdAmbiguous(id, count) => format!("Id prefix '{}' matches {} tasks, please use more characters", id, count),
            Message::TaskCreateFailed => "Failed to create task".to_string(),
            Message::TaskTitleRequired => "Please enter a task title to continue.".to_string(),
            Message::NoChangesProvided => "Nothing to change, pass at least one field to update".to_string(),
            Message::ConfirmDeleteTask(title) => format!("Are you sure you want to delete \"{}\"? This action cannot be undone.", title),
            Message::InvalidDueDate(input) => format!("Invalid due date '{}', use today, tomorrow, YYYY-MM-DD or \"YYYY-MM-DD HH:MM\"", input),
            Message::OperationCancelled => "Operation cancelled".to_string(),

            // === LIST MESSAGES ===
            Message::NoTasksYet => "No tasks yet. Create one with `gigtask add <title>`".to_string(),
            Message::NoTasksMatchFilters => "No tasks match your search or filters".to_string(),
            Message::ActiveFilters(badge) => format!("Filters: {}", badge),
            Message::TasksHeader(count) => format!("{} task(s)", count),
            Message::CalendarHeader(month) => month.clone(),
            Message::TasksForDateHeader(date) => format!("Tasks for {}", date),
            Message::NoTasksForDate(date) => format!("No tasks due on {}", date),

            // === ACCOUNT MESSAGES ===
            Message::AccountCreated(email) => format!("Account created for {}", email),
            Message::SignedIn(email) => format!("Welcome back! Signed in as {}", email),
            Message::SignedOut => "Signed out".to_string(),
            Message::SignedInAs(email) => format!("Signed in as {}", email),
            Message::NotSignedIn => "You are not signed in. Run `gigtask login` first".to_string(),
            Message::PasswordResetRequested(email) => format!("Password reset requested for {}", email),
            Message::PasswordStrength(label) => format!("Password strength: {}", label),
            Message::PromptEmail => "Email".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptConfirmPassword => "Confirm password".to_string(),
            Message::RegistrationFailed(reason) => format!("Registration failed. {}", reason),
            Message::LoginFailed(reason) => format!("Login failed. {}", reason),
            Message::ResetFailed(reason) => format!("Reset failed. {}", reason),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigModuleDisplay => "Display settings:".to_string(),
            Message::ConfigModuleStorage => "Storage settings:".to_string(),
            Message::PromptSelectModules => "Select settings to configure".to_string(),
            Message::PromptShowCompleted => "Show completed tasks in lists".to_string(),
            Message::PromptDefaultPriority => "Default priority filter (all, low, medium, high)".to_string(),
            Message::PromptDefaultStatus => "Default status filter (all, completed, incomplete)".to_string(),
            Message::PromptDatabasePath => "Database file (empty for default location)".to_string(),

            // === SYNC MESSAGES ===
            Message::WatchStarted(email) => format!("Watching tasks of {}. Press Ctrl-C to stop", email),
            Message::WatchStopped => "Stopped watching tasks".to_string(),
            Message::WatchHeader(time) => format!("Tasks as of {}", time),
            Message::RefreshFailed(error) => format!("Could not check for new changes: {}", error),
            Message::SnapshotReceived(count) => format!("Received {} task(s) from subscription", count),
            Message::SubscriptionFallback(error) => format!("Task subscription failed ({}), falling back to a one-time fetch", error),
            Message::SubscriptionFallbackFailed(error) => format!("Fallback fetch failed: {}", error),
            Message::DayRolledOver(date) => format!("New day {}, regrouping tasks", date),
            Message::SessionAttached(user) => format!("Task subscription attached for user {}", user),
            Message::SessionReleased => "Task subscription released".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
        };
        write!(f, "{}", s)
    }
}
