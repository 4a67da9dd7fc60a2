#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated(String),
    TaskUpdated(String),
    TaskDeleted(String),
    TaskCompleted(String),
    TaskReopened(String),
    TaskNotFound(String),
    TaskIdAmbiguous(String, usize), // prefix, matches
    TaskCreateFailed,
    TaskTitleRequired,
    NoChangesProvided,
    ConfirmDeleteTask(String),
    InvalidDueDate(String),
    OperationCancelled,

    // === LIST MESSAGES ===
    NoTasksYet,
    NoTasksMatchFilters,
    ActiveFilters(String),
    TasksHeader(usize),
    CalendarHeader(String), // month
    TasksForDateHeader(String),
    NoTasksForDate(String),

    // === ACCOUNT MESSAGES ===
    AccountCreated(String),
    SignedIn(String),
    SignedOut,
    SignedInAs(String),
    NotSignedIn,
    PasswordResetRequested(String),
    PasswordStrength(String),
    PromptEmail,
    PromptPassword,
    PromptConfirmPassword,
    RegistrationFailed(String),
    LoginFailed(String),
    ResetFailed(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigModuleDisplay,
    ConfigModuleStorage,
    PromptSelectModules,
    PromptShowCompleted,
    PromptDefaultPriority,
    PromptDefaultStatus,
    PromptDatabasePath,

    // === SYNC MESSAGES ===
    WatchStarted(String), // email
    WatchStopped,
    WatchHeader(String), // local time
    RefreshFailed(String),
    SnapshotReceived(usize),
    SubscriptionFallback(String),
    SubscriptionFallbackFailed(String),
    DayRolledOver(String),
    SessionAttached(String),
    SessionReleased,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
}
