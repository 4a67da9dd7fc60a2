#[cfg(test)]
mod tests {
    use gigtask::libs::config::{Config, DisplayConfig, StorageConfig, DB_FILE_NAME};
    use gigtask::libs::filter::{Filter, PriorityFilter, StatusFilter};
    use std::sync::{Mutex, MutexGuard};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    // HOME is process-wide; tests touching it take turns.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Points the data directory at a fresh temporary home.
    struct ConfigTestContext {
        temp_dir: TempDir,
        _env: MutexGuard<'static, ()>,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let env = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext { temp_dir, _env: env }
        }
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_read_nonexistent_config(_ctx: &mut ConfigTestContext) {
        let config = Config::read().unwrap();
        assert_eq!(config, Config::default());
        assert!(config.display().show_completed);
        assert_eq!(config.default_filter(), Filter::default());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_config(ctx: &mut ConfigTestContext) {
        let database = ctx.temp_dir.path().join("elsewhere.db");
        let config = Config {
            display: Some(DisplayConfig {
                show_completed: false,
                default_filter: Filter::new(PriorityFilter::High, StatusFilter::Incomplete),
            }),
            storage: Some(StorageConfig {
                database: Some(database.clone()),
            }),
        };
        config.save().unwrap();

        let read_config = Config::read().unwrap();
        assert_eq!(read_config, config);
        assert_eq!(read_config.database_path().unwrap(), database);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_default_database_lives_in_data_dir(ctx: &mut ConfigTestContext) {
        let path = Config::default().database_path().unwrap();
        assert!(path.starts_with(ctx.temp_dir.path()));
        assert!(path.ends_with(DB_FILE_NAME));
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_filter_in_file_uses_defaults(_ctx: &mut ConfigTestContext) {
        let json = r#"{ "display": { "show_completed": true, "default_filter": { "status": "completed" } } }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.default_filter(), Filter::new(PriorityFilter::All, StatusFilter::Completed));
    }
}
