use super::*;

#[test]
fn test_dirs_live_under_app_dir() {
    let Some(store) = get_store_dir() else {
        return;
    };
    assert!(store.to_string_lossy().contains(APP_NAME));
    assert!(store.ends_with(STORE_DIR));

    let settings = get_settings_dir().unwrap();
    assert_eq!(settings.parent(), store.parent());
    assert!(get_log_dir().unwrap().ends_with(LOG_DIR));
}
