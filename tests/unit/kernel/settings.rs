use super::*;
use crate::kernel::services::adapters::MemorySlot;

fn store_with(slot: &Arc<MemorySlot>) -> SettingsStore {
    SettingsStore::load(slot.clone())
}

fn stored(slot: &MemorySlot) -> Settings {
    let text = slot.get(SETTINGS_KEY).unwrap().expect("settings were written");
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_empty_slot_gives_defaults() {
    let slot = Arc::new(MemorySlot::new());
    let store = store_with(&slot);
    assert_eq!(store.get(), &Settings::default());
    assert!(store.last_error().is_none());
}

#[test]
fn test_load_merges_stored_fields_over_defaults() {
    let slot = Arc::new(MemorySlot::with_value(
        SETTINGS_KEY,
        r#"{"theme":"light","fontSize":18,"somethingElse":1}"#,
    ));
    let store = store_with(&slot);

    assert_eq!(store.get().theme, Theme::Light);
    assert_eq!(store.get().font_size, 18);
    assert_eq!(store.get().sidebar_width, 300);
    assert_eq!(store.get().tab_size, 2);
}

#[test]
fn test_load_garbage_falls_back_to_defaults() {
    let slot = Arc::new(MemorySlot::with_value(SETTINGS_KEY, "not json"));
    let store = store_with(&slot);
    assert_eq!(store.get(), &Settings::default());
}

#[test]
fn test_load_clamps_out_of_range_values() {
    let slot = Arc::new(MemorySlot::with_value(SETTINGS_KEY, r#"{"sidebarWidth":9000}"#));
    let store = store_with(&slot);
    assert_eq!(store.get().sidebar_width, 600);
}

#[test]
fn test_font_size_is_clamped() {
    let slot = Arc::new(MemorySlot::new());
    let mut store = store_with(&slot);

    store.set_font_size(100);
    assert_eq!(store.get().font_size, 24);
    store.set_font_size(0);
    assert_eq!(store.get().font_size, 10);
    store.set_font_size(16);
    assert_eq!(store.get().font_size, 16);
}

#[test]
fn test_width_and_tab_size_clamps() {
    let slot = Arc::new(MemorySlot::new());
    let mut store = store_with(&slot);

    store.set_sidebar_width(50);
    store.set_console_width(5000);
    store.set_tab_size(12);
    assert_eq!(store.get().sidebar_width, 200);
    assert_eq!(store.get().console_width, 800);
    assert_eq!(store.get().tab_size, 8);
}

#[test]
fn test_every_change_is_written_through() {
    let slot = Arc::new(MemorySlot::new());
    let mut store = store_with(&slot);

    store.set_theme(Theme::Light);
    assert_eq!(stored(&slot).theme, Theme::Light);

    store.set_show_console(false);
    store.set_auto_save(true);
    store.set_font_family("Fira Code");
    let on_disk = stored(&slot);
    assert!(!on_disk.show_console);
    assert!(on_disk.auto_save);
    assert_eq!(on_disk.font_family, "Fira Code");

    // 重新载入得到同样的设置
    assert_eq!(store_with(&slot).get(), store.get());
}

#[test]
fn test_patch_touches_only_given_fields() {
    let slot = Arc::new(MemorySlot::new());
    let mut store = store_with(&slot);
    store.set_theme(Theme::Light);

    store.set(SettingsPatch {
        font_size: Some(40),
        show_sidebar: Some(false),
        ..SettingsPatch::default()
    });

    let s = store.get();
    assert_eq!(s.font_size, 24);
    assert!(!s.show_sidebar);
    assert_eq!(s.theme, Theme::Light);
    assert_eq!(s.console_width, 400);
}

#[test]
fn test_reset_restores_defaults() {
    let slot = Arc::new(MemorySlot::new());
    let mut store = store_with(&slot);
    store.set_tab_size(4);
    store.set_show_status_bar(false);

    store.reset();
    assert_eq!(store.get(), &Settings::default());
    assert_eq!(stored(&slot), Settings::default());
}

#[test]
fn test_export_import_round_trip() {
    let slot = Arc::new(MemorySlot::new());
    let mut store = store_with(&slot);
    store.set_theme(Theme::Light);
    store.set_sidebar_width(420);
    let exported = store.export_as_text();
    assert!(exported.contains("\"sidebarWidth\": 420"));

    let other_slot = Arc::new(MemorySlot::new());
    let mut other = store_with(&other_slot);
    assert!(other.import_from_text(&exported));
    assert_eq!(other.get(), store.get());
    assert_eq!(stored(&other_slot), *store.get());
}

#[test]
fn test_import_rejects_garbage() {
    let slot = Arc::new(MemorySlot::new());
    let mut store = store_with(&slot);
    store.set_font_size(20);

    assert!(!store.import_from_text("{ broken"));
    assert_eq!(store.get().font_size, 20);
}

#[test]
fn test_import_clamps() {
    let slot = Arc::new(MemorySlot::new());
    let mut store = store_with(&slot);
    assert!(store.import_from_text(r#"{"fontSize": 3, "consoleWidth": 100}"#));
    assert_eq!(store.get().font_size, 10);
    assert_eq!(store.get().console_width, 200);
}

#[test]
fn test_write_failure_keeps_memory_state() {
    let slot = Arc::new(MemorySlot::new());
    let mut store = store_with(&slot);
    slot.set_failing(true);

    store.set_font_size(18);
    assert_eq!(store.get().font_size, 18);
    let err = store.last_error().unwrap();
    assert!(err.starts_with("Failed to save settings"), "{}", err);
    assert!(slot.get(SETTINGS_KEY).unwrap().is_none());

    slot.set_failing(false);
    store.set_font_size(19);
    assert!(store.last_error().is_none());
    assert_eq!(stored(&slot).font_size, 19);
}
