use super::*;
use std::time::{Duration, UNIX_EPOCH};

#[test]
fn test_new_file_into_record() {
    let now = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let record = NewFile::new("main.ts", "/src/main.ts", "let x = 1;", "typescript").into_record(now);

    assert_eq!(record.id, "/src/main.ts");
    assert_eq!(record.path, record.id);
    assert_eq!(record.size, 10);
    assert_eq!(record.last_modified, now);
}

#[test]
fn test_size_counts_utf8_bytes() {
    let record = NewFile::new("a.md", "/a.md", "héllo 世界", "markdown").into_record(UNIX_EPOCH);
    assert_eq!(record.size, "héllo 世界".len() as u64);
    assert_eq!(record.size, 13);
}

#[test]
fn test_folder_record_id_mirrors_path() {
    let record = NewFolder::new("lib", "/src/lib").with_parent("/src").into_record();
    assert_eq!(record.id, "/src/lib");
    assert_eq!(record.parent_id.as_deref(), Some("/src"));
    assert!(record.children.is_empty());
    assert!(!record.expanded);
}

#[test]
fn test_serialized_field_names_are_camel_case() {
    let record = NewFile::new("a.txt", "/a.txt", "", "plaintext").into_record(UNIX_EPOCH);
    let json = serde_json::to_value(&record).unwrap();
    assert!(json.get("lastModified").is_some());

    let folder = NewFolder::new("src", "/src").with_parent("/").into_record();
    let json = serde_json::to_value(&folder).unwrap();
    assert_eq!(json["parentId"], "/");
}
