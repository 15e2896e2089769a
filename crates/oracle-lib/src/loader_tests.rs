use crate::loader::normalize_import_path;
use crate::{FileLoader, FileSystemLoader, LoadError, MemoryLoader, derive_namespace};

#[test]
fn namespace_from_path() {
    assert_eq!(derive_namespace("schema/core/label.oracle"), "label");
    assert_eq!(derive_namespace("schema/core/label"), "label");
    assert_eq!(derive_namespace("/path/to/channel.oracle"), "channel");
    assert_eq!(derive_namespace("schema\\core\\rack.oracle"), "rack");
    assert_eq!(derive_namespace("ranger"), "ranger");
}

#[test]
fn normalize_strips_extension_only() {
    assert_eq!(normalize_import_path("schema/label.oracle"), "schema/label");
    assert_eq!(normalize_import_path("schema/label"), "schema/label");
    assert_eq!(normalize_import_path("schema/label.json"), "schema/label.json");
}

#[test]
fn memory_loader_ignores_extension() {
    let loader = MemoryLoader::new().with_file("schema/label.oracle", "Key uuid");
    assert_eq!(loader.len(), 1);

    let by_key = loader.load("schema/label").unwrap();
    let by_file = loader.load("schema/label.oracle").unwrap();
    assert_eq!(by_key, by_file);
    assert_eq!(by_key.source, "Key uuid");
    assert_eq!(by_key.path, "schema/label.oracle");
}

#[test]
fn memory_loader_missing_file() {
    let loader = MemoryLoader::new();
    assert!(loader.is_empty());

    let err = loader.load("schema/missing").unwrap_err();
    assert!(matches!(err, LoadError::NotFound(ref path) if path == "schema/missing"));
    assert_eq!(err.to_string(), "`schema/missing` not found");
}

#[test]
fn file_system_loader_appends_extension() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("schema")).unwrap();
    let path = dir.path().join("schema").join("label.oracle");
    std::fs::write(&path, "Label struct {\n    name string\n}\n").unwrap();

    let loader = FileSystemLoader::new(dir.path());
    assert_eq!(loader.root(), dir.path());

    let loaded = loader.load("schema/label").unwrap();
    assert!(loaded.source.starts_with("Label struct"));
    assert_eq!(loaded.path, path.to_string_lossy());

    let again = loader.load("schema/label.oracle").unwrap();
    assert_eq!(again, loaded);
}

#[test]
fn file_system_loader_absolute_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rack.oracle");
    std::fs::write(&path, "Key uuid\n").unwrap();

    let loader = FileSystemLoader::new("/nonexistent-root");
    let loaded = loader.load(&path.to_string_lossy()).unwrap();
    assert_eq!(loaded.source, "Key uuid\n");
}

#[test]
fn file_system_loader_custom_extension() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("rack.idl"), "Key uuid\n").unwrap();

    let loader = FileSystemLoader::new(dir.path()).with_extension(".idl");
    assert!(loader.load("rack").is_ok());
    assert!(matches!(
        FileSystemLoader::new(dir.path()).load("rack"),
        Err(LoadError::NotFound(_))
    ));
}

#[test]
fn file_system_loader_read_failure() {
    let dir = tempfile::tempdir().unwrap();
    // A directory with the schema name cannot be read as a file.
    std::fs::create_dir(dir.path().join("dir.oracle")).unwrap();

    let loader = FileSystemLoader::new(dir.path());
    let err = loader.load("dir").unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "{:?}", err);
}
