use super::*;

fn id(s: &str) -> TitleId {
    s.parse().unwrap()
}

fn titles() -> TitlesDb {
    let mut db = TitlesDb::new();
    db.insert("SLUS_203.12", "Gran Turismo 4", "Sony");
    db.insert("SLUS_200.62", "", "Rockstar Games");
    db
}

#[test]
fn test_line_layout() {
    let entry = CatalogEntry::describe(
        id("SLUS_203.12"),
        &titles(),
        "Gran Turismo 4 (USA)",
        "DVD",
        "Gran Turismo 4 (USA).iso",
    );
    assert_eq!(
        entry.to_line(),
        "Gran Turismo 4|SLUS_203.12|Sony|DVD|Gran Turismo 4 (USA).iso"
    );
}

#[test]
fn test_unknown_id_uses_stem() {
    let entry = CatalogEntry::describe(
        id("SCES_500.51"),
        &titles(),
        "SCES_500.51.Ico",
        "CD",
        "SCES_500.51.Ico.iso",
    );
    assert_eq!(entry.display_name, "Ico");
    assert_eq!(entry.publisher, "");
}

#[test]
fn test_empty_title_falls_back_and_drops_publisher() {
    let entry = CatalogEntry::describe(
        id("SLUS_200.62"),
        &titles(),
        "GTA3",
        "DVD",
        "GTA3.iso",
    );
    assert_eq!(entry.display_name, "GTA3");
    assert_eq!(entry.publisher, "");
}

#[test]
fn test_fields_are_sanitized() {
    let mut db = TitlesDb::new();
    db.insert("SLUS_203.12", "Name|With\nBreaks", "Pub\r");
    let entry = CatalogEntry::describe(id("SLUS_203.12"), &db, "x", "DVD", "a|b.iso");
    let line = entry.to_line();
    assert_eq!(line, "Name With Breaks|SLUS_203.12|Pub |DVD|a b.iso");
    assert_eq!(line.split('|').count(), 5);
}

#[test]
fn test_display_name_from_stem() {
    assert_eq!(display_name_from_stem("SLUS_203.12.Gran Turismo 4"), "Gran Turismo 4");
    assert_eq!(display_name_from_stem("SLUS_203.12."), "");
    assert_eq!(display_name_from_stem("SLUS_203.12"), "SLUS_203.12");
    assert_eq!(display_name_from_stem("SLUS_203.12 Game"), "SLUS_203.12 Game");
    assert_eq!(display_name_from_stem("Ōkami"), "Ōkami");
    // Positions count characters, not bytes
    assert_eq!(display_name_from_stem("ÅBCD_123.45.Ünïcode"), "Ünïcode");
}

#[test]
fn test_writer_appends_complete_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ps2.list");
    std::fs::write(&path, "existing|SLUS_000.00|||x.iso\n").unwrap();

    let mut writer = CatalogWriter::append(&path).unwrap();
    let entry = CatalogEntry::describe(id("SLUS_203.12"), &titles(), "x", "DVD", "x.iso");
    writer.write(&entry).unwrap();
    assert_eq!(writer.written(), 1);

    // Visible on disk before the writer is dropped
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents,
        "existing|SLUS_000.00|||x.iso\nGran Turismo 4|SLUS_203.12|Sony|DVD|x.iso\n"
    );
}

#[test]
fn test_remove_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ps2.list");
    remove_catalog(&path).unwrap();
    std::fs::write(&path, "x").unwrap();
    remove_catalog(&path).unwrap();
    assert!(!path.exists());
}
