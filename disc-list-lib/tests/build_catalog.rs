use std::cell::{Cell, RefCell};
use std::fs;
use std::path::Path;

use disc_list_core::{IdSource, Platform};
use disc_list_lib::builder::{BuildOptions, BuildProgress, BuildStatus, build_catalog};
use disc_list_lib::convert::ImageConverter;
use disc_list_lib::error::CatalogError;
use disc_list_lib::titles::TitlesDb;

/// Writes a fixed raw image instead of decompressing anything.
struct FakeConverter {
    image: Vec<u8>,
    calls: Cell<usize>,
}

impl FakeConverter {
    fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            calls: Cell::new(0),
        }
    }
}

impl ImageConverter for FakeConverter {
    fn convert(&self, _source: &Path, target: &Path) -> Result<(), CatalogError> {
        self.calls.set(self.calls.get() + 1);
        fs::write(target, &self.image)?;
        Ok(())
    }
}

struct FailingConverter;

impl ImageConverter for FailingConverter {
    fn convert(&self, source: &Path, _target: &Path) -> Result<(), CatalogError> {
        Err(CatalogError::conversion(source, "bad header"))
    }
}

fn quiet(_: BuildProgress) {}

fn image_with_boot(marker: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; 8192];
    data[4096..4096 + marker.len()].copy_from_slice(marker);
    data
}

fn titles() -> TitlesDb {
    TitlesDb::from_reader(
        "SLUS_203.12|Gran Turismo 4|Sony\nSCUS_123.45|Shadow of the Colossus|SCEA\n".as_bytes(),
    )
    .unwrap()
}

fn ps2_root() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("DVD")).unwrap();
    fs::create_dir(root.path().join("CD")).unwrap();
    root
}

#[test]
fn test_build_writes_sorted_catalog() {
    let root = ps2_root();
    let dvd = root.path().join("DVD");
    fs::write(dvd.join("SLUS_203.12.Gran Turismo 4.iso"), b"").unwrap();
    fs::write(
        dvd.join("Shadow Game.iso"),
        image_with_boot(b"BOOT2 = cdrom0:\\SCUS_123.45;1\r\nVER = 1.00"),
    )
    .unwrap();
    fs::write(root.path().join("CD").join("Mystery.iso"), vec![0u8; 4096]).unwrap();

    let list = root.path().join("ps2.list");
    fs::write(&list, "stale|line\n").unwrap();

    let events = RefCell::new(Vec::new());
    let converter = FakeConverter::new(Vec::new());
    let summary = build_catalog(
        root.path(),
        &list,
        &titles(),
        &BuildOptions::new(Platform::Ps2),
        &converter,
        &|p: BuildProgress| events.borrow_mut().push(p),
    )
    .unwrap();

    assert_eq!(summary.status, BuildStatus::Done);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.written, 3);
    assert!(summary.sorted);
    assert_eq!(summary.count(IdSource::Filename), 1);
    assert_eq!(summary.count(IdSource::BootMarker), 1);
    assert_eq!(summary.count(IdSource::Synthetic), 1);
    assert_eq!(converter.calls.get(), 0);

    let contents = fs::read_to_string(&list).unwrap();
    assert_eq!(
        contents,
        "Gran Turismo 4|SLUS_203.12|Sony|DVD|SLUS_203.12.Gran Turismo 4.iso\n\
         Mystery|MYST_ERY.00||CD|Mystery.iso\n\
         Shadow of the Colossus|SCUS_123.45|SCEA|DVD|Shadow Game.iso\n"
    );

    let events = events.into_inner();
    assert!(matches!(events.first(), Some(BuildProgress::Counted { total: 3 })));
    assert!(matches!(events.last(), Some(BuildProgress::Done)));
    let resolved = events
        .iter()
        .filter(|e| matches!(e, BuildProgress::Resolved { .. }))
        .count();
    assert_eq!(resolved, 3);
}

#[test]
fn test_unsorted_build_keeps_folder_order() {
    let root = ps2_root();
    fs::write(root.path().join("DVD").join("Zeta.iso"), b"").unwrap();
    fs::write(root.path().join("CD").join("Alpha.iso"), b"").unwrap();

    let list = root.path().join("ps2.list");
    let options = BuildOptions::new(Platform::Ps2).sort(None);
    let summary = build_catalog(
        root.path(),
        &list,
        &TitlesDb::new(),
        &options,
        &FakeConverter::new(Vec::new()),
        &quiet,
    )
    .unwrap();
    assert!(!summary.sorted);

    let contents = fs::read_to_string(&list).unwrap();
    let folders: Vec<&str> = contents
        .lines()
        .map(|l| l.split('|').nth(3).unwrap())
        .collect();
    assert_eq!(folders, ["DVD", "CD"]);
}

#[test]
fn test_compressed_image_is_converted_and_renamed() {
    let root = ps2_root();
    let dvd = root.path().join("DVD");
    fs::write(dvd.join("Packed.zso"), b"ZISO").unwrap();

    let list = root.path().join("ps2.list");
    let converter = FakeConverter::new(image_with_boot(b"BOOT2 = cdrom0:\\SLES_500.03;1"));
    let options = BuildOptions::new(Platform::Ps2);

    let summary = build_catalog(root.path(), &list, &TitlesDb::new(), &options, &converter, &quiet)
        .unwrap();
    assert_eq!(converter.calls.get(), 1);
    assert_eq!(summary.converted, 1);
    assert_eq!(summary.renamed, 1);

    assert!(!dvd.join("Packed.zso").exists());
    assert!(dvd.join("SLES_500.03.Packed.zso").exists());
    assert!(!dvd.join(".Packed.disc-list.iso").exists());
    assert_eq!(
        fs::read_to_string(&list).unwrap(),
        "Packed|SLES_500.03||DVD|SLES_500.03.Packed.zso\n"
    );

    // The renamed image resolves from its filename without converting again
    let summary = build_catalog(root.path(), &list, &TitlesDb::new(), &options, &converter, &quiet)
        .unwrap();
    assert_eq!(converter.calls.get(), 1);
    assert_eq!(summary.count(IdSource::Filename), 1);
    assert_eq!(
        fs::read_to_string(&list).unwrap(),
        "Packed|SLES_500.03||DVD|SLES_500.03.Packed.zso\n"
    );
}

#[test]
fn test_rename_can_be_disabled() {
    let root = ps2_root();
    let dvd = root.path().join("DVD");
    fs::write(dvd.join("Packed.zso"), b"ZISO").unwrap();

    let list = root.path().join("ps2.list");
    let converter = FakeConverter::new(image_with_boot(b"BOOT2 = cdrom0:\\SLES_500.03;1"));
    let options = BuildOptions::new(Platform::Ps2).rename_converted(false);
    let summary = build_catalog(root.path(), &list, &TitlesDb::new(), &options, &converter, &quiet)
        .unwrap();

    assert_eq!(summary.renamed, 0);
    assert!(dvd.join("Packed.zso").exists());
    assert_eq!(
        fs::read_to_string(&list).unwrap(),
        "Packed|SLES_500.03||DVD|Packed.zso\n"
    );
}

#[test]
fn test_rename_never_overwrites_existing_image() {
    let root = ps2_root();
    let dvd = root.path().join("DVD");
    fs::write(dvd.join("Packed.zso"), b"ZISO").unwrap();
    fs::write(dvd.join("SLES_500.03.Packed.zso"), b"KEEP").unwrap();

    let list = root.path().join("ps2.list");
    let converter = FakeConverter::new(image_with_boot(b"BOOT2 = cdrom0:\\SLES_500.03;1"));
    let options = BuildOptions::new(Platform::Ps2);
    let summary = build_catalog(root.path(), &list, &TitlesDb::new(), &options, &converter, &quiet)
        .unwrap();

    assert_eq!(converter.calls.get(), 1);
    assert_eq!(summary.converted, 1);
    assert_eq!(summary.renamed, 0);
    assert!(dvd.join("Packed.zso").exists());
    assert_eq!(fs::read(dvd.join("SLES_500.03.Packed.zso")).unwrap(), b"KEEP");

    let contents = fs::read_to_string(&list).unwrap();
    assert!(contents.contains("Packed|SLES_500.03||DVD|Packed.zso\n"), "{contents}");
    assert!(contents.contains("Packed|SLES_500.03||DVD|SLES_500.03.Packed.zso\n"), "{contents}");
}

#[test]
fn test_conversion_failure_aborts_build() {
    let root = ps2_root();
    let dvd = root.path().join("DVD");
    fs::write(dvd.join("Broken.zso"), b"ZISO").unwrap();

    let list = root.path().join("ps2.list");
    let err = build_catalog(
        root.path(),
        &list,
        &TitlesDb::new(),
        &BuildOptions::new(Platform::Ps2),
        &FailingConverter,
        &quiet,
    )
    .unwrap_err();

    assert!(matches!(err, CatalogError::ConversionFailure { .. }), "{err}");
    assert!(dvd.join("Broken.zso").exists());
}

#[test]
fn test_missing_folder() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("DVD")).unwrap();

    let err = build_catalog(
        root.path(),
        &root.path().join("ps2.list"),
        &TitlesDb::new(),
        &BuildOptions::new(Platform::Ps2),
        &FakeConverter::new(Vec::new()),
        &quiet,
    )
    .unwrap_err();

    match err {
        CatalogError::MissingFolder { folder, .. } => assert_eq!(folder, "CD"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_no_images_removes_old_catalog() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("POPS")).unwrap();
    fs::write(root.path().join("POPS").join("readme.txt"), b"").unwrap();

    let list = root.path().join("ps1.list");
    fs::write(&list, "old|entry\n").unwrap();

    let summary = build_catalog(
        root.path(),
        &list,
        &TitlesDb::new(),
        &BuildOptions::new(Platform::Ps1),
        &FakeConverter::new(Vec::new()),
        &quiet,
    )
    .unwrap();

    assert_eq!(summary.status, BuildStatus::NoImages);
    assert_eq!(summary.written, 0);
    assert!(!list.exists());
}
