use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use finfo_core::{
    scan_directory, stat_arguments, Catalog, CatalogError, Detail, ListSource, SessionConfig,
};
use tempfile::TempDir;

fn names(catalog: &Catalog) -> Vec<String> {
    catalog.items().iter().map(|i| i.name()).collect()
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("b.txt"), "b").unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    dir
}

#[test]
fn test_directories_first_then_files() {
    let dir = fixture();
    let (catalog, skipped) =
        Catalog::load(ListSource::Directory(dir.path().to_path_buf()), 50).unwrap();

    assert!(skipped.is_empty());
    assert_eq!(names(&catalog), vec!["sub", "a.txt", "b.txt"]);
    assert!(catalog.items()[0].is_dir);
}

#[test]
fn test_ordering_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    for name in ["Zeta.md", "alpha.md", "Beta.md"] {
        fs::write(dir.path().join(name), "").unwrap();
    }
    fs::create_dir(dir.path().join("Zdir")).unwrap();
    fs::create_dir(dir.path().join("adir")).unwrap();

    let items = scan_directory(dir.path()).unwrap();
    let names: Vec<String> = items.iter().map(|i| i.name()).collect();
    assert_eq!(names, vec!["adir", "Zdir", "alpha.md", "Beta.md", "Zeta.md"]);
}

#[test]
fn test_scan_directory_errors() {
    let dir = fixture();
    let missing = dir.path().join("nope");
    assert!(matches!(
        scan_directory(&missing),
        Err(CatalogError::NotFound { .. })
    ));

    let file = dir.path().join("a.txt");
    assert!(matches!(
        scan_directory(&file),
        Err(CatalogError::NotADirectory { .. })
    ));
}

#[test]
fn test_arguments_keep_order_and_skip_missing() {
    let dir = fixture();
    let paths = vec![
        dir.path().join("b.txt"),
        dir.path().join("missing.txt"),
        dir.path().join("sub"),
        dir.path().join("a.txt"),
    ];

    let (items, skipped) = stat_arguments(&paths);
    let names: Vec<String> = items.iter().map(|i| i.name()).collect();
    assert_eq!(names, vec!["b.txt", "sub", "a.txt"]);
    assert!(items[1].is_dir);
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].path(), dir.path().join("missing.txt"));
}

#[test]
fn test_reload_keeps_selection_of_surviving_paths() {
    let dir = fixture();
    let source = ListSource::Directory(dir.path().to_path_buf());
    let (mut catalog, _) = Catalog::load(source.clone(), 50).unwrap();

    catalog.set_focus(1);
    catalog.toggle_focused(); // a.txt
    catalog.set_focus(2);
    catalog.toggle_focused(); // b.txt

    fs::remove_file(dir.path().join("b.txt")).unwrap();
    fs::write(dir.path().join("c.txt"), "c").unwrap();

    let (items, _) = source.load().unwrap();
    catalog.replace(items);

    assert_eq!(names(&catalog), vec!["sub", "a.txt", "c.txt"]);
    assert_eq!(catalog.selected_paths(), &[dir.path().join("a.txt")]);
    assert!(catalog.items()[1].selected);
    assert!(!catalog.items()[2].selected);
}

#[test]
fn test_restore_selection_ignores_absent_paths() {
    let dir = fixture();
    let (mut catalog, _) =
        Catalog::load(ListSource::Directory(dir.path().to_path_buf()), 50).unwrap();

    let saved: HashSet<PathBuf> = [dir.path().join("b.txt"), dir.path().join("gone.txt")]
        .into_iter()
        .collect();
    catalog.restore_selection(&saved);

    assert_eq!(catalog.selected_paths(), &[dir.path().join("b.txt")]);
}

#[test]
fn test_page_index_stays_in_bounds() {
    let dir = TempDir::new().unwrap();
    for i in 0..23 {
        fs::write(dir.path().join(format!("f{i:02}")), "").unwrap();
    }
    let (mut catalog, _) =
        Catalog::load(ListSource::Directory(dir.path().to_path_buf()), 5).unwrap();

    let expected_pages = 23usize.div_ceil(5);
    assert_eq!(catalog.page_count(), expected_pages);

    let moves = [
        true, true, false, true, true, true, true, true, false, false, false, false, false,
        false,
    ];
    for forward in moves {
        if forward {
            catalog.next_page();
        } else {
            catalog.prev_page();
        }
        assert!(catalog.page() < expected_pages);
        assert!(catalog.visible_range().contains(&catalog.focus()));
    }
    assert_eq!(catalog.page(), 0);
}

#[test]
fn test_session_config_from_partial_toml() {
    let config: SessionConfig = toml::from_str(
        r#"
        tool = "/opt/bin/finfo"
        page_size = 40
        detail = "long"
        "#,
    )
    .unwrap();

    assert_eq!(config.tool, "/opt/bin/finfo");
    assert_eq!(config.page_size, 40);
    assert_eq!(config.detail, Detail::Long);
    // Unset keys keep their defaults
    assert_eq!(config.debounce_ms, SessionConfig::default().debounce_ms);
    assert!(config.show_preview);

    let written = toml::to_string(&config).unwrap();
    let reread: SessionConfig = toml::from_str(&written).unwrap();
    assert_eq!(reread.tool, config.tool);
    assert_eq!(reread.page_size, 40);
    assert_eq!(reread.detail, Detail::Long);
}
