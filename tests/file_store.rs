use newtab_board::favicon::FaviconCache;
use newtab_board::prefs::Preferences;
use newtab_board::shortcuts::{load_shortcuts, save_shortcuts};
use newtab_board::store::{ACTIVE_TAB_KEY, SHORTCUTS_KEY, TABS_KEY};
use newtab_board::{Board, JsonFileStore, KeyValueStore};
use tempfile::tempdir;

#[test]
fn board_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("newtab.json");

    let mut board = Board::load(JsonFileStore::new(&path)).unwrap();
    let news = board.create_tab("News").unwrap();
    let s = board.add_shortcut("Paper", "paper.example", Some(news.id.as_str())).unwrap();
    board.select_tab(&news.id).unwrap();
    drop(board);

    let board = Board::load(JsonFileStore::new(&path)).unwrap();
    assert_eq!(board.active_tab_id(), Some(news.id.as_str()));
    assert_eq!(board.visible_ids(), vec![s.id]);
    assert_eq!(board.shortcut(&board.visible_ids()[0]).unwrap().url, "https://paper.example");
}

#[test]
fn stored_layout_uses_expected_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("newtab.json");
    let mut board = Board::load(JsonFileStore::new(&path)).unwrap();
    board.add_shortcut("A", "a.com", None).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let shortcut = &raw[SHORTCUTS_KEY][0];
    assert_eq!(shortcut["name"], "A");
    assert!(shortcut["id"].is_string());
    let tab = &raw[TABS_KEY][0];
    assert_eq!(tab["name"], "Ungrouped");
    assert_eq!(tab["isDefault"], true);
    assert_eq!(tab["shortcuts"][0], shortcut["id"]);
    assert_eq!(raw[ACTIVE_TAB_KEY], tab["id"]);
}

#[test]
fn saving_loaded_shortcuts_leaves_file_unchanged() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("newtab.json");
    let mut board = Board::load(JsonFileStore::new(&path)).unwrap();
    board.add_shortcut("A", "a.com", None).unwrap();
    board.add_shortcut("B", "http://b.com", None).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let mut store = JsonFileStore::new(&path);
    let list = load_shortcuts(&store).unwrap();
    save_shortcuts(&mut store, &list).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn preferences_and_favicons_share_the_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("newtab.json");
    let mut store = JsonFileStore::new(&path);
    let prefs = Preferences {
        unsplash_key: Some("key".into()),
        search_query: Some("mountains".into()),
        ipify_key: Some("ip".into()),
    };
    prefs.save(&mut store).unwrap();
    FaviconCache::new(&mut store).lookup("https://rust-lang.org").unwrap();

    let store = JsonFileStore::new(&path);
    assert_eq!(Preferences::load(&store).unwrap(), prefs);
    let cached = store.get(&["favicon_rust-lang.org"]).unwrap();
    assert_eq!(cached.len(), 1);
}

#[test]
fn unreadable_file_is_an_error_and_is_left_alone() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("newtab.json");
    let mut board = Board::load(JsonFileStore::new(&path)).unwrap();
    board.add_shortcut("A", "a.com", None).unwrap();
    drop(board);

    let mut bytes = std::fs::read(&path).unwrap();
    bytes.push(0xFF);
    std::fs::write(&path, &bytes).unwrap();

    let mut store = JsonFileStore::new(&path);
    assert!(store.get(&[SHORTCUTS_KEY]).is_err());
    assert!(newtab_board::store::set_json(&mut store, "searchQuery", "x").is_err());
    assert_eq!(std::fs::read(&path).unwrap(), bytes);
    assert!(Board::load(JsonFileStore::new(&path)).is_err());
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("absent.json"));
    assert!(store.get(&[SHORTCUTS_KEY, TABS_KEY]).unwrap().is_empty());
}
