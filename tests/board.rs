use newtab_board::reorder::DropHint;
use newtab_board::store::{set_json, TABS_KEY};
use newtab_board::{Board, BoardError, MemoryStore, Tab, DEFAULT_TAB_NAME};
use std::collections::HashSet;

fn fresh() -> Board<MemoryStore> {
    Board::load(MemoryStore::new()).unwrap()
}

fn tab_names(board: &Board<MemoryStore>) -> Vec<String> {
    board.tabs().iter().map(|t| t.name.clone()).collect()
}

fn assert_single_owner(board: &Board<MemoryStore>) {
    let listed: Vec<&String> = board.tabs().iter().flat_map(|t| &t.shortcuts).collect();
    let unique: HashSet<&String> = listed.iter().copied().collect();
    assert_eq!(listed.len(), unique.len(), "a shortcut is listed twice");
    let all: HashSet<&String> = board.shortcuts().iter().map(|s| &s.id).collect();
    assert_eq!(unique, all);
}

#[test]
fn empty_store_starts_with_default_tab() {
    let board = fresh();
    assert_eq!(board.tabs().len(), 1);
    let def = &board.tabs()[0];
    assert_eq!(def.name, DEFAULT_TAB_NAME);
    assert!(def.shortcuts.is_empty());
    assert_eq!(board.active_tab_id(), Some(def.id.as_str()));
}

#[test]
fn added_shortcut_is_normalized_and_ungrouped() {
    let mut board = fresh();
    let s = board.add_shortcut("Example", "example.com", None).unwrap();
    assert_eq!(s.url, "https://example.com");
    assert_eq!(board.default_tab().unwrap().shortcuts, vec![s.id.clone()]);
    assert_eq!(board.visible_ids(), vec![s.id]);
}

#[test]
fn deleting_a_tab_returns_members_to_default() {
    let mut board = fresh();
    let x = board.add_shortcut("X", "x.com", None).unwrap();
    let work = board.create_tab("Work").unwrap();
    board
        .update_shortcut(&x.id, "X", "x.com", Some(work.id.as_str()))
        .unwrap();
    assert_eq!(board.owner_of(&x.id).unwrap().id, work.id);
    assert!(!board.default_tab().unwrap().contains(&x.id));

    board.delete_tab(&work.id).unwrap();
    assert!(board.default_tab().unwrap().contains(&x.id));
    assert!(board.shortcut(&x.id).is_some());
    assert_single_owner(&board);

    let reloaded = Board::load(board.into_store()).unwrap();
    assert!(reloaded.default_tab().unwrap().contains(&x.id));
}

#[test]
fn default_tab_cannot_be_dragged() {
    let mut board = fresh();
    let a = board.create_tab("A").unwrap();
    let def = board.default_tab().unwrap().id.clone();
    assert!(!board.begin_tab_drag(&def));
    assert!(!board.drop_tab(&a.id).unwrap());
    assert_eq!(tab_names(&board), vec![DEFAULT_TAB_NAME, "A"]);
}

#[test]
fn dropping_forward_places_tab_after_target() {
    let mut board = fresh();
    let a = board.create_tab("A").unwrap();
    board.create_tab("B").unwrap();
    let c = board.create_tab("C").unwrap();

    assert!(board.begin_tab_drag(&a.id));
    assert_eq!(board.tab_drag_over(&c.id), DropHint::Valid);
    let def = board.default_tab().unwrap().id.clone();
    assert_eq!(board.tab_drag_over(&def), DropHint::Invalid);
    assert!(board.drop_tab(&c.id).unwrap());
    assert_eq!(tab_names(&board), vec![DEFAULT_TAB_NAME, "B", "C", "A"]);

    let reloaded = Board::load(board.into_store()).unwrap();
    assert_eq!(tab_names(&reloaded), vec![DEFAULT_TAB_NAME, "B", "C", "A"]);
}

#[test]
fn dropping_on_default_tab_changes_nothing() {
    let mut board = fresh();
    let a = board.create_tab("A").unwrap();
    board.create_tab("B").unwrap();
    let def = board.default_tab().unwrap().id.clone();
    let writes = board.store().writes();
    assert!(board.begin_tab_drag(&a.id));
    assert!(!board.drop_tab(&def).unwrap());
    assert_eq!(tab_names(&board), vec![DEFAULT_TAB_NAME, "A", "B"]);
    assert_eq!(board.store().writes(), writes);
}

#[test]
fn deleting_default_tab_is_forbidden() {
    let mut board = fresh();
    board.create_tab("A").unwrap();
    let before: Vec<Tab> = board.tabs().to_vec();
    let def = board.default_tab().unwrap().id.clone();
    assert!(matches!(board.delete_tab(&def), Err(BoardError::Forbidden(_))));
    assert_eq!(board.tabs(), before.as_slice());
}

#[test]
fn validation_failures_persist_nothing() {
    let mut board = fresh();
    let writes = board.store().writes();
    assert!(matches!(board.add_shortcut("", "x.com", None), Err(BoardError::Validation(_))));
    assert!(matches!(board.add_shortcut("x", "  ", None), Err(BoardError::Validation(_))));
    assert!(matches!(board.create_tab(" "), Err(BoardError::Validation(_))));
    assert!(matches!(
        board.add_shortcut("x", "x.com", Some("missing")),
        Err(BoardError::NotFound { .. })
    ));
    assert_eq!(board.store().writes(), writes);
    assert!(board.shortcuts().is_empty());
}

#[test]
fn deleting_a_shortcut_prunes_membership() {
    let mut board = fresh();
    let work = board.create_tab("Work").unwrap();
    let a = board.add_shortcut("A", "a.com", Some(work.id.as_str())).unwrap();
    let b = board.add_shortcut("B", "b.com", Some(work.id.as_str())).unwrap();
    board.delete_shortcut(&a.id).unwrap();
    assert_eq!(board.tab(&work.id).unwrap().shortcuts, vec![b.id]);
    assert!(matches!(board.delete_shortcut(&a.id), Err(BoardError::NotFound { .. })));
    assert_single_owner(&board);
}

#[test]
fn active_tab_filters_visible_shortcuts() {
    let mut board = fresh();
    let work = board.create_tab("Work").unwrap();
    let home = board.add_shortcut("Home", "home.com", None).unwrap();
    let job = board.add_shortcut("Job", "job.com", Some(work.id.as_str())).unwrap();
    assert_eq!(board.visible_ids(), vec![home.id.clone()]);
    board.select_tab(&work.id).unwrap();
    let names: Vec<_> = board.visible_shortcuts().iter().map(|s| s.name.clone()).collect();
    assert_eq!(names, vec!["Job"]);
    assert_eq!(board.visible_ids(), vec![job.id]);
    assert!(board.select_tab("nope").is_err());
}

#[test]
fn shortcut_drag_reorders_flat_list_and_membership() {
    let mut board = fresh();
    let work = board.create_tab("Work").unwrap();
    let a = board.add_shortcut("A", "a.com", None).unwrap();
    let w = board.add_shortcut("W", "w.com", Some(work.id.as_str())).unwrap();
    let b = board.add_shortcut("B", "b.com", None).unwrap();
    let c = board.add_shortcut("C", "c.com", None).unwrap();

    assert!(board.begin_shortcut_drag(&a.id));
    assert_eq!(board.shortcut_drag_over(&w.id), DropHint::Invalid);
    assert_eq!(board.shortcut_drag_over(&a.id), DropHint::None);
    assert!(board.drop_shortcut(&c.id).unwrap());

    let flat: Vec<_> = board.shortcuts().iter().map(|s| s.id.clone()).collect();
    assert_eq!(flat, vec![w.id.clone(), b.id.clone(), c.id.clone(), a.id.clone()]);
    assert_eq!(board.visible_ids(), vec![b.id.clone(), c.id.clone(), a.id.clone()]);
    assert_eq!(board.tab(&work.id).unwrap().shortcuts, vec![w.id]);

    let reloaded = Board::load(board.into_store()).unwrap();
    assert_eq!(reloaded.visible_ids(), vec![b.id, c.id, a.id]);
}

#[test]
fn self_drop_persists_nothing() {
    let mut board = fresh();
    let a = board.add_shortcut("A", "a.com", None).unwrap();
    let writes = board.store().writes();
    assert!(!board.move_shortcut(&a.id, &a.id).unwrap());
    assert_eq!(board.store().writes(), writes);
}

#[test]
fn reloading_twice_writes_identical_tabs() {
    let mut store = MemoryStore::new();
    let stale = vec![Tab {
        id: "w".into(),
        name: "Work".into(),
        shortcuts: vec!["ghost".into()],
        is_default: false,
    }];
    set_json(&mut store, TABS_KEY, &stale).unwrap();

    let board = Board::load(store).unwrap();
    let store = board.into_store();
    let first = serde_json::to_string(store.raw(TABS_KEY).unwrap()).unwrap();
    let writes = store.writes();

    let board = Board::load(store).unwrap();
    let store = board.into_store();
    let second = serde_json::to_string(store.raw(TABS_KEY).unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(store.writes(), writes);
}

#[test]
fn renaming_default_tab_keeps_it_default() {
    let mut board = fresh();
    let def = board.default_tab().unwrap().id.clone();
    board.rename_tab(&def, "Misc").unwrap();
    board.create_tab(DEFAULT_TAB_NAME).unwrap();
    let reloaded = Board::load(board.into_store()).unwrap();
    assert_eq!(reloaded.default_tab().unwrap().id, def);
    assert_eq!(reloaded.tabs().iter().filter(|t| t.is_default).count(), 1);
}

#[test]
fn moving_a_shortcut_to_a_tab_keeps_flat_order() {
    let mut board = fresh();
    let work = board.create_tab("Work").unwrap();
    let x = board.add_shortcut("X", "x.com", None).unwrap();
    let w = board.add_shortcut("W", "w.com", Some(work.id.as_str())).unwrap();

    board.update_shortcut(&x.id, "X", "x.com", Some(work.id.as_str())).unwrap();
    assert_eq!(board.tab(&work.id).unwrap().shortcuts, vec![x.id.clone(), w.id]);
    assert!(board.default_tab().unwrap().shortcuts.is_empty());
    assert_single_owner(&board);
}
