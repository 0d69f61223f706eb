// Integration tests for state management and change broadcasting

use camino::Utf8PathBuf;
use hashpilot::{StateChange, StateManager, StatusUpdate};

#[test]
fn form_edits_broadcast_configuration_changes() {
    let manager = StateManager::new();
    let mut rx = manager.subscribe();

    manager.set_hash_file_path(Some(Utf8PathBuf::from("/tmp/hashes.txt")));

    let change = rx.try_recv().unwrap();
    assert!(matches!(
        change,
        StateChange::ConfigurationChanged { is_ready: true }
    ));

    // Setting the same path again is not a change
    manager.set_hash_file_path(Some(Utf8PathBuf::from("/tmp/hashes.txt")));
    assert!(rx.try_recv().is_err());
}

#[test]
fn clearing_hash_file_makes_configuration_not_ready() {
    let manager = StateManager::new();
    manager.set_hash_file_path(Some(Utf8PathBuf::from("/tmp/hashes.txt")));

    let mut rx = manager.subscribe();
    manager.set_hash_file_path(None);

    assert!(matches!(
        rx.try_recv().unwrap(),
        StateChange::ConfigurationChanged { is_ready: false }
    ));
}

#[test]
fn session_lifecycle_events() {
    let manager = StateManager::new();
    let mut rx = manager.subscribe();

    manager.begin_session();
    assert!(matches!(rx.try_recv().unwrap(), StateChange::CrackStarted));
    assert!(manager.read(|s| s.is_running));

    manager.end_session(Some(1));
    assert!(matches!(
        rx.try_recv().unwrap(),
        StateChange::CrackFinished { exit_code: Some(1) }
    ));
    assert!(!manager.read(|s| s.is_running));
    assert_eq!(manager.read(|s| s.last_exit_code), Some(1));
}

#[test]
fn status_updates_touch_only_the_changed_field() {
    let manager = StateManager::new();
    let mut rx = manager.subscribe();

    manager.apply_status_update(&StatusUpdate::Phase("Running".to_string()));
    match rx.try_recv().unwrap() {
        StateChange::StatusUpdated { phase, recovered } => {
            assert_eq!(phase, "Running");
            assert_eq!(recovered, "");
        }
        other => panic!("unexpected change: {:?}", other),
    }

    manager.apply_status_update(&StatusUpdate::Recovered("1/2 (50.00%)".to_string()));
    match rx.try_recv().unwrap() {
        StateChange::StatusUpdated { phase, recovered } => {
            assert_eq!(phase, "Running");
            assert_eq!(recovered, "1/2 (50.00%)");
        }
        other => panic!("unexpected change: {:?}", other),
    }
}

#[test]
fn record_line_does_not_broadcast() {
    let manager = StateManager::new();
    let mut rx = manager.subscribe();

    manager.record_line();
    manager.record_line();

    assert_eq!(manager.read(|s| s.lines_received), 2);
    assert!(rx.try_recv().is_err());
}

#[test]
fn reset_clears_session_fields_and_broadcasts() {
    let manager = StateManager::new();
    manager.begin_session();
    manager.apply_status_update(&StatusUpdate::Phase("Cracked".to_string()));
    manager.record_line();
    manager.end_session(Some(0));

    let mut rx = manager.subscribe();
    manager.reset_session_state();

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.lines_received, 0);
    assert_eq!(snapshot.status_phase, "");
    assert_eq!(snapshot.last_exit_code, None);

    let changes: Vec<StateChange> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert!(changes.iter().any(|c| matches!(c, StateChange::StateReset)));
}

#[test]
fn settings_updates_broadcast_settings_changed() {
    let manager = StateManager::new();
    let mut rx = manager.subscribe();

    manager.update_settings(|state| {
        state.hashcat_exe = "/opt/hashcat/hashcat.bin".to_string();
    });

    assert!(matches!(
        rx.try_recv().unwrap(),
        StateChange::SettingsChanged
    ));
    assert_eq!(
        manager.read(|s| s.hashcat_exe.clone()),
        "/opt/hashcat/hashcat.bin"
    );
}

#[test]
fn snapshot_is_independent_of_later_mutation() {
    let manager = StateManager::new();
    manager.set_mask("?l?l".to_string());

    let snapshot = manager.snapshot();
    manager.set_mask("?d?d?d".to_string());

    assert_eq!(snapshot.mask, "?l?l");
    assert_eq!(manager.read(|s| s.mask.clone()), "?d?d?d");
}
