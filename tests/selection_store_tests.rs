use audio_device_cycler::selection::{SelectionSet, available_devices};
use std::sync::{Arc, Mutex};

mod test_utils;
use test_utils::{CyclerFixture, scenarios};

#[cfg(test)]
mod selection_persistence {
    use super::*;

    #[test]
    fn test_select_then_restart_keeps_selection() {
        let fixture = CyclerFixture::new(&["A", "B"], &[]);

        fixture.cycler.selection().set_selected("B", true).unwrap();
        fixture.cycler.selection().set_selected("A", true).unwrap();

        let restarted = fixture.restart();
        assert_eq!(restarted.selection().list(), vec!["B", "A"]);
        assert_eq!(
            fixture.persisted_config().devices.selected_devices,
            "B;;;A"
        );
    }

    #[test]
    fn test_round_trip_keeps_order() {
        let fixture = CyclerFixture::new(&[], &["A", "B", "C"]);
        assert_eq!(fixture.restart().selection().list(), vec!["A", "B", "C"]);

        let empty = CyclerFixture::new(&[], &[]);
        assert!(empty.restart().selection().list().is_empty());
    }

    #[test]
    fn test_selecting_twice_is_idempotent() {
        let fixture = CyclerFixture::new(&["A"], &[]);
        let store = fixture.cycler.selection();

        assert!(store.set_selected("A", true).unwrap());
        let writes = fixture.write_count();
        assert!(!store.set_selected("A", true).unwrap());

        assert_eq!(store.list(), vec!["A"]);
        assert_eq!(fixture.write_count(), writes);
    }

    #[test]
    fn test_deselect_removes_and_persists() {
        let fixture = CyclerFixture::new(&["A", "B"], &["A", "B"]);

        assert!(fixture.cycler.selection().set_selected("A", false).unwrap());

        assert_eq!(fixture.restart().selection().list(), vec!["B"]);
    }

    #[test]
    fn test_deselecting_unknown_name_changes_nothing() {
        let fixture = CyclerFixture::new(&["A"], &["A"]);
        let writes = fixture.write_count();

        assert!(!fixture.cycler.selection().set_selected("Z", false).unwrap());

        assert_eq!(fixture.write_count(), writes);
        assert_eq!(fixture.cycler.selection().list(), vec!["A"]);
    }

    #[test]
    fn test_special_character_names_survive_restart() {
        let names = scenarios::special_character_names();
        let fixture = CyclerFixture::new(&names, &[]);

        for name in &names {
            fixture.cycler.selection().set_selected(name, true).unwrap();
        }

        assert_eq!(fixture.restart().selection().list(), names);
    }

    #[test]
    fn test_selection_change_keeps_last_active() {
        let fixture = CyclerFixture::new(&["A", "B"], &["A"]);
        fixture
            .cycler
            .settings()
            .set_last_active_device("A")
            .unwrap();

        fixture.cycler.selection().set_selected("B", true).unwrap();

        assert_eq!(
            fixture.persisted_config().devices.last_active_device.as_deref(),
            Some("A")
        );
    }
}

/// Names the persisted form cannot hold, and callers racing on one store
#[cfg(test)]
mod selection_integrity {
    use super::*;

    #[test]
    fn test_unstorable_names_are_rejected() {
        let fixture = CyclerFixture::new(&["A"], &["A"]);
        let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        fixture
            .cycler
            .selection()
            .subscribe(move |names: &[String]| sink.lock().unwrap().push(names.to_vec()));
        let writes = fixture.write_count();

        let store = fixture.cycler.selection();
        assert!(store.set_selected("", true).is_err());
        assert!(store.set_selected("X;;;Y", true).is_err());

        assert_eq!(store.list(), vec!["A"]);
        assert!(!store.contains("X;;;Y"));
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(fixture.write_count(), writes);
        assert_eq!(fixture.restart().selection().list(), vec!["A"]);
    }

    #[test]
    fn test_threads_selecting_at_once_keep_every_name() {
        for _ in 0..50 {
            let fixture = CyclerFixture::new(&[], &[]);
            let store = fixture.selection_store();

            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let store = Arc::clone(&store);
                    std::thread::spawn(move || store.set_selected(&format!("D{i}"), true).unwrap())
                })
                .collect();
            for handle in handles {
                assert!(handle.join().unwrap());
            }

            assert_eq!(store.list().len(), 8);
            let persisted = fixture.persisted_config().selection();
            assert_eq!(persisted.len(), 8);
        }
    }
}

#[cfg(test)]
mod selection_observers {
    use super::*;

    #[test]
    fn test_observers_receive_full_list_in_order() {
        let fixture = CyclerFixture::new(&["A", "B"], &[]);
        let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        fixture
            .cycler
            .selection()
            .subscribe(move |names: &[String]| sink.lock().unwrap().push(names.to_vec()));

        let store = fixture.cycler.selection();
        store.set_selected("A", true).unwrap();
        store.set_selected("A", true).unwrap();
        store.set_selected("B", true).unwrap();
        store.set_selected("A", false).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                vec!["A".to_string()],
                vec!["A".to_string(), "B".to_string()],
                vec!["B".to_string()],
            ]
        );
    }

    #[test]
    fn test_every_observer_is_notified() {
        let fixture = CyclerFixture::new(&["A"], &[]);
        let calls = Arc::new(Mutex::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            fixture
                .cycler
                .selection()
                .subscribe(move |_: &[String]| *calls.lock().unwrap() += 1);
        }

        fixture.cycler.selection().set_selected("A", true).unwrap();

        assert_eq!(*calls.lock().unwrap(), 2);
    }
}

#[cfg(test)]
mod available_view {
    use super::*;
    use audio_device_cycler::MockAudioSystem;

    #[test]
    fn test_view_follows_backend_order() {
        let audio = MockAudioSystem::new();
        for device in scenarios::typical_output_devices() {
            audio.add_device(device);
        }
        let selection = SelectionSet::parse("Audioengine 2+;;;AirPods Pro");

        let names: Vec<String> = available_devices(&audio, &selection)
            .unwrap()
            .into_iter()
            .map(|device| device.name)
            .collect();

        assert_eq!(names, vec!["AirPods Pro", "Audioengine 2+"]);
    }

    #[test]
    fn test_view_keeps_default_flag() {
        let audio = MockAudioSystem::new();
        for device in scenarios::typical_output_devices() {
            audio.add_device(device);
        }
        let selection = SelectionSet::parse("MacBook Pro Speakers");

        let view = available_devices(&audio, &selection).unwrap();

        assert_eq!(view.len(), 1);
        assert!(view[0].is_default);
    }

    #[test]
    fn test_view_propagates_enumeration_failure() {
        let audio = MockAudioSystem::with_devices(&["A"]);
        audio.set_enumeration_failure(true);

        assert!(available_devices(&audio, &SelectionSet::parse("A")).is_err());
    }
}
