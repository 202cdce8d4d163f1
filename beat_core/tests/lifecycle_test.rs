use beat_core::gameplay::judge::JudgmentZone;
use beat_core::gameplay::lifecycle::{Advance, NoteCounts, NoteState, NoteTracker, Resolution};
use beat_data::{Lane, Note, NoteKind, Tier};

fn note(time: f64, lane: Lane) -> Note {
    Note { time, lane, kind: NoteKind::Single }
}

fn time_tracker(notes: Vec<Note>) -> NoteTracker {
    NoteTracker::new(notes, 3.0, 0.18, JudgmentZone::time())
}

#[test]
fn test_notes_spawn_inside_lead_time() {
    let mut tracker = time_tracker(vec![
        note(1.0, Lane::Left),
        note(2.0, Lane::Down),
        note(3.0, Lane::Up),
        note(10.0, Lane::Right),
    ]);

    let first = tracker.advance(0.0);
    assert_eq!(first.spawned, vec![0, 1, 2]);
    assert!(first.expired.is_empty());
    assert_eq!(tracker.get(3).unwrap().state, NoteState::Pending);

    let idle = tracker.advance(0.5);
    assert!(idle.spawned.is_empty());

    let later = tracker.advance(7.0);
    assert_eq!(later.spawned, vec![3]);
}

#[test]
fn test_unsorted_input_is_ordered_by_time() {
    let tracker = time_tracker(vec![
        note(5.0, Lane::Left),
        note(1.0, Lane::Right),
        note(3.0, Lane::Up),
    ]);
    let times: Vec<f64> = tracker.notes().iter().map(|t| t.note.time).collect();
    assert_eq!(times, vec![1.0, 3.0, 5.0]);
    assert!(tracker.notes().iter().enumerate().all(|(i, t)| t.id == i));
}

#[test]
fn test_expiry_after_tolerance() {
    let mut tracker = time_tracker(vec![note(1.0, Lane::Left)]);
    tracker.advance(0.0);

    let inside = tracker.advance(1.15);
    assert!(inside.expired.is_empty());
    assert_eq!(tracker.get(0).unwrap().state, NoteState::Active);

    let past = tracker.advance(1.2);
    assert_eq!(past.expired, vec![0]);
    assert_eq!(tracker.get(0).unwrap().state, NoteState::Resolved(Resolution::Missed));
    assert!(tracker.is_exhausted());
}

#[test]
fn test_position_domain_expiry_uses_distance() {
    // 500 units per second: 0.1s late is 50 units, 0.3s late is 150.
    let zone = JudgmentZone::position(2.5, 200.0);
    let mut tracker = NoteTracker::new(vec![note(1.0, Lane::Down)], 3.0, 100.0, zone);
    tracker.advance(0.0);

    assert!(tracker.advance(1.1).expired.is_empty());
    assert_eq!(tracker.advance(1.3).expired, vec![0]);
}

#[test]
fn test_frame_drop_spawns_and_expires_in_one_call() {
    let notes = (1..=5).map(|i| note(i as f64, Lane::Up)).collect();
    let mut tracker = time_tracker(notes);

    let result = tracker.advance(100.0);
    assert_eq!(result.spawned, vec![0, 1, 2, 3, 4]);
    assert_eq!(result.expired, vec![0, 1, 2, 3, 4]);
    assert_eq!(
        tracker.counts(),
        NoteCounts {
            pending: 0,
            active: 0,
            resolved: 5
        }
    );
}

#[test]
fn test_resolve_only_once() {
    let mut tracker = time_tracker(vec![note(1.0, Lane::Left), note(9.0, Lane::Right)]);
    tracker.advance(0.0);

    assert!(tracker.resolve(0, Resolution::Hit(Tier::Perfect)));
    assert!(!tracker.resolve(0, Resolution::Missed));
    assert_eq!(tracker.get(0).unwrap().state, NoteState::Resolved(Resolution::Hit(Tier::Perfect)));

    // Still pending.
    assert!(!tracker.resolve(1, Resolution::Hit(Tier::Good)));
    // Unknown.
    assert!(!tracker.resolve(42, Resolution::Missed));
}

#[test]
fn test_hit_note_never_expires() {
    let mut tracker = time_tracker(vec![note(1.0, Lane::Left)]);
    tracker.advance(1.0);
    assert!(tracker.resolve(0, Resolution::Hit(Tier::Great)));

    let result = tracker.advance(50.0);
    assert!(result.expired.is_empty());
    assert_eq!(tracker.get(0).unwrap().state, NoteState::Resolved(Resolution::Hit(Tier::Great)));
}

#[test]
fn test_expired_note_cannot_be_hit() {
    let mut tracker = time_tracker(vec![note(1.0, Lane::Left)]);
    tracker.advance(2.0);
    assert!(!tracker.resolve(0, Resolution::Hit(Tier::Perfect)));
    assert_eq!(tracker.get(0).unwrap().state, NoteState::Resolved(Resolution::Missed));
}

#[test]
fn test_active_in_lane_filters_by_lane() {
    let mut tracker = time_tracker(vec![
        note(1.0, Lane::Left),
        note(1.0, Lane::Right),
        note(1.5, Lane::Left),
    ]);
    tracker.advance(0.0);

    let left: Vec<usize> = tracker.active_in_lane(Lane::Left).map(|t| t.id).collect();
    assert_eq!(left.len(), 2);
    assert!(left.iter().all(|&id| tracker.get(id).unwrap().note.lane == Lane::Left));
    assert_eq!(tracker.active_in_lane(Lane::Up).count(), 0);
}

#[test]
fn test_render_feed_reports_active_notes() {
    let zone = JudgmentZone::position(1.0, 100.0);
    let notes = vec![note(2.0, Lane::Up), note(8.0, Lane::Down)];
    let mut tracker = NoteTracker::new(notes, 3.0, 100.0, zone);
    tracker.advance(0.0);

    let feed = tracker.render_feed(1.0);
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].id, 0);
    assert_eq!(feed[0].lane, Lane::Up);
    assert_eq!(feed[0].time_to_hit, 1.0);
    assert_eq!(feed[0].distance, 100.0);
}

#[test]
fn test_counts_and_clear() {
    let mut tracker = time_tracker(vec![
        note(1.0, Lane::Left),
        note(2.0, Lane::Left),
        note(9.0, Lane::Left),
    ]);
    tracker.advance(1.0);
    tracker.resolve(0, Resolution::Hit(Tier::Perfect));

    assert_eq!(
        tracker.counts(),
        NoteCounts {
            pending: 1,
            active: 1,
            resolved: 1
        }
    );
    assert!(!tracker.is_exhausted());

    tracker.clear();
    assert!(tracker.is_empty());
    assert!(tracker.is_exhausted());
    assert!(tracker.advance(10.0).spawned.is_empty());
}

#[test]
fn test_empty_tracker_is_exhausted() {
    let mut tracker = NoteTracker::empty(JudgmentZone::time());
    assert!(tracker.is_exhausted());
    assert_eq!(tracker.advance(5.0), Advance::default());
}
