/*-----------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------------*/
use crate::bbox::BoundingBox;
use crate::clock::ManualClock;
use crate::config::TrackerConfig;
use crate::object::Detection;
use crate::stable_tracker::StableTracker;
use nearly_eq::assert_nearly_eq;

fn square_config() -> TrackerConfig {
    TrackerConfig::new(256.0, 256.0)
        .with_recognition_count(1)
        .with_score_threshold(0.0)
}

fn det(top: f32, left: f32, bottom: f32, right: f32, label: usize, score: f32) -> Detection<f32> {
    Detection::new(BoundingBox::new(top, left, bottom, right), label, score)
}

#[test]
fn test_confident_object_idempotent_within_window() {
    let clock = ManualClock::new(1_000);
    let handle = clock.clone();
    let mut tracker =
        StableTracker::with_clock(square_config().with_check_interval(50), clock).unwrap();
    tracker.update(&[det(0.25, 0.25, 0.5, 0.5, 3, 0.625)]);

    let first = tracker.get_confident_object();
    handle.advance(10);
    let second = tracker.get_confident_object();

    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_recognition_count_is_monotonic() {
    let mut tracker = StableTracker::new(square_config()).unwrap();
    let mut last = 0;
    for i in 0..40 {
        if i % 3 == 2 {
            tracker.update(&[]);
        } else {
            tracker.update(&[det(0.25, 0.25, 0.5, 0.5, 0, 0.5)]);
        }
        let count = tracker.get_track(0).unwrap().get_recognition_count();
        assert!(count >= last);
        last = count;
    }
    assert_eq!(last, 27);
}

#[test]
fn test_eviction_after_thirty_missed_frames() {
    let mut tracker = StableTracker::new(square_config()).unwrap();
    tracker.update(&[det(0.25, 0.25, 0.5, 0.5, 0, 0.5)]);

    for _ in 0..29 {
        tracker.update(&[]);
    }
    assert_eq!(tracker.track_count(), 1);
    assert_eq!(tracker.get_track(0).unwrap().get_missed_count(), 29);
    assert!(tracker.get_confident_object().is_some());

    tracker.update(&[]);
    assert_eq!(tracker.track_count(), 0);
    assert!(tracker.get_confident_object().is_none());

    for _ in 0..5 {
        tracker.update(&[]);
        assert!(tracker.get_confident_object().is_none());
    }
}

#[test]
fn test_match_resets_missed_count() {
    let mut tracker = StableTracker::new(square_config()).unwrap();
    tracker.update(&[det(0.25, 0.25, 0.5, 0.5, 0, 0.5)]);
    for _ in 0..20 {
        tracker.update(&[]);
    }
    tracker.update(&[det(0.25, 0.25, 0.5, 0.5, 0, 0.5)]);
    assert_eq!(tracker.get_track(0).unwrap().get_missed_count(), 0);

    for _ in 0..29 {
        tracker.update(&[]);
    }
    assert_eq!(tracker.track_count(), 1);
}

#[test]
fn test_history_bounded_to_last_fifty() {
    let mut tracker = StableTracker::new(square_config()).unwrap();
    for i in 0..60 {
        let score = i as f32 / 64.0;
        tracker.update(&[det(0.25, 0.25, 0.5, 0.5, 0, score)]);
    }

    let track = tracker.get_track(0).unwrap();
    assert_eq!(track.bbox_history().len(), 50);
    assert_eq!(track.score_history().len(), 50);
    assert_eq!(track.get_recognition_count(), 60);
    // frames 10..=59 remain
    assert_eq!(track.score_history().front(), Some(&(10.0 / 64.0)));
    assert_nearly_eq!(track.get_score(), 34.5 / 64.0, 1e-5);
}

#[test]
fn test_smoothed_box_follows_window_mean() {
    let mut tracker = StableTracker::new(square_config().with_history_cap(4)).unwrap();
    let tops = [0.25f32, 0.2578125, 0.265625, 0.2734375, 0.28125];
    for top in tops {
        tracker.update(&[det(top, 0.25, 0.5, 0.5, 0, 0.5)]);
    }

    let track = tracker.get_track(0).unwrap();
    assert_eq!(tracker.track_count(), 1);
    assert_nearly_eq!(track.get_bbox().top(), (0.2578125 + 0.265625 + 0.2734375 + 0.28125) / 4.0, 1e-6);
    assert_nearly_eq!(track.get_bbox().left(), 0.25, 1e-6);
}

#[test]
fn test_aspect_ratio_correction() {
    let config = TrackerConfig::new(100.0, 200.0)
        .with_recognition_count(1)
        .with_score_threshold(0.0);
    let mut tracker = StableTracker::<f32>::new(config).unwrap();
    // left, top, right, bottom
    tracker
        .ingest_frame(&[0.1, 0.4, 0.3, 0.6], &[5], &[0.75])
        .unwrap();

    let snapshot = &tracker.tracked_objects()[0];
    assert_nearly_eq!(snapshot.bbox.top(), 0.3, 1e-6);
    assert_nearly_eq!(snapshot.bbox.bottom(), 0.7, 1e-6);
    assert_nearly_eq!(snapshot.bbox.left(), 0.1, 1e-6);
    assert_nearly_eq!(snapshot.bbox.right(), 0.3, 1e-6);
}

#[test]
fn test_matching_threshold_is_inclusive() {
    let config = square_config().with_proximity_threshold(0.0625);
    let mut tracker = StableTracker::new(config).unwrap();
    tracker.update(&[det(0.25, 0.25, 0.75, 0.75, 0, 0.5)]);

    // exactly at the threshold on all four coordinates
    tracker.update(&[det(0.3125, 0.1875, 0.8125, 0.6875, 0, 0.5)]);
    assert_eq!(tracker.track_count(), 1);
    assert_eq!(tracker.get_track(0).unwrap().get_recognition_count(), 2);
}

#[test]
fn test_matching_beyond_threshold_creates_track() {
    let config = square_config().with_proximity_threshold(0.0625);
    let mut tracker = StableTracker::new(config).unwrap();
    tracker.update(&[det(0.25, 0.25, 0.75, 0.75, 0, 0.5)]);

    // only `right` is beyond the threshold
    tracker.update(&[det(0.25, 0.25, 0.75, 0.828125, 0, 0.5)]);
    assert_eq!(tracker.track_count(), 2);
    assert_eq!(tracker.get_track(0).unwrap().get_missed_count(), 1);
    assert_eq!(tracker.get_track(1).unwrap().get_recognition_count(), 1);
}

#[test]
fn test_tie_break_prefers_recognition_count() {
    let mut tracker = StableTracker::new(square_config()).unwrap();
    tracker.update(&[
        det(0.125, 0.125, 0.25, 0.25, 0, 0.5),
        det(0.5, 0.5, 0.75, 0.75, 1, 0.5),
    ]);
    tracker.update(&[det(0.5, 0.5, 0.75, 0.75, 1, 0.5)]);

    let best = tracker.get_confident_object().unwrap();
    assert_eq!(best.track_id, 1);
    assert_eq!(best.recognition_count, 2);
    assert_eq!(best.score, 0.5);
}

#[test]
fn test_exact_tie_keeps_earliest_track() {
    let mut tracker = StableTracker::new(square_config()).unwrap();
    tracker.update(&[
        det(0.125, 0.125, 0.25, 0.25, 0, 0.5),
        det(0.5, 0.5, 0.75, 0.75, 1, 0.5),
    ]);

    assert_eq!(tracker.get_confident_object().unwrap().track_id, 0);
}

#[test]
fn test_reset_issues_fresh_identities() {
    let mut tracker = StableTracker::new(square_config()).unwrap();
    tracker.update(&[det(0.25, 0.25, 0.5, 0.5, 0, 0.5)]);
    tracker.update(&[det(0.5, 0.5, 0.75, 0.75, 0, 0.5)]);
    let issued: Vec<usize> = tracker.tracked_objects().iter().map(|s| s.track_id).collect();
    assert_eq!(issued, vec![0, 1]);

    tracker.reset();
    assert!(tracker.get_confident_object().is_none());

    tracker.update(&[det(0.25, 0.25, 0.5, 0.5, 0, 0.5)]);
    let fresh = tracker.tracked_objects()[0].track_id;
    assert!(!issued.contains(&fresh));
}

#[test]
fn test_misaligned_frame_leaves_state_untouched() {
    let mut tracker = StableTracker::<f32>::new(square_config()).unwrap();
    tracker
        .ingest_frame(&[0.25, 0.25, 0.5, 0.5], &[0], &[0.5])
        .unwrap();

    assert!(tracker
        .ingest_frame(&[0.25, 0.25, 0.5, 0.5], &[0, 1], &[0.5])
        .is_err());
    assert!(tracker
        .ingest_frame(&[0.25, 0.25, 0.5], &[0], &[0.5])
        .is_err());

    assert_eq!(tracker.frame_count(), 1);
    assert_eq!(tracker.get_track(0).unwrap().get_missed_count(), 0);
}

#[test]
fn test_double_precision_tracker() {
    let config = TrackerConfig::new(100.0, 200.0)
        .with_recognition_count(2)
        .with_score_threshold(0.0);
    let mut tracker = StableTracker::<f64>::new(config).unwrap();
    let boxes = [0.1f64, 0.4, 0.3, 0.6];
    tracker.ingest_frame(&boxes, &[5], &[0.5]).unwrap();
    tracker.ingest_frame(&boxes, &[5], &[1.0]).unwrap();

    let best = tracker.get_confident_object().unwrap();
    assert_eq!(best.recognition_count, 2);
    assert_nearly_eq!(best.score, 0.75, 1e-12);
    assert_nearly_eq!(best.bbox.top(), 0.3, 1e-12);
}
