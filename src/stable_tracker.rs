use crate::{
    bbox::BoundingBox,
    clock::{Clock, MonotonicClock},
    config::TrackerConfig,
    error::TrackError,
    frame::FrameData,
    object::Detection,
    tracked_object::TrackedObject,
};
use log::{debug, trace};
use nalgebra::Scalar;
use num::{Float, NumCast};
use std::collections::{BTreeMap, HashSet};

/*-----------------------------------------------------------------------------
TrackSnapshot
-----------------------------------------------------------------------------*/

/// Read-only copy of a track's smoothed state.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSnapshot<T>
where
    T: Scalar + Float,
{
    pub track_id: usize,
    pub label: usize,
    pub bbox: BoundingBox<T>,
    pub score: T,
    pub recognition_count: usize,
    pub missed_count: usize,
}

impl<T> TrackSnapshot<T>
where
    T: Scalar + Float,
{
    fn new(track_id: usize, track: &TrackedObject<T>) -> Self {
        Self {
            track_id,
            label: track.get_label(),
            bbox: *track.get_bbox(),
            score: track.get_score(),
            recognition_count: track.get_recognition_count(),
            missed_count: track.get_missed_count(),
        }
    }
}

#[derive(Debug, Clone)]
struct ConfidentCache<T>
where
    T: Scalar + Float,
{
    computed_at: u64,
    result: Option<TrackSnapshot<T>>,
}

impl<T> ConfidentCache<T>
where
    T: Scalar + Float,
{
    /// A clock reading earlier than `computed_at` makes the entry stale.
    fn is_fresh(&self, now: u64, interval: u64) -> bool {
        match now.checked_sub(self.computed_at) {
            Some(age) => age < interval,
            None => false,
        }
    }
}

fn cast_config<T>(name: &str, value: f32) -> Result<T, TrackError>
where
    T: Scalar + Float,
{
    <T as NumCast>::from(value).ok_or_else(|| {
        TrackError::InvalidConfig(format!("{} is not representable: {}", name, value))
    })
}

/*-----------------------------------------------------------------------------
StableTracker
-----------------------------------------------------------------------------*/

/// Smooths per-frame detections into a small table of stable tracks and
/// reports the most confident one.
///
/// Tracks live in an ordered map keyed by an engine-local id. Ids grow
/// monotonically and are never reused, so map order is creation order; the
/// association below takes the first matching track in that order.
///
/// # Example
/// ```
/// use steadytrack_rs::{StableTracker, TrackerConfig};
///
/// let config = TrackerConfig::new(480.0, 480.0).with_recognition_count(2);
/// let mut tracker = StableTracker::new(config).unwrap();
///
/// let boxes = [0.2f32, 0.2, 0.6, 0.6];
/// tracker.ingest_frame(&boxes, &[1], &[0.8]).unwrap();
/// assert!(tracker.get_confident_object().is_none());
///
/// tracker.ingest_frame(&boxes, &[1], &[0.9]).unwrap();
/// let best = tracker.get_confident_object().unwrap();
/// assert_eq!(best.label, 1);
/// assert_eq!(best.recognition_count, 2);
/// ```
#[derive(Debug)]
pub struct StableTracker<T = f32, C = MonotonicClock>
where
    T: Scalar + Float,
    C: Clock,
{
    config: TrackerConfig,
    aspect_ratio: T,
    score_threshold: T,
    proximity_threshold: T,

    frame_count: usize,
    next_id: usize,

    tracking_objects: BTreeMap<usize, TrackedObject<T>>,
    cache: Option<ConfidentCache<T>>,
    clock: C,
}

impl<T> StableTracker<T, MonotonicClock>
where
    T: Scalar + Float,
{
    pub fn new(config: TrackerConfig) -> Result<Self, TrackError> {
        Self::with_clock(config, MonotonicClock::new())
    }
}

impl<T, C> StableTracker<T, C>
where
    T: Scalar + Float,
    C: Clock,
{
    /// Create a tracker reading cache ages from `clock`.
    pub fn with_clock(config: TrackerConfig, clock: C) -> Result<Self, TrackError> {
        config.validate()?;
        let aspect_ratio = cast_config("aspect ratio", config.aspect_ratio())?;
        let score_threshold = cast_config("score_threshold", config.score_threshold)?;
        let proximity_threshold = cast_config("proximity_threshold", config.proximity_threshold)?;
        Ok(Self {
            config,
            aspect_ratio,
            score_threshold,
            proximity_threshold,
            frame_count: 0,
            next_id: 0,
            tracking_objects: BTreeMap::new(),
            cache: None,
            clock,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Frames ingested since construction or the last reset.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn track_count(&self) -> usize {
        self.tracking_objects.len()
    }

    pub fn get_track(&self, track_id: usize) -> Option<&TrackedObject<T>> {
        self.tracking_objects.get(&track_id)
    }

    /// Snapshots of every live track, in id order.
    pub fn tracked_objects(&self) -> Vec<TrackSnapshot<T>> {
        self.tracking_objects
            .iter()
            .map(|(id, t)| TrackSnapshot::new(*id, t))
            .collect()
    }

    /// Ingest one frame of flat detector output.
    ///
    /// # Arguments
    /// * `boxes` - `4 * N` coordinates, `[left, top, right, bottom]` per detection
    /// * `labels` - `N` class labels, indexed by detection
    /// * `scores` - `N` raw confidence scores, indexed by detection
    ///
    /// Misaligned buffers are rejected before any state changes.
    pub fn ingest_frame(
        &mut self,
        boxes: &[T],
        labels: &[usize],
        scores: &[T],
    ) -> Result<(), TrackError> {
        let frame = FrameData::new(boxes, labels, scores)?;
        let detections = frame.to_detections();
        self.update(&detections);
        Ok(())
    }

    /// Ingest one frame of detections with device-relative boxes.
    ///
    /// Each track absorbs at most one detection per frame. Later detections
    /// close to an already updated track start a track of their own.
    pub fn update(&mut self, detections: &[Detection<T>]) {
        self.frame_count += 1;

        let mut seen = HashSet::with_capacity(detections.len());
        for raw in detections {
            if raw.score.is_nan() || raw.score < self.score_threshold {
                trace!("Detection dropped below score threshold: {:?}", raw);
                continue;
            }
            let detection = Detection::new(
                raw.bbox.remap_vertical(self.aspect_ratio),
                raw.label,
                raw.score,
            );

            let track_id = match self.find_match(&detection, &seen) {
                Some(track_id) => {
                    if let Some(track) = self.tracking_objects.get_mut(&track_id) {
                        let delta = track.get_bbox().max_delta(&detection.bbox);
                        track.update(&detection);
                        trace!("Track {} matched (delta {:?}): {:?}", track_id, delta, track);
                    }
                    track_id
                }
                None => self.create_track(&detection),
            };
            seen.insert(track_id);
        }

        self.decay_unseen(&seen);
        self.cache = None;
    }

    /// Most confident eligible track, reusing the previous answer while it
    /// is younger than the configured check interval and nothing has been
    /// ingested since.
    pub fn get_confident_object(&mut self) -> Option<TrackSnapshot<T>> {
        let now = self.clock.now_millis();
        if let Some(cache) = &self.cache {
            if cache.is_fresh(now, self.config.check_interval) {
                trace!("Confident object served from cache");
                return cache.result.clone();
            }
        }

        let result = self.peek_confident_object();
        self.cache = Some(ConfidentCache {
            computed_at: now,
            result: result.clone(),
        });
        result
    }

    /// Recompute the confident object without touching the cache.
    ///
    /// Among tracks recognized at least `recognition_count` times, picks the
    /// highest smoothed score, then the higher recognition count. Exact ties
    /// keep the earliest track.
    pub fn peek_confident_object(&self) -> Option<TrackSnapshot<T>> {
        let min_count = self.config.recognition_count;
        let mut best: Option<(usize, &TrackedObject<T>)> = None;

        for (id, track) in self
            .tracking_objects
            .iter()
            .filter(|(_, t)| t.get_recognition_count() >= min_count)
        {
            let better = match best {
                None => true,
                Some((_, b)) => {
                    track.get_score() > b.get_score()
                        || (track.get_score() == b.get_score()
                            && track.get_recognition_count() > b.get_recognition_count())
                }
            };
            if better {
                best = Some((*id, track));
            }
        }

        best.map(|(id, t)| TrackSnapshot::new(id, t))
    }

    /// Drop every track and the cached result. Track ids keep counting up,
    /// so ids issued after a reset never collide with earlier ones.
    pub fn reset(&mut self) {
        debug!(
            "Tracker reset, dropping {} tracks",
            self.tracking_objects.len()
        );
        self.tracking_objects.clear();
        self.cache = None;
        self.frame_count = 0;
    }

    /// First track in id order that matches and has not already absorbed a
    /// detection this frame.
    fn find_match(&self, detection: &Detection<T>, seen: &HashSet<usize>) -> Option<usize> {
        self.tracking_objects
            .iter()
            .filter(|(id, _)| !seen.contains(*id))
            .find(|(_, t)| t.matches(detection, self.proximity_threshold))
            .map(|(id, _)| *id)
    }

    fn create_track(&mut self, detection: &Detection<T>) -> usize {
        let track_id = self.next_id;
        self.next_id += 1;

        let track = TrackedObject::new(detection, self.config.history_cap);
        debug!("Track {} created: {:?}", track_id, track);
        self.tracking_objects.insert(track_id, track);
        track_id
    }

    fn decay_unseen(&mut self, seen: &HashSet<usize>) {
        let max_missed = self.config.max_missed;
        self.tracking_objects.retain(|id, track| {
            if seen.contains(id) {
                return true;
            }
            track.mark_missed();
            if track.get_missed_count() >= max_missed {
                debug!("Track {} evicted after {} missed frames", id, max_missed);
                return false;
            }
            true
        });
    }
}
