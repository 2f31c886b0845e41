use crate::{bbox::BoundingBox, object::Detection};
use nalgebra::Scalar;
use num::Float;
use std::collections::VecDeque;
use std::fmt::Debug;

/*----------------------------------------------------------------------------
TrackedObject struct
----------------------------------------------------------------------------*/

/// One tracked identity with its bounded observation history.
///
/// `bbox` and `score` are always the arithmetic mean of the respective
/// history; both histories always have the same length, between 1 and the
/// history cap.
#[derive(Clone)]
pub struct TrackedObject<T>
where
    T: Scalar + Float,
{
    label: usize,
    bbox: BoundingBox<T>,
    bbox_history: VecDeque<BoundingBox<T>>,
    score: T,
    score_history: VecDeque<T>,
    recognition_count: usize,
    missed_count: usize,
    history_cap: usize,
}

impl<T> Debug for TrackedObject<T>
where
    T: Scalar + Float,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrackedObject {{ label: {}, score: {:?}, recognition_count: {}, missed_count: {}, history_len: {}, bbox: {:?} }}",
            self.label, self.score, self.recognition_count, self.missed_count, self.bbox_history.len(), self.bbox.get_tlbr()
        )
    }
}

impl<T> TrackedObject<T>
where
    T: Scalar + Float,
{
    /// Start a track from its first detection. `history_cap` is clamped to 1.
    pub fn new(detection: &Detection<T>, history_cap: usize) -> Self {
        let history_cap = history_cap.max(1);
        let mut bbox_history = VecDeque::with_capacity(history_cap);
        let mut score_history = VecDeque::with_capacity(history_cap);
        bbox_history.push_back(detection.bbox);
        score_history.push_back(detection.score);

        Self {
            label: detection.label,
            bbox: detection.bbox,
            bbox_history,
            score: detection.score,
            score_history,
            recognition_count: 1,
            missed_count: 0,
            history_cap,
        }
    }

    pub fn get_label(&self) -> usize {
        self.label
    }

    pub fn get_bbox(&self) -> &BoundingBox<T> {
        &self.bbox
    }

    pub fn get_score(&self) -> T {
        self.score
    }

    pub fn get_recognition_count(&self) -> usize {
        self.recognition_count
    }

    pub fn get_missed_count(&self) -> usize {
        self.missed_count
    }

    pub fn bbox_history(&self) -> &VecDeque<BoundingBox<T>> {
        &self.bbox_history
    }

    pub fn score_history(&self) -> &VecDeque<T> {
        &self.score_history
    }

    /// Same label and smoothed box within `threshold` on every coordinate.
    pub fn matches(&self, detection: &Detection<T>, threshold: T) -> bool {
        self.label == detection.label && self.bbox.is_within(&detection.bbox, threshold)
    }

    /// Record one matched frame. Callers apply at most one detection per
    /// track per frame.
    pub(crate) fn update(&mut self, detection: &Detection<T>) {
        self.bbox_history.push_back(detection.bbox);
        self.score_history.push_back(detection.score);
        while self.bbox_history.len() > self.history_cap {
            self.bbox_history.pop_front();
            self.score_history.pop_front();
        }
        self.recompute_means();

        self.recognition_count += 1;
        self.missed_count = 0;
    }

    pub(crate) fn mark_missed(&mut self) {
        self.missed_count += 1;
    }

    fn recompute_means(&mut self) {
        if let Some(bbox) = BoundingBox::mean(&self.bbox_history) {
            self.bbox = bbox;
        }
        // histories are never empty here
        let (sum, count) = self
            .score_history
            .iter()
            .fold((T::zero(), T::zero()), |(s, c), &v| (s + v, c + T::one()));
        self.score = sum / count;
    }
}
