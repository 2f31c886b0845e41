use crate::{bbox::BoundingBox, error::TrackError, object::Detection};
use nalgebra::Scalar;
use num::Float;

/*------------------------------------------------------------------------------
FrameData struct
------------------------------------------------------------------------------*/

/// Borrowed view over one frame of flat detector output.
///
/// The three buffers are index-aligned: detection `i` owns
/// `boxes[4 * i..4 * i + 4]` (left, top, right, bottom), `labels[i]` and
/// `scores[i]`. Construction fails unless the lengths are exactly
/// `4 * N`, `N` and `N`.
#[derive(Debug, Clone, Copy)]
pub struct FrameData<'a, T>
where
    T: Scalar + Float,
{
    boxes: &'a [T],
    labels: &'a [usize],
    scores: &'a [T],
}

impl<'a, T> FrameData<'a, T>
where
    T: Scalar + Float,
{
    pub fn new(
        boxes: &'a [T],
        labels: &'a [usize],
        scores: &'a [T],
    ) -> Result<Self, TrackError> {
        let n = scores.len();
        if labels.len() != n || boxes.len() != 4 * n {
            return Err(TrackError::MisalignedFrame {
                boxes: boxes.len(),
                labels: labels.len(),
                scores: scores.len(),
            });
        }
        Ok(Self {
            boxes,
            labels,
            scores,
        })
    }

    pub fn detections(&self) -> impl Iterator<Item = Detection<T>> + 'a {
        let (boxes, labels, scores) = (self.boxes, self.labels, self.scores);
        boxes
            .chunks_exact(4)
            .enumerate()
            .map(move |(i, c)| {
                Detection::new(
                    BoundingBox::from_ltrb(c[0], c[1], c[2], c[3]),
                    labels[i],
                    scores[i],
                )
            })
    }

    pub fn to_detections(&self) -> Vec<Detection<T>> {
        self.detections().collect()
    }
}
