use crate::bbox::BoundingBox;
use nalgebra::Scalar;
use num::Float;

/*------------------------------------------------------------------------------
Detection struct
------------------------------------------------------------------------------*/

/// One raw, single-frame detection reported by the upstream model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection<T>
where
    T: Scalar + Float,
{
    pub bbox: BoundingBox<T>,
    pub label: usize,
    pub score: T,
}

impl<T> Detection<T>
where
    T: Scalar + Float,
{
    pub fn new(bbox: BoundingBox<T>, label: usize, score: T) -> Self {
        Self { bbox, label, score }
    }

    pub fn get_bbox(&self) -> &BoundingBox<T> {
        &self.bbox
    }

    pub fn get_label(&self) -> usize {
        self.label
    }

    pub fn get_score(&self) -> T {
        self.score
    }
}
