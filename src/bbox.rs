use nalgebra::{Matrix1x4, Scalar};
use num::Float;

/* ------------------------------------------------------------------------------
 * Type aliases
 * ------------------------------------------------------------------------------ */
pub type Tlbr<T> = Matrix1x4<T>;

/* ------------------------------------------------------------------------------
 * BoundingBox struct
 * ------------------------------------------------------------------------------ */

/// Axis-aligned box in normalized, device-relative coordinates.
///
/// No ordering is assumed between `top` and `bottom` (or `left` and `right`);
/// every operation here is componentwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox<T>
where
    T: Scalar + Float,
{
    tlbr: Tlbr<T>,
}

impl<T> BoundingBox<T>
where
    T: Scalar + Float,
{
    pub fn new(top: T, left: T, bottom: T, right: T) -> Self {
        Self {
            tlbr: Matrix1x4::new(top, left, bottom, right),
        }
    }

    /// Create a box from the `[left, top, right, bottom]` order used by
    /// detector output buffers.
    pub fn from_ltrb(left: T, top: T, right: T, bottom: T) -> Self {
        Self::new(top, left, bottom, right)
    }

    #[inline(always)]
    pub fn top(&self) -> T {
        self.tlbr[(0, 0)]
    }

    #[inline(always)]
    pub fn set_top(&mut self, top: T) {
        self.tlbr[(0, 0)] = top;
    }

    #[inline(always)]
    pub fn left(&self) -> T {
        self.tlbr[(0, 1)]
    }

    #[inline(always)]
    pub fn set_left(&mut self, left: T) {
        self.tlbr[(0, 1)] = left;
    }

    #[inline(always)]
    pub fn bottom(&self) -> T {
        self.tlbr[(0, 2)]
    }

    #[inline(always)]
    pub fn set_bottom(&mut self, bottom: T) {
        self.tlbr[(0, 2)] = bottom;
    }

    #[inline(always)]
    pub fn right(&self) -> T {
        self.tlbr[(0, 3)]
    }

    #[inline(always)]
    pub fn set_right(&mut self, right: T) {
        self.tlbr[(0, 3)] = right;
    }

    /// Get bounding box as [top, left, bottom, right]
    pub fn get_tlbr(&self) -> [T; 4] {
        [self.top(), self.left(), self.bottom(), self.right()]
    }

    /// Get bounding box as [left, top, right, bottom]
    pub fn get_ltrb(&self) -> [T; 4] {
        [self.left(), self.top(), self.right(), self.bottom()]
    }

    /// Largest absolute per-coordinate difference between two boxes.
    pub fn max_delta(&self, other: &BoundingBox<T>) -> T {
        (0..4)
            .map(|i| (self.tlbr[(0, i)] - other.tlbr[(0, i)]).abs())
            .fold(T::zero(), |acc, d| acc.max(d))
    }

    /// True when every one of the four coordinates differs by at most
    /// `threshold`. The bound is inclusive.
    pub fn is_within(&self, other: &BoundingBox<T>, threshold: T) -> bool {
        (0..4).all(|i| (self.tlbr[(0, i)] - other.tlbr[(0, i)]).abs() <= threshold)
    }

    /// Map the vertical coordinates from device-relative space into a space
    /// normalized for a non-square sensor:
    /// `y' = 0.5 - (0.5 - y) * aspect` where `aspect = width / height`.
    /// `left` and `right` are unchanged.
    pub fn remap_vertical(&self, aspect: T) -> Self {
        let half = T::one() / (T::one() + T::one());
        Self::new(
            half - (half - self.top()) * aspect,
            self.left(),
            half - (half - self.bottom()) * aspect,
            self.right(),
        )
    }

    /// Componentwise arithmetic mean. Returns `None` for an empty sequence.
    pub fn mean<'a, I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a BoundingBox<T>>,
        T: 'a,
    {
        let mut sum = [T::zero(); 4];
        let mut count = T::zero();
        for b in boxes {
            for (i, s) in sum.iter_mut().enumerate() {
                *s = *s + b.tlbr[(0, i)];
            }
            count = count + T::one();
        }
        if count == T::zero() {
            return None;
        }
        Some(Self::new(
            sum[0] / count,
            sum[1] / count,
            sum[2] / count,
            sum[3] / count,
        ))
    }
}
