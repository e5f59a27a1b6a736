// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

use crate::error::{TreeError, TreeResult};

/// Axis-aligned bounding box in 2D.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Scalar> Aabb2D<T> {
    /// Create an AABB from origin and size.
    pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
        Self::new(x, y, T::add(x, w), T::add(y, h))
    }

    /// Extent along the x axis.
    pub fn width(&self) -> T {
        T::sub(self.max_x, self.min_x)
    }

    /// Extent along the y axis.
    pub fn height(&self) -> T {
        T::sub(self.max_y, self.min_y)
    }

    /// Whether this AABB contains the point (boundary inclusive).
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether `other` lies entirely inside this AABB (boundary inclusive).
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min_x, other.min_x)
            && le(self.min_y, other.min_y)
            && le(other.max_x, self.max_x)
            && le(other.max_y, self.max_y)
    }

    /// Whether two AABBs overlap.
    ///
    /// With `touch_is_overlap` set, boxes sharing only an edge or a corner count
    /// as overlapping; otherwise a strictly positive intersection is required.
    pub fn overlaps(&self, other: &Self, touch_is_overlap: bool) -> bool {
        if touch_is_overlap {
            le(self.min_x, other.max_x)
                && le(other.min_x, self.max_x)
                && le(self.min_y, other.max_y)
                && le(other.min_y, self.max_y)
        } else {
            lt(self.min_x, other.max_x)
                && lt(other.min_x, self.max_x)
                && lt(self.min_y, other.max_y)
                && lt(other.min_y, self.max_y)
        }
    }

    /// Smallest AABB enclosing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }

    /// Expand each axis by `thickness` times the box's extent on that axis, on both sides.
    #[must_use]
    pub fn fattened(&self, thickness: T) -> Self {
        let dx = T::mul(self.width(), thickness);
        let dy = T::mul(self.height(), thickness);
        Self::new(
            T::sub(self.min_x, dx),
            T::sub(self.min_y, dy),
            T::add(self.max_x, dx),
            T::add(self.max_y, dy),
        )
    }

    /// The same box moved so that its minimum corner sits at `(x, y)`.
    #[must_use]
    pub fn with_origin(&self, x: T, y: T) -> Self {
        Self::from_xywh(x, y, self.width(), self.height())
    }

    /// Finite coordinates with `min < max` on both axes.
    pub fn is_valid(&self) -> bool {
        T::is_finite(self.min_x)
            && T::is_finite(self.min_y)
            && T::is_finite(self.max_x)
            && T::is_finite(self.max_y)
            && lt(self.min_x, self.max_x)
            && lt(self.min_y, self.max_y)
    }
}

/// Numeric scalar abstraction for tree coordinates.
///
/// This trait provides the minimal set of operations required for fattening and
/// SAH costs, and an associated widened accumulator type for area
/// (f32→f64, f64→f64).
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for area/cost computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + core::ops::Mul<Output = Self::Acc>
        + Debug;

    /// Add two scalar values.
    fn add(a: Self, b: Self) -> Self;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Multiply two scalar values.
    fn mul(a: Self, b: Self) -> Self;

    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Whether the value is neither infinite nor NaN.
    fn is_finite(v: Self) -> bool;

    /// Convert an `f64` constant into the scalar type.
    fn from_f64(v: f64) -> Self;

    /// Convert a scalar to `f64` for reporting.
    fn to_f64(v: Self) -> f64;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Convert a `usize` to the accumulator type (for SAH weighting).
    fn acc_from_usize(n: usize) -> Self::Acc;

    /// Convert an accumulator value to `f64` for reporting ratios.
    fn acc_to_f64(v: Self::Acc) -> f64;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn mul(a: Self, b: Self) -> Self {
        a * b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn is_finite(v: Self) -> bool {
        v.is_finite()
    }

    #[inline]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Narrowing configuration constants to f32 coordinates is intended."
    )]
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_f64(v: Self) -> f64 {
        v as f64
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v as f64
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as f64
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        v
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn add(a: Self, b: Self) -> Self {
        a + b
    }

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn mul(a: Self, b: Self) -> Self {
        a * b
    }

    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn is_finite(v: Self) -> bool {
        v.is_finite()
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64(v: Self) -> f64 {
        v
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }

    #[inline]
    fn acc_from_usize(n: usize) -> Self::Acc {
        n as Self::Acc
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        v
    }
}

/// Perimeter-based cost heuristic of an AABB: `2 * (width + height)`.
///
/// This is the "surface area" of the 2D SAH; it stays meaningful for thin boxes
/// where the true area collapses towards zero.
#[inline]
pub fn surface_area<T: Scalar>(a: &Aabb2D<T>) -> T::Acc {
    let w = T::widen(T::sub(a.max_x, a.min_x));
    let h = T::widen(T::sub(a.max_y, a.min_y));
    T::acc_from_usize(2) * (w + h)
}

/// Helper alias for the widened accumulator type associated with a scalar `T`.
pub type ScalarAcc<T> = <T as Scalar>::Acc;

/// An AABB together with its cached surface area.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Bounds<T: Scalar> {
    pub(crate) aabb: Aabb2D<T>,
    pub(crate) area: T::Acc,
}

impl<T: Scalar> Bounds<T> {
    pub(crate) fn new(aabb: Aabb2D<T>) -> Self {
        Self {
            aabb,
            area: surface_area(&aabb),
        }
    }

    pub(crate) fn zero() -> Self {
        Self::new(Aabb2D::new(T::zero(), T::zero(), T::zero(), T::zero()))
    }

    pub(crate) fn union(&self, other: &Self) -> Self {
        Self::new(union_aabb(self.aabb, other.aabb))
    }
}

/// Reject boxes that cannot be stored as leaves.
pub(crate) fn validate_aabb<T: Scalar>(aabb: &Aabb2D<T>) -> TreeResult<()> {
    if aabb.is_valid() {
        Ok(())
    } else {
        Err(TreeError::InvalidBounds {
            min_x: T::to_f64(aabb.min_x),
            min_y: T::to_f64(aabb.min_y),
            max_x: T::to_f64(aabb.max_x),
            max_y: T::to_f64(aabb.max_y),
        })
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy>(a: Aabb2D<T>, b: Aabb2D<T>) -> Aabb2D<T> {
    Aabb2D {
        min_x: min_t(a.min_x, b.min_x),
        min_y: min_t(a.min_y, b.min_y),
        max_x: max_t(a.max_x, b.max_x),
        max_y: max_t(a.max_y, b.max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_area_is_perimeter() {
        let a = Aabb2D::new(0.0_f64, 0.0, 10.0, 4.0);
        assert_eq!(surface_area(&a), 28.0);
        let b = Aabb2D::new(0.0_f32, 0.0, 0.5, 0.25);
        assert_eq!(surface_area(&b), 1.5);
    }

    #[test]
    fn touching_boxes_depend_on_flag() {
        let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb2D::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.overlaps(&b, true));
        assert!(!a.overlaps(&b, false));

        let c = Aabb2D::new(10.5, 0.0, 20.0, 10.0);
        assert!(!a.overlaps(&c, true));

        let d = Aabb2D::new(5.0, 5.0, 15.0, 15.0);
        assert!(a.overlaps(&d, false));
    }

    #[test]
    fn fattening_scales_with_extent() {
        let a = Aabb2D::new(0.0, 0.0, 100.0, 20.0);
        let f = a.fattened(0.1);
        assert_eq!(f, Aabb2D::new(-10.0, -2.0, 110.0, 22.0));
        assert!(f.contains(&a));
        assert!(!a.contains(&f));
    }

    #[test]
    fn with_origin_keeps_size() {
        let a = Aabb2D::new(10.0, 20.0, 15.0, 30.0);
        let moved = a.with_origin(-5.0, 0.0);
        assert_eq!(moved, Aabb2D::new(-5.0, 0.0, 0.0, 10.0));
    }

    #[test]
    fn degenerate_and_non_finite_boxes_are_invalid() {
        assert!(Aabb2D::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Aabb2D::new(0.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!Aabb2D::new(2.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Aabb2D::new(0.0, f64::NAN, 1.0, 1.0).is_valid());
        assert!(!Aabb2D::new(0.0, 0.0, f64::INFINITY, 1.0).is_valid());
        assert!(validate_aabb(&Aabb2D::new(0.0, 0.0, 0.0, 0.0)).is_err());
    }
}
