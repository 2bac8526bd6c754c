use core::cmp::Ordering;
use core::fmt::{Debug, Display};
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use num_traits::{CheckedAdd, CheckedMul, CheckedSub, Zero};

/// A trait representing an edge weight, which is a capacity, a cost or a distance depending on
/// the solver reading it.
///
/// Integers and floats both qualify. Floats are compared through `PartialOrd` and are expected to
/// be finite.
pub trait Weight:
    Copy
    + Sum<Self>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + PartialOrd
    + AddAssign
    + SubAssign
    + Zero
    + Debug
    + Display
    + Default
{
    fn is_negative(&self) -> bool {
        *self < Self::zero()
    }

    /// `self + rhs`, `None` if it overflows. Floats never overflow.
    fn try_add(self, rhs: Self) -> Option<Self>;

    /// `self - rhs`, `None` if it overflows.
    fn try_sub(self, rhs: Self) -> Option<Self>;

    /// `self * rhs`, `None` if it overflows.
    fn try_mul(self, rhs: Self) -> Option<Self>;

    /// Whether `self` is zero up to the rounding error accumulated over quantities of magnitude
    /// `scale`. Exact for integers.
    fn is_negligible(self, scale: Self) -> bool;
}

macro_rules! integer_weight {
    ($($t:ty),*) => {$(
        impl Weight for $t {
            fn try_add(self, rhs: Self) -> Option<Self> {
                CheckedAdd::checked_add(&self, &rhs)
            }

            fn try_sub(self, rhs: Self) -> Option<Self> {
                CheckedSub::checked_sub(&self, &rhs)
            }

            fn try_mul(self, rhs: Self) -> Option<Self> {
                CheckedMul::checked_mul(&self, &rhs)
            }

            fn is_negligible(self, _scale: Self) -> bool {
                self == 0
            }
        }
    )*};
}

macro_rules! float_weight {
    ($($t:ty => $tolerance:expr),*) => {$(
        impl Weight for $t {
            fn try_add(self, rhs: Self) -> Option<Self> {
                Some(self + rhs)
            }

            fn try_sub(self, rhs: Self) -> Option<Self> {
                Some(self - rhs)
            }

            fn try_mul(self, rhs: Self) -> Option<Self> {
                Some(self * rhs)
            }

            fn is_negligible(self, scale: Self) -> bool {
                let abs = |x: Self| if x < 0.0 { -x } else { x };
                let scale = if abs(scale) > 1.0 { abs(scale) } else { 1.0 };
                abs(self) <= $tolerance * scale
            }
        }
    )*};
}

integer_weight!(i32, i64);

float_weight!(f32 => 1e-5, f64 => 1e-9);

/// Total order over weights, incomparable values (NaN) compare as equal.
pub(crate) fn cmp_weights<W: PartialOrd>(a: &W, b: &W) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// The smaller of two weights, `a` on ties.
pub(crate) fn min_weight<W: PartialOrd>(a: W, b: W) -> W {
    if b < a {
        b
    } else {
        a
    }
}

/// Sum of `weights`, `None` if it overflows.
pub(crate) fn checked_sum<W: Weight>(weights: impl IntoIterator<Item = W>) -> Option<W> {
    weights
        .into_iter()
        .try_fold(W::zero(), |acc, w| acc.try_add(w))
}
