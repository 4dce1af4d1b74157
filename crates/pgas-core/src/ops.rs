// crates/pgas-core/src/ops.rs

//! The operator capability set: an associative binary op with a neutral
//! element, monomorphised per concrete element type rather than emitted per
//! `(type, op)` pair via textual expansion (spec §9 Design Notes).

use num_complex::Complex;

/// An associative (and, for the types it supports, commutative) binary
/// reduction operator over `T`, with a neutral element.
///
/// `identity()` is not load-bearing for correctness of the algorithms in
/// this workspace (every PE always contributes a real value), but it keeps
/// the trait self-contained and is used by a handful of tests that fold an
/// empty slice.
pub trait ReduceOp<T> {
    /// Human-readable name, used only in diagnostics/benchmark labels.
    const NAME: &'static str;

    /// The neutral element `e` such that `combine(e, x) == x` for all `x`.
    fn identity() -> T;

    /// Combine two contributions. Must be associative; commutative for
    /// every operator this workspace supports.
    fn combine(a: T, b: T) -> T;
}

/// Bitwise AND (integer types only).
#[derive(Clone, Copy, Debug)]
pub struct And;
/// Bitwise OR (integer types only).
#[derive(Clone, Copy, Debug)]
pub struct Or;
/// Bitwise XOR (integer types only).
#[derive(Clone, Copy, Debug)]
pub struct Xor;
/// Minimum (integer + real types).
#[derive(Clone, Copy, Debug)]
pub struct Min;
/// Maximum (integer + real types).
#[derive(Clone, Copy, Debug)]
pub struct Max;
/// Sum (integer + real + complex types).
#[derive(Clone, Copy, Debug)]
pub struct Sum;
/// Product (integer + real + complex types).
#[derive(Clone, Copy, Debug)]
pub struct Prod;

macro_rules! impl_bitwise_and_sum_prod {
    ($($t:ty),+ $(,)?) => {
        $(
            impl ReduceOp<$t> for And {
                const NAME: &'static str = "and";
                #[inline] fn identity() -> $t { !0 }
                #[inline] fn combine(a: $t, b: $t) -> $t { a & b }
            }
            impl ReduceOp<$t> for Or {
                const NAME: &'static str = "or";
                #[inline] fn identity() -> $t { 0 }
                #[inline] fn combine(a: $t, b: $t) -> $t { a | b }
            }
            impl ReduceOp<$t> for Xor {
                const NAME: &'static str = "xor";
                #[inline] fn identity() -> $t { 0 }
                #[inline] fn combine(a: $t, b: $t) -> $t { a ^ b }
            }
            impl ReduceOp<$t> for Min {
                const NAME: &'static str = "min";
                #[inline] fn identity() -> $t { <$t>::MAX }
                #[inline] fn combine(a: $t, b: $t) -> $t { if a < b { a } else { b } }
            }
            impl ReduceOp<$t> for Max {
                const NAME: &'static str = "max";
                #[inline] fn identity() -> $t { <$t>::MIN }
                #[inline] fn combine(a: $t, b: $t) -> $t { if a > b { a } else { b } }
            }
            impl ReduceOp<$t> for Sum {
                const NAME: &'static str = "sum";
                #[inline] fn identity() -> $t { 0 }
                #[inline] fn combine(a: $t, b: $t) -> $t { a.wrapping_add(b) }
            }
            impl ReduceOp<$t> for Prod {
                const NAME: &'static str = "prod";
                #[inline] fn identity() -> $t { 1 }
                #[inline] fn combine(a: $t, b: $t) -> $t { a.wrapping_mul(b) }
            }
        )+
    };
}

impl_bitwise_and_sum_prod!(i16, i32, i64);

macro_rules! impl_real_min_max_sum_prod {
    ($($t:ty),+ $(,)?) => {
        $(
            impl ReduceOp<$t> for Min {
                const NAME: &'static str = "min";
                #[inline] fn identity() -> $t { <$t>::INFINITY }
                #[inline] fn combine(a: $t, b: $t) -> $t { a.min(b) }
            }
            impl ReduceOp<$t> for Max {
                const NAME: &'static str = "max";
                #[inline] fn identity() -> $t { <$t>::NEG_INFINITY }
                #[inline] fn combine(a: $t, b: $t) -> $t { a.max(b) }
            }
            impl ReduceOp<$t> for Sum {
                const NAME: &'static str = "sum";
                #[inline] fn identity() -> $t { 0.0 }
                #[inline] fn combine(a: $t, b: $t) -> $t { a + b }
            }
            impl ReduceOp<$t> for Prod {
                const NAME: &'static str = "prod";
                #[inline] fn identity() -> $t { 1.0 }
                #[inline] fn combine(a: $t, b: $t) -> $t { a * b }
            }
        )+
    };
}

impl_real_min_max_sum_prod!(f32, f64);

macro_rules! impl_complex_sum_prod {
    ($($t:ty),+ $(,)?) => {
        $(
            impl ReduceOp<Complex<$t>> for Sum {
                const NAME: &'static str = "sum";
                #[inline] fn identity() -> Complex<$t> { Complex::new(0.0, 0.0) }
                #[inline] fn combine(a: Complex<$t>, b: Complex<$t>) -> Complex<$t> { a + b }
            }
            impl ReduceOp<Complex<$t>> for Prod {
                const NAME: &'static str = "prod";
                #[inline] fn identity() -> Complex<$t> { Complex::new(1.0, 0.0) }
                #[inline] fn combine(a: Complex<$t>, b: Complex<$t>) -> Complex<$t> { a * b }
            }
        )+
    };
}

impl_complex_sum_prod!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ops_match_expected() {
        assert_eq!(<Sum as ReduceOp<i32>>::combine(2, 3), 5);
        assert_eq!(<Prod as ReduceOp<i32>>::combine(2, 3), 6);
        assert_eq!(<Max as ReduceOp<i32>>::combine(2, 3), 3);
        assert_eq!(<Min as ReduceOp<i32>>::combine(2, 3), 2);
        assert_eq!(<And as ReduceOp<i32>>::combine(0b110, 0b011), 0b010);
        assert_eq!(<Or as ReduceOp<i32>>::combine(0b110, 0b011), 0b111);
        assert_eq!(<Xor as ReduceOp<i32>>::combine(0b110, 0b011), 0b101);
    }

    #[test]
    fn float_sum_is_associative_within_tolerance() {
        let a = <Sum as ReduceOp<f64>>::combine(0.1, 0.2);
        let b = 0.1 + 0.2;
        assert!((a - b).abs() < 1e-15);
    }

    #[test]
    fn complex_sum_and_prod() {
        let a = Complex::new(1.0_f64, 2.0);
        let b = Complex::new(3.0_f64, -1.0);
        assert_eq!(<Sum as ReduceOp<Complex<f64>>>::combine(a, b), a + b);
        assert_eq!(<Prod as ReduceOp<Complex<f64>>>::combine(a, b), a * b);
    }
}
