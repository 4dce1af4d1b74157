// crates/pgas-collectives/src/api.rs

//! Named entry points, one `reduce_<type>_<op>_to_all_<algorithm>` function
//! per (type, operator, algorithm) triple — mirroring the combinatorial
//! `SHCOLL_REDUCE_DEFINE` table the original source expands per (type, op)
//! macro, generalised here to a thin wrapper over the one generic
//! [`crate::linear::reduce_to_all`] (etc.) implementation per algorithm.
//!
//! These exist purely for discoverability and C-ABI-shaped naming; calling
//! the generic `reduce_to_all::<T, Op>` functions directly works identically
//! and is what [`crate::api`]'s own wrappers do.

use pgas_core::{And, Error, Max, Min, Or, Prod, Sum, Xor};
use pgas_fabric::{SymmetricArray, SyncArray};

macro_rules! define_reduction_family {
    ($ty:ty, $op:ty, $linear:ident, $binomial:ident, $rec_dbl:ident, $rabenseifner:ident) => {
        /// Linear reduction. See [`crate::linear::reduce_to_all`].
        pub fn $linear(
            me_as: usize,
            pe_size: u32,
            dest: &SymmetricArray<$ty>,
            source: &SymmetricArray<$ty>,
            psync: &SyncArray,
        ) -> Result<(), Error> {
            crate::linear::reduce_to_all::<$ty, $op>(me_as, pe_size, dest, source, psync)
        }

        /// Binomial-tree reduction. See [`crate::binomial::reduce_to_all`].
        pub fn $binomial(
            me_as: usize,
            pe_size: u32,
            dest: &SymmetricArray<$ty>,
            source: &SymmetricArray<$ty>,
            psync: &SyncArray,
        ) -> Result<(), Error> {
            crate::binomial::reduce_to_all::<$ty, $op>(me_as, pe_size, dest, source, psync)
        }

        /// Recursive-doubling reduction. See [`crate::rec_dbl::reduce_to_all`].
        pub fn $rec_dbl(
            me_as: usize,
            pe_size: u32,
            dest: &SymmetricArray<$ty>,
            source: &SymmetricArray<$ty>,
            psync: &SyncArray,
        ) -> Result<(), Error> {
            crate::rec_dbl::reduce_to_all::<$ty, $op>(me_as, pe_size, dest, source, psync)
        }

        /// Rabenseifner reduction. See [`crate::rabenseifner::reduce_to_all`].
        pub fn $rabenseifner(
            me_as: usize,
            pe_size: u32,
            dest: &SymmetricArray<$ty>,
            source: &SymmetricArray<$ty>,
            psync: &SyncArray,
        ) -> Result<(), Error> {
            crate::rabenseifner::reduce_to_all::<$ty, $op>(me_as, pe_size, dest, source, psync)
        }
    };
}

define_reduction_family!(i16, And, reduce_i16_and_to_all_linear, reduce_i16_and_to_all_binomial, reduce_i16_and_to_all_rec_dbl, reduce_i16_and_to_all_rabenseifner);
define_reduction_family!(i16, Or, reduce_i16_or_to_all_linear, reduce_i16_or_to_all_binomial, reduce_i16_or_to_all_rec_dbl, reduce_i16_or_to_all_rabenseifner);
define_reduction_family!(i16, Xor, reduce_i16_xor_to_all_linear, reduce_i16_xor_to_all_binomial, reduce_i16_xor_to_all_rec_dbl, reduce_i16_xor_to_all_rabenseifner);
define_reduction_family!(i16, Min, reduce_i16_min_to_all_linear, reduce_i16_min_to_all_binomial, reduce_i16_min_to_all_rec_dbl, reduce_i16_min_to_all_rabenseifner);
define_reduction_family!(i16, Max, reduce_i16_max_to_all_linear, reduce_i16_max_to_all_binomial, reduce_i16_max_to_all_rec_dbl, reduce_i16_max_to_all_rabenseifner);
define_reduction_family!(i16, Sum, reduce_i16_sum_to_all_linear, reduce_i16_sum_to_all_binomial, reduce_i16_sum_to_all_rec_dbl, reduce_i16_sum_to_all_rabenseifner);
define_reduction_family!(i16, Prod, reduce_i16_prod_to_all_linear, reduce_i16_prod_to_all_binomial, reduce_i16_prod_to_all_rec_dbl, reduce_i16_prod_to_all_rabenseifner);

define_reduction_family!(i32, And, reduce_i32_and_to_all_linear, reduce_i32_and_to_all_binomial, reduce_i32_and_to_all_rec_dbl, reduce_i32_and_to_all_rabenseifner);
define_reduction_family!(i32, Or, reduce_i32_or_to_all_linear, reduce_i32_or_to_all_binomial, reduce_i32_or_to_all_rec_dbl, reduce_i32_or_to_all_rabenseifner);
define_reduction_family!(i32, Xor, reduce_i32_xor_to_all_linear, reduce_i32_xor_to_all_binomial, reduce_i32_xor_to_all_rec_dbl, reduce_i32_xor_to_all_rabenseifner);
define_reduction_family!(i32, Min, reduce_i32_min_to_all_linear, reduce_i32_min_to_all_binomial, reduce_i32_min_to_all_rec_dbl, reduce_i32_min_to_all_rabenseifner);
define_reduction_family!(i32, Max, reduce_i32_max_to_all_linear, reduce_i32_max_to_all_binomial, reduce_i32_max_to_all_rec_dbl, reduce_i32_max_to_all_rabenseifner);
define_reduction_family!(i32, Sum, reduce_i32_sum_to_all_linear, reduce_i32_sum_to_all_binomial, reduce_i32_sum_to_all_rec_dbl, reduce_i32_sum_to_all_rabenseifner);
define_reduction_family!(i32, Prod, reduce_i32_prod_to_all_linear, reduce_i32_prod_to_all_binomial, reduce_i32_prod_to_all_rec_dbl, reduce_i32_prod_to_all_rabenseifner);

define_reduction_family!(i64, And, reduce_i64_and_to_all_linear, reduce_i64_and_to_all_binomial, reduce_i64_and_to_all_rec_dbl, reduce_i64_and_to_all_rabenseifner);
define_reduction_family!(i64, Or, reduce_i64_or_to_all_linear, reduce_i64_or_to_all_binomial, reduce_i64_or_to_all_rec_dbl, reduce_i64_or_to_all_rabenseifner);
define_reduction_family!(i64, Xor, reduce_i64_xor_to_all_linear, reduce_i64_xor_to_all_binomial, reduce_i64_xor_to_all_rec_dbl, reduce_i64_xor_to_all_rabenseifner);
define_reduction_family!(i64, Min, reduce_i64_min_to_all_linear, reduce_i64_min_to_all_binomial, reduce_i64_min_to_all_rec_dbl, reduce_i64_min_to_all_rabenseifner);
define_reduction_family!(i64, Max, reduce_i64_max_to_all_linear, reduce_i64_max_to_all_binomial, reduce_i64_max_to_all_rec_dbl, reduce_i64_max_to_all_rabenseifner);
define_reduction_family!(i64, Sum, reduce_i64_sum_to_all_linear, reduce_i64_sum_to_all_binomial, reduce_i64_sum_to_all_rec_dbl, reduce_i64_sum_to_all_rabenseifner);
define_reduction_family!(i64, Prod, reduce_i64_prod_to_all_linear, reduce_i64_prod_to_all_binomial, reduce_i64_prod_to_all_rec_dbl, reduce_i64_prod_to_all_rabenseifner);

define_reduction_family!(f32, Min, reduce_f32_min_to_all_linear, reduce_f32_min_to_all_binomial, reduce_f32_min_to_all_rec_dbl, reduce_f32_min_to_all_rabenseifner);
define_reduction_family!(f32, Max, reduce_f32_max_to_all_linear, reduce_f32_max_to_all_binomial, reduce_f32_max_to_all_rec_dbl, reduce_f32_max_to_all_rabenseifner);
define_reduction_family!(f32, Sum, reduce_f32_sum_to_all_linear, reduce_f32_sum_to_all_binomial, reduce_f32_sum_to_all_rec_dbl, reduce_f32_sum_to_all_rabenseifner);
define_reduction_family!(f32, Prod, reduce_f32_prod_to_all_linear, reduce_f32_prod_to_all_binomial, reduce_f32_prod_to_all_rec_dbl, reduce_f32_prod_to_all_rabenseifner);

define_reduction_family!(f64, Min, reduce_f64_min_to_all_linear, reduce_f64_min_to_all_binomial, reduce_f64_min_to_all_rec_dbl, reduce_f64_min_to_all_rabenseifner);
define_reduction_family!(f64, Max, reduce_f64_max_to_all_linear, reduce_f64_max_to_all_binomial, reduce_f64_max_to_all_rec_dbl, reduce_f64_max_to_all_rabenseifner);
define_reduction_family!(f64, Sum, reduce_f64_sum_to_all_linear, reduce_f64_sum_to_all_binomial, reduce_f64_sum_to_all_rec_dbl, reduce_f64_sum_to_all_rabenseifner);
define_reduction_family!(f64, Prod, reduce_f64_prod_to_all_linear, reduce_f64_prod_to_all_binomial, reduce_f64_prod_to_all_rec_dbl, reduce_f64_prod_to_all_rabenseifner);

define_reduction_family!(num_complex::Complex<f32>, Sum, reduce_complexf_sum_to_all_linear, reduce_complexf_sum_to_all_binomial, reduce_complexf_sum_to_all_rec_dbl, reduce_complexf_sum_to_all_rabenseifner);
define_reduction_family!(num_complex::Complex<f32>, Prod, reduce_complexf_prod_to_all_linear, reduce_complexf_prod_to_all_binomial, reduce_complexf_prod_to_all_rec_dbl, reduce_complexf_prod_to_all_rabenseifner);
define_reduction_family!(num_complex::Complex<f64>, Sum, reduce_complexd_sum_to_all_linear, reduce_complexd_sum_to_all_binomial, reduce_complexd_sum_to_all_rec_dbl, reduce_complexd_sum_to_all_rabenseifner);
define_reduction_family!(num_complex::Complex<f64>, Prod, reduce_complexd_prod_to_all_linear, reduce_complexd_prod_to_all_binomial, reduce_complexd_prod_to_all_rec_dbl, reduce_complexd_prod_to_all_rabenseifner);
