// crates/pgas-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pgas_core::sync::psync_size;
use pgas_core::{And, Max, Min, Or, PowerOfTwoSubset, Prod, Sum, Xor};
use pgas_fabric::World;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "pgas-cli",
    about = "Drive the simulated PGAS collective reductions",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run one algorithm over deterministically generated source data and
    /// print the resulting array plus whether pSync came back quiescent.
    Reduce {
        /// Algorithm to run.
        #[arg(value_enum, long)]
        algo: AlgoOpt,
        /// Reduction operator.
        #[arg(value_enum, long)]
        op: OpOpt,
        /// Element type.
        #[arg(value_enum, long, default_value_t = TyOpt::I32)]
        ty: TyOpt,
        /// Number of participating PEs (PE_start=0, logPE_stride=0).
        #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(1..))]
        pe_size: u32,
        /// Elements per PE.
        #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(usize).range(1..))]
        nreduce: usize,
        /// Seed for the deterministic per-PE source data.
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },

    /// Run all four algorithms over the same generated data and confirm they
    /// agree, exiting non-zero if any pair disagrees.
    CrossCheck {
        /// Number of participating PEs.
        #[arg(long, default_value_t = 13, value_parser = clap::value_parser!(u32).range(1..))]
        pe_size: u32,
        /// Elements per PE.
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(usize).range(1..))]
        nreduce: usize,
        /// Seed for the deterministic per-PE source data.
        #[arg(long, default_value_t = 1)]
        seed: u64,
    },
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum AlgoOpt {
    Linear,
    Binomial,
    RecDbl,
    Rabenseifner,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum OpOpt {
    And,
    Or,
    Xor,
    Min,
    Max,
    Sum,
    Prod,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum TyOpt {
    I16,
    I32,
    I64,
    F32,
    F64,
}

/// Deterministic per-PE source data: PE `k` contributes `[seed + k, seed + k,
/// ...]` so every algorithm's expected sum/min/max/xor is computable by hand
/// without re-deriving the fold here.
fn det_i64(pe_size: u32, nreduce: usize, seed: u64) -> Vec<Vec<i64>> {
    (0..pe_size)
        .map(|k| vec![seed.wrapping_add(u64::from(k)) as i64; nreduce])
        .collect()
}

fn det_f64(pe_size: u32, nreduce: usize, seed: u64) -> Vec<Vec<f64>> {
    (0..pe_size)
        .map(|k| vec![seed as f64 * 0.1 + f64::from(k); nreduce])
        .collect()
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Reduce {
            algo,
            op,
            ty,
            pe_size,
            nreduce,
            seed,
        } => reduce(algo, op, ty, pe_size, nreduce, seed),
        Cmd::CrossCheck {
            pe_size,
            nreduce,
            seed,
        } => cross_check(pe_size, nreduce, seed),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();
    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}

macro_rules! run_int_algo {
    ($algo:expr, $op:expr, $ty:ty, $pe_size:expr, $source:expr, $dest:expr, $psync:expr) => {
        match ($algo, $op) {
            (AlgoOpt::Linear, OpOpt::And) => pgas_collectives::linear::reduce_to_all::<$ty, And>,
            (AlgoOpt::Linear, OpOpt::Or) => pgas_collectives::linear::reduce_to_all::<$ty, Or>,
            (AlgoOpt::Linear, OpOpt::Xor) => pgas_collectives::linear::reduce_to_all::<$ty, Xor>,
            (AlgoOpt::Linear, OpOpt::Min) => pgas_collectives::linear::reduce_to_all::<$ty, Min>,
            (AlgoOpt::Linear, OpOpt::Max) => pgas_collectives::linear::reduce_to_all::<$ty, Max>,
            (AlgoOpt::Linear, OpOpt::Sum) => pgas_collectives::linear::reduce_to_all::<$ty, Sum>,
            (AlgoOpt::Linear, OpOpt::Prod) => pgas_collectives::linear::reduce_to_all::<$ty, Prod>,
            (AlgoOpt::Binomial, OpOpt::And) => pgas_collectives::binomial::reduce_to_all::<$ty, And>,
            (AlgoOpt::Binomial, OpOpt::Or) => pgas_collectives::binomial::reduce_to_all::<$ty, Or>,
            (AlgoOpt::Binomial, OpOpt::Xor) => pgas_collectives::binomial::reduce_to_all::<$ty, Xor>,
            (AlgoOpt::Binomial, OpOpt::Min) => pgas_collectives::binomial::reduce_to_all::<$ty, Min>,
            (AlgoOpt::Binomial, OpOpt::Max) => pgas_collectives::binomial::reduce_to_all::<$ty, Max>,
            (AlgoOpt::Binomial, OpOpt::Sum) => pgas_collectives::binomial::reduce_to_all::<$ty, Sum>,
            (AlgoOpt::Binomial, OpOpt::Prod) => pgas_collectives::binomial::reduce_to_all::<$ty, Prod>,
            (AlgoOpt::RecDbl, OpOpt::And) => pgas_collectives::rec_dbl::reduce_to_all::<$ty, And>,
            (AlgoOpt::RecDbl, OpOpt::Or) => pgas_collectives::rec_dbl::reduce_to_all::<$ty, Or>,
            (AlgoOpt::RecDbl, OpOpt::Xor) => pgas_collectives::rec_dbl::reduce_to_all::<$ty, Xor>,
            (AlgoOpt::RecDbl, OpOpt::Min) => pgas_collectives::rec_dbl::reduce_to_all::<$ty, Min>,
            (AlgoOpt::RecDbl, OpOpt::Max) => pgas_collectives::rec_dbl::reduce_to_all::<$ty, Max>,
            (AlgoOpt::RecDbl, OpOpt::Sum) => pgas_collectives::rec_dbl::reduce_to_all::<$ty, Sum>,
            (AlgoOpt::RecDbl, OpOpt::Prod) => pgas_collectives::rec_dbl::reduce_to_all::<$ty, Prod>,
            (AlgoOpt::Rabenseifner, OpOpt::And) => pgas_collectives::rabenseifner::reduce_to_all::<$ty, And>,
            (AlgoOpt::Rabenseifner, OpOpt::Or) => pgas_collectives::rabenseifner::reduce_to_all::<$ty, Or>,
            (AlgoOpt::Rabenseifner, OpOpt::Xor) => pgas_collectives::rabenseifner::reduce_to_all::<$ty, Xor>,
            (AlgoOpt::Rabenseifner, OpOpt::Min) => pgas_collectives::rabenseifner::reduce_to_all::<$ty, Min>,
            (AlgoOpt::Rabenseifner, OpOpt::Max) => pgas_collectives::rabenseifner::reduce_to_all::<$ty, Max>,
            (AlgoOpt::Rabenseifner, OpOpt::Sum) => pgas_collectives::rabenseifner::reduce_to_all::<$ty, Sum>,
            (AlgoOpt::Rabenseifner, OpOpt::Prod) => pgas_collectives::rabenseifner::reduce_to_all::<$ty, Prod>,
        }
    };
}

/// Run `f` once per PE and turn the first precondition error any PE hit into
/// a single `anyhow` failure — the CLI always sizes `pSync` itself, so a
/// `Result::Err` here means a bug in this binary, not bad user input.
fn drive<F>(world: &World, f: F) -> Result<()>
where
    F: Fn(usize) -> Result<(), pgas_core::Error> + Send + Sync,
{
    for r in world.run(f) {
        r?;
    }
    Ok(())
}

fn psync_cells(algo: AlgoOpt, pe_size: u32) -> usize {
    let p2s_size = PowerOfTwoSubset::new(pe_size).p2s_size;
    match algo {
        AlgoOpt::Linear => psync_size::linear(),
        AlgoOpt::Binomial => psync_size::binomial(pe_size),
        AlgoOpt::RecDbl => psync_size::rec_dbl(p2s_size),
        AlgoOpt::Rabenseifner => psync_size::rabenseifner(p2s_size),
    }
}

fn reduce(algo: AlgoOpt, op: OpOpt, ty: TyOpt, pe_size: u32, nreduce: usize, seed: u64) -> Result<()> {
    if matches!(ty, TyOpt::F32 | TyOpt::F64) && matches!(op, OpOpt::And | OpOpt::Or | OpOpt::Xor) {
        bail!("{:?} does not support bitwise operator {:?}", ty, op);
    }

    info!(?algo, ?op, ?ty, pe_size, nreduce, "running reduction");
    let world = World::new(pe_size as i32);
    let cells = psync_cells(algo, pe_size);
    let psync = world.alloc_psync(cells);
    let start = Instant::now();

    let (result, quiescent) = match ty {
        TyOpt::I16 => {
            let source = pgas_fabric::SymmetricArray::from_per_pe(
                det_i64(pe_size, nreduce, seed)
                    .into_iter()
                    .map(|v| v.into_iter().map(|x| x as i16).collect())
                    .collect(),
            );
            let dest = world.alloc::<i16>(nreduce, 0);
            let f = run_int_algo!(algo, op, i16, pe_size, source, dest, psync);
            drive(&world, |me_as| f(me_as, pe_size, &dest, &source, &psync))?;
            (format!("{:?}", dest.snapshot_own(0)), psync.all_quiescent())
        }
        TyOpt::I32 => {
            let source = pgas_fabric::SymmetricArray::from_per_pe(
                det_i64(pe_size, nreduce, seed)
                    .into_iter()
                    .map(|v| v.into_iter().map(|x| x as i32).collect())
                    .collect(),
            );
            let dest = world.alloc::<i32>(nreduce, 0);
            let f = run_int_algo!(algo, op, i32, pe_size, source, dest, psync);
            drive(&world, |me_as| f(me_as, pe_size, &dest, &source, &psync))?;
            (format!("{:?}", dest.snapshot_own(0)), psync.all_quiescent())
        }
        TyOpt::I64 => {
            let source = pgas_fabric::SymmetricArray::from_per_pe(det_i64(pe_size, nreduce, seed));
            let dest = world.alloc::<i64>(nreduce, 0);
            let f = run_int_algo!(algo, op, i64, pe_size, source, dest, psync);
            drive(&world, |me_as| f(me_as, pe_size, &dest, &source, &psync))?;
            (format!("{:?}", dest.snapshot_own(0)), psync.all_quiescent())
        }
        TyOpt::F32 | TyOpt::F64 => {
            let op_name = op;
            let source64 = det_f64(pe_size, nreduce, seed);
            if matches!(ty, TyOpt::F32) {
                let source = pgas_fabric::SymmetricArray::from_per_pe(
                    source64.into_iter().map(|v| v.into_iter().map(|x| x as f32).collect()).collect(),
                );
                let dest = world.alloc::<f32>(nreduce, 0.0);
                let out = run_float(algo, op_name, &world, pe_size, nreduce, &source, &dest, &psync)?;
                (out, psync.all_quiescent())
            } else {
                let source = pgas_fabric::SymmetricArray::from_per_pe(source64);
                let dest = world.alloc::<f64>(nreduce, 0.0);
                let out = run_float(algo, op_name, &world, pe_size, nreduce, &source, &dest, &psync)?;
                (out, psync.all_quiescent())
            }
        }
    };

    let elapsed = start.elapsed();
    println!("result (PE 0): {result}");
    println!("pSync restored to quiescent: {quiescent}");
    println!("elapsed: {elapsed:?}");
    if !quiescent {
        bail!("pSync was not fully restored — this is always a bug in the algorithm, not the caller");
    }
    Ok(())
}

fn run_float<T>(
    algo: AlgoOpt,
    op: OpOpt,
    world: &World,
    pe_size: u32,
    _nreduce: usize,
    source: &pgas_fabric::SymmetricArray<T>,
    dest: &pgas_fabric::SymmetricArray<T>,
    psync: &pgas_fabric::SyncArray,
) -> Result<String>
where
    T: Copy + Send + Sync + std::fmt::Debug,
    Min: pgas_core::ReduceOp<T>,
    Max: pgas_core::ReduceOp<T>,
    Sum: pgas_core::ReduceOp<T>,
    Prod: pgas_core::ReduceOp<T>,
{
    macro_rules! dispatch {
        ($op_ty:ty) => {
            match algo {
                AlgoOpt::Linear => drive(world, |me_as| {
                    pgas_collectives::linear::reduce_to_all::<T, $op_ty>(me_as, pe_size, dest, source, psync)
                }),
                AlgoOpt::Binomial => drive(world, |me_as| {
                    pgas_collectives::binomial::reduce_to_all::<T, $op_ty>(me_as, pe_size, dest, source, psync)
                }),
                AlgoOpt::RecDbl => drive(world, |me_as| {
                    pgas_collectives::rec_dbl::reduce_to_all::<T, $op_ty>(me_as, pe_size, dest, source, psync)
                }),
                AlgoOpt::Rabenseifner => drive(world, |me_as| {
                    pgas_collectives::rabenseifner::reduce_to_all::<T, $op_ty>(me_as, pe_size, dest, source, psync)
                }),
            }
        };
    }
    match op {
        OpOpt::Min => dispatch!(Min),
        OpOpt::Max => dispatch!(Max),
        OpOpt::Sum => dispatch!(Sum),
        OpOpt::Prod => dispatch!(Prod),
        OpOpt::And | OpOpt::Or | OpOpt::Xor => unreachable!("rejected before reaching here"),
    }?;
    Ok(format!("{:?}", dest.snapshot_own(0)))
}

fn cross_check(pe_size: u32, nreduce: usize, seed: u64) -> Result<()> {
    info!(pe_size, nreduce, "cross-checking all four algorithms");
    let p2s_size = PowerOfTwoSubset::new(pe_size).p2s_size;
    let source = pgas_fabric::SymmetricArray::from_per_pe(det_i64(pe_size, nreduce, seed));
    let world = World::new(pe_size as i32);

    let mut results = Vec::new();
    for (label, algo) in [
        ("linear", AlgoOpt::Linear),
        ("binomial", AlgoOpt::Binomial),
        ("rec_dbl", AlgoOpt::RecDbl),
        ("rabenseifner", AlgoOpt::Rabenseifner),
    ] {
        let dest = world.alloc::<i64>(nreduce, 0);
        let psync = world.alloc_psync(psync_cells(algo, pe_size));
        let f = run_int_algo!(algo, OpOpt::Sum, i64, pe_size, source, dest, psync);
        drive(&world, |me_as| f(me_as, pe_size, &dest, &source, &psync))?;
        if !psync.all_quiescent() {
            bail!("{label}: pSync was not restored to quiescent");
        }
        results.push((label, dest.snapshot_own(0)));
    }

    let (first_label, first) = &results[0];
    for (label, got) in &results[1..] {
        if got != first {
            bail!("{first_label} and {label} disagree: {first:?} vs {got:?}");
        }
    }
    println!("OK: all four algorithms agree over {pe_size} PEs x {nreduce} elements: {first:?}");
    let _ = p2s_size;
    Ok(())
}
