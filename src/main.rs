//! Command-line runner: `gridmul <N> <P> <Q> <ITERATIONS>`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use gridmul::persist::{output_path, save};
use gridmul::{CancelToken, Matrix, RunConfig, matmul_naive_repeated, run_with};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Init {
    /// A = 1, B = 2
    Constant,
    /// Uniform in [0, 1), seeded
    Random,
}

#[derive(Debug, Parser)]
#[command(name = "gridmul", version, about = "Repeated A <- A*B on a P x Q thread grid")]
struct Cli {
    /// Matrix dimension N
    #[arg(env = "GRIDMUL_N")]
    n: usize,

    /// Grid rows P
    #[arg(env = "GRIDMUL_P")]
    p: usize,

    /// Grid columns Q
    #[arg(env = "GRIDMUL_Q")]
    q: usize,

    /// Number of A <- A*B phases
    #[arg(env = "GRIDMUL_ITERATIONS")]
    iterations: usize,

    #[arg(long, value_enum, default_value = "constant")]
    init: Init,

    /// Seed for --init random
    #[arg(long, default_value_t = 123456)]
    seed: u64,

    /// Write the result to <OUTPUT>.<N>.<ITERATIONS>.<P*Q>.txt
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Print A, B and C after the run
    #[arg(long)]
    print: bool,

    /// Recompute sequentially and compare bit for bit
    #[arg(long)]
    verify: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridmul=info")),
        )
        .init();

    let cli = Cli::parse();
    match execute(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when `--verify` finds a mismatch.
fn execute(cli: &Cli) -> gridmul::Result<bool> {
    let config = RunConfig::new(cli.n, cli.p, cli.q, cli.iterations)?;
    let n = config.n();

    let (mut a, b) = match cli.init {
        Init::Constant => (Matrix::filled(n, 1.0), Matrix::filled(n, 2.0)),
        Init::Random => (Matrix::random(n, cli.seed), Matrix::random(n, cli.seed.wrapping_add(1))),
    };
    let mut c = Matrix::zeros(n);
    let a_initial = cli.verify.then(|| a.clone());

    let report = run_with(
        a.as_mut_slice(),
        b.as_slice(),
        c.as_mut_slice(),
        &config,
        &CancelToken::new(),
    )?;

    if cli.print {
        for (name, m) in [("A", &a), ("B", &b), ("C", &c)] {
            println!("{}:", name);
            for row in m.rows() {
                let line: Vec<String> = row.iter().map(|x| format!("{:.6}", x)).collect();
                println!("{}", line.join(" "));
            }
            println!();
        }
    }

    if let Some(prefix) = &cli.output {
        save(&output_path(prefix, n, config.iterations(), config.grid().workers()), &a)?;
    }

    println!(
        "Time taken for size {} = {:.6} seconds",
        n,
        report.elapsed.as_secs_f64()
    );

    let Some(mut expected) = a_initial else {
        return Ok(true);
    };
    let mut scratch = Matrix::zeros(n);
    matmul_naive_repeated(
        expected.as_mut_slice(),
        b.as_slice(),
        scratch.as_mut_slice(),
        n,
        config.iterations(),
    );
    let matches = expected.bit_eq(&a);
    println!(
        "Verify: {}",
        if matches { "bit-identical to sequential" } else { "MISMATCH" }
    );
    Ok(matches)
}
