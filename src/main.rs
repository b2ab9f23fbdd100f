use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use strictcmp::cases;
use strictcmp::comparator::{ComparisonFailure, FailureStyle, Registry};
use strictcmp::error_style::render_failure_box;
use strictcmp::kernel::{Value, config};

#[derive(Parser, Debug)]
#[command(name = "strictcmp", version, about = "Strict, coercion-free scalar equality")]
struct Cli {
    /// Directory searched for .strictcmp.toml (default: current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Failure shape: legacy | modern
    #[arg(long, global = true)]
    style: Option<FailureStyle>,

    #[arg(long, global = true)]
    no_color: bool,

    /// -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compare two values; values are JSON literals, anything else is a string
    Compare(CompareArgs),
    /// Print whether the strict comparator handles this pair
    Accepts { a: String, b: String },
    /// Run a YAML/JSON case file
    Run { file: PathBuf },
}

#[derive(Args, Debug)]
struct CompareArgs {
    expected: String,
    actual: String,
    #[arg(long)]
    delta: Option<f64>,
    #[arg(long)]
    ignore_case: bool,
    #[arg(long)]
    canonicalize: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let res = run(cli);
    if let Err(err) = &res {
        eprintln!("error: {err:#}");
    }
    ExitCode::from(exit_status(&res))
}

// 0 equal / all cases met, 1 mismatch, 2 anything that kept us from deciding
fn exit_status(res: &Result<bool>) -> u8 {
    match res {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

fn init_tracing(verbose: u8) {
    let from_env = std::env::var("STRICTCMP_LOG")
        .ok()
        .and_then(|s| s.parse::<Level>().ok());
    let level = match verbose {
        0 => from_env.unwrap_or(Level::WARN),
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging not initialised: {err}");
    }
}

fn run(cli: Cli) -> Result<bool> {
    let root = match cli.root {
        Some(r) => r,
        None => std::env::current_dir()?,
    };
    let mut cfg = config::load(Some(&root));
    if let Some(style) = cli.style {
        cfg.failure_style = style;
    }
    if cli.no_color {
        cfg.color = false;
    }

    match cli.cmd {
        Cmd::Compare(args) => {
            let reg = Registry::bootstrap(&cfg);
            let expected = Value::parse_literal(&args.expected)?;
            let actual = Value::parse_literal(&args.actual)?;
            let mut opts = reg.defaults();
            if let Some(d) = args.delta {
                if !d.is_finite() || d < 0.0 {
                    bail!("--delta must be a non-negative number, got {d}");
                }
                opts.delta = d;
            }
            opts.ignore_case |= args.ignore_case;
            opts.canonicalize |= args.canonicalize;

            match reg.assert_equals_with(&expected, &actual, &opts) {
                Ok(()) => {
                    println!("equal");
                    Ok(true)
                }
                Err(err) => match err.downcast::<ComparisonFailure>() {
                    Ok(failure) => {
                        println!("{}", render_failure_box(&failure, cfg.color));
                        Ok(false)
                    }
                    Err(other) => Err(other),
                },
            }
        }
        Cmd::Accepts { a, b } => {
            let reg = Registry::bootstrap(&cfg);
            let a = Value::parse_literal(&a)?;
            let b = Value::parse_literal(&b)?;
            println!("{}", reg.comparator_for(&a, &b).is_ok());
            Ok(true)
        }
        Cmd::Run { file } => {
            let reg = Registry::bootstrap(&cfg);
            let list = cases::load(&file)?;
            if list.is_empty() {
                return Err(anyhow!("{} contains no cases", file.display()));
            }
            let reports = cases::run_cases(&reg, &list);
            let mut missed = 0usize;
            for r in &reports {
                if r.passed() {
                    println!("✔ {}", r.name);
                    continue;
                }
                missed += 1;
                println!("✘ {} (expected {:?})", r.name, r.expect);
                if let Some(e) = &r.error {
                    println!("    {e}");
                } else if let Some(f) = &r.failure {
                    println!("{}", render_failure_box(f, cfg.color));
                } else {
                    println!("    values compared equal");
                }
            }
            println!("{} cases, {} passed, {} missed", reports.len(), reports.len() - missed, missed);
            Ok(missed == 0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn exec(root: &Path, args: &[&str]) -> u8 {
        let root = root.to_string_lossy().into_owned();
        let mut argv = vec!["strictcmp", "--root", root.as_str(), "--no-color"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).expect("valid command line");
        exit_status(&run(cli))
    }

    fn pinned_root() -> Result<tempfile::TempDir> {
        let dir = tempfile::tempdir()?;
        // keeps the user config file out of the picture
        fs::write(dir.path().join(".strictcmp.toml"), "[compare]\ndelta = 0\n")?;
        Ok(dir)
    }

    #[test]
    fn second_logger_install_is_reported_not_fatal() {
        init_tracing(0);
        init_tracing(2);
        assert!(tracing::dispatcher::has_been_set());
    }

    #[test]
    fn compare_exit_codes() -> Result<()> {
        let dir = pinned_root()?;
        assert_eq!(exec(dir.path(), &["compare", "\"foo\"", "\"foo\""]), 0);
        assert_eq!(exec(dir.path(), &["compare", "\"foo\"", "\"bar\""]), 1);
        assert_eq!(exec(dir.path(), &["compare", "\"0\"", "0"]), 1);
        assert_eq!(exec(dir.path(), &["compare", "12", "14", "--delta", "2"]), 0);
        assert_eq!(exec(dir.path(), &["compare", "FOO", "foo", "--ignore-case"]), 0);
        assert_eq!(exec(dir.path(), &["compare", "1", "1", "--delta=-1"]), 2);
        assert_eq!(exec(dir.path(), &["compare", "[]", "[]"]), 2);
        Ok(())
    }

    #[test]
    fn accepts_always_succeeds() -> Result<()> {
        let dir = pinned_root()?;
        assert_eq!(exec(dir.path(), &["accepts", "1", "true"]), 0);
        assert_eq!(exec(dir.path(), &["accepts", "[1]", "1"]), 0);
        Ok(())
    }

    #[test]
    fn run_exit_codes() -> Result<()> {
        let dir = pinned_root()?;
        let good = dir.path().join("good.yaml");
        fs::write(&good, "- name: strict\n  expected: \"0\"\n  actual: 0\n  expect: unequal\n")?;
        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"[{"name": "coerced", "expected": "0", "actual": 0}]"#)?;
        let empty = dir.path().join("empty.json");
        fs::write(&empty, "[]")?;

        assert_eq!(exec(dir.path(), &["run", good.to_str().expect("utf-8 path")]), 0);
        assert_eq!(exec(dir.path(), &["run", bad.to_str().expect("utf-8 path")]), 1);
        assert_eq!(exec(dir.path(), &["run", empty.to_str().expect("utf-8 path")]), 2);
        Ok(())
    }
}
