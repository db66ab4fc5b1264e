use anyhow::{
    Context,
    Result,
    ensure,
};
use clap::{
    Parser,
    Subcommand,
};
use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
    process::Command,
};
use wheel_core::{
    Wheel,
    fingerprint,
    load_slice,
};

const BUNDLED_OPTIONS: &str = "config/wheel-options.json";

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Prize wheel helper tasks (option checks, clippy, tests)",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a wheel option file and print how it resolves
    CheckOptions {
        /// Defaults to the bundled option asset
        path: Option<PathBuf>,
        /// Print the resolved options as JSON instead of the breakdown
        #[arg(long)]
        json: bool,
    },
    /// Run clippy for the entire workspace with warnings-as-errors
    Clippy,
    /// Run every test in the workspace, fixtures included
    Test,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = repo_root()?;

    match cli.command {
        Commands::CheckOptions { path, json } => {
            let path = path.unwrap_or_else(|| root.join(BUNDLED_OPTIONS));
            let wheel = check_options(&path)?;
            if json {
                let rendered = serde_json::to_string_pretty(wheel.options())
                    .context("failed to render resolved options")?;
                println!("{rendered}");
            } else {
                println!("{}", wheel.breakdown());
            }
        }
        Commands::Clippy => run_clippy(&root)?,
        Commands::Test => run_tests(&root)?,
    }

    Ok(())
}

fn repo_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask has no parent directory")
}

/// Resolves the option file exactly as the app would at startup.
fn check_options(path: &Path) -> Result<Wheel> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let wheel = load_slice(&bytes)
        .with_context(|| format!("{} is not a valid wheel configuration", path.display()))?;
    println!("Checked: {}", path.display());
    println!("Fingerprint: {}", fingerprint(&bytes));
    println!("Options: {}", wheel.len());
    Ok(wheel)
}

fn run_clippy(root: &Path) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("clippy")
        .arg("--workspace")
        .arg("--all-targets")
        .arg("--all-features")
        .arg("--")
        .arg("-D")
        .arg("warnings")
        .current_dir(root);
    run_command(cmd, "cargo clippy")?;
    Ok(())
}

fn run_tests(root: &Path) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("test")
        .arg("--workspace")
        .arg("--all-features")
        .current_dir(root);
    run_command(cmd, "cargo test --workspace")?;
    Ok(())
}

fn run_command(mut cmd: Command, label: &str) -> Result<()> {
    println!("Running: {label}");
    let status = cmd
        .status()
        .with_context(|| format!("failed to run {label}"))?;
    ensure!(status.success(), "{label} failed with status {status}");
    Ok(())
}
