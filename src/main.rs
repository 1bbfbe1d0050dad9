use anyhow::Result;
use asciigen_installer::commands::{self, Config, InstallOptions};
use asciigen_installer::platform::Platform;
use asciigen_installer::runtime::RealRuntime;
use clap::Parser;
use std::path::PathBuf;

/// asciigen-installer - install prebuilt asciigen binaries
///
/// Picks the release archive for this OS and CPU, verifies its SHA-256,
/// installs the `asciigen` executable and checks that it runs.
///
/// Examples:
///   asciigen-installer install            # Install the formula's version into ~/.local/bin
///   asciigen-installer install 1.0.0 -b /usr/local/bin
///   asciigen-installer resolve --os linux --arch arm64
#[derive(Parser, Debug)]
#[command(author, version = env!("ASCIIGEN_INSTALLER_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON formula file to use instead of the built-in one
    #[arg(
        long = "formula",
        short = 'f',
        env = commands::FORMULA_ENV,
        value_name = "FILE",
        global = true
    )]
    pub formula: Option<PathBuf>,

    /// Override the detected operating system (macos, linux)
    #[arg(long = "os", value_name = "OS", global = true)]
    pub os: Option<String>,

    /// Override the detected CPU architecture (arm64, x86_64)
    #[arg(long = "arch", value_name = "ARCH", global = true)]
    pub arch: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Download, verify and install the binary, then smoke test it
    Install(InstallArgs),

    /// Show the release that would be installed, without downloading it
    Resolve(InstallArgs),

    /// Check that the installed binary answers --version
    Test(TestArgs),

    /// Show formula metadata and the release table
    Info,
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Release version to install (defaults to the formula's version)
    #[arg(value_name = "VERSION")]
    pub version: Option<String>,

    /// Directory to install the executable into (also via ASCIIGEN_BIN_DIR)
    #[arg(
        long = "bin-dir",
        short = 'b',
        env = asciigen_installer::install::BIN_DIR_ENV,
        value_name = "DIR"
    )]
    pub bin_dir: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct TestArgs {
    /// Directory holding the installed executable (also via ASCIIGEN_BIN_DIR)
    #[arg(
        long = "bin-dir",
        short = 'b',
        env = asciigen_installer::install::BIN_DIR_ENV,
        value_name = "DIR"
    )]
    pub bin_dir: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;
    let platform = Platform::detect().with_overrides(cli.os, cli.arch);
    let config = Config::new(&runtime, cli.formula)?;

    match cli.command {
        Commands::Install(args) => {
            commands::install(runtime, config, install_options(platform, args)).await?
        }
        Commands::Resolve(args) => {
            commands::resolve(runtime, config, install_options(platform, args))?
        }
        Commands::Test(args) => {
            commands::verify_installed(runtime, config, args.bin_dir).await?
        }
        Commands::Info => commands::info(&config),
    }
    Ok(())
}

fn install_options(platform: Platform, args: InstallArgs) -> InstallOptions {
    InstallOptions {
        platform,
        version: args.version,
        bin_dir: args.bin_dir,
    }
}
