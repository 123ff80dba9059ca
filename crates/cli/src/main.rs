mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{BuildArgs, PackageArgs, cmd_build, cmd_configure, cmd_info, cmd_metadata, cmd_package, cmd_resolve};
use output::{OutputFormat, print_error};

/// ogrepkg - build configuration and packaging for OGRE
#[derive(Parser)]
#[command(name = "ogrepkg")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  format: OutputFormat,

  #[command(flatten)]
  profile: ProfileArgs,

  #[command(subcommand)]
  command: Commands,
}

/// Where settings and options come from.
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
  /// Profile file (TOML) with [settings], [options] and [recipe] tables
  #[arg(short, long, global = true, env = "OGREPKG_PROFILE")]
  pub profile: Option<PathBuf>,

  /// Platform setting override, e.g. -s os=Linux -s build_type=Debug
  #[arg(short = 's', long = "setting", global = true, value_name = "KEY=VALUE")]
  pub settings: Vec<String>,

  /// Option override, e.g. -o shared=False -o hlms_type=mobile
  #[arg(short = 'o', long = "option", global = true, value_name = "KEY=VALUE")]
  pub options: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
  /// Show the recipe and the target platform
  Info,

  /// Resolve options and list dependencies
  Resolve,

  /// Print the native build configuration
  Configure,

  /// Print consumer link metadata
  Metadata,

  /// Collect an existing install tree into a package
  Package(PackageArgs),

  /// Fetch, patch, build and package
  Build(BuildArgs),
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let profile = cmd::load_profile(&cli.profile)?;
  match cli.command {
    Commands::Info => cmd_info(&profile, cli.format),
    Commands::Resolve => cmd_resolve(&profile, cli.format),
    Commands::Configure => cmd_configure(&profile, cli.format),
    Commands::Metadata => cmd_metadata(&profile, cli.format),
    Commands::Package(args) => cmd_package(&profile, &args, cli.format),
    Commands::Build(args) => cmd_build(&profile, &args, cli.format),
  }
}
