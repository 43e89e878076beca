use clap::{Parser, Subcommand};
use env_logger::Env;
use mailarc::{config, generate, output};
use std::path::PathBuf;

/// Flags for the build command.
#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Rewrite every article page, even unchanged ones
    #[arg(long)]
    force: bool,

    /// Neither read nor save the incremental store
    #[arg(long)]
    no_store: bool,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "mailarc")]
#[command(about = "Static HTML renderer for mailing list archives")]
#[command(long_about = "\
Static HTML renderer for mailing list archives

Reads the parsed archive (archive.json) from the source directory and
writes one page per message plus date, thread, subject, author and
attachment indices. Re-running only rewrites what changed.

Source structure:

  archive/
  ├── archive.json     # Parsed messages, reply links, threads, folders
  └── config.toml      # Rendering options (optional)

Output structure:

  dist/
  ├── index.html       # Default index, or the list of folders
  ├── date.html ...    # Other indices
  ├── 0000.html ...    # One page per message
  └── 2024/05/         # Per-folder pages when the archive is split by date

Run 'mailarc gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory holding archive.json and config.toml
    #[arg(long, default_value = "archive", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the archive into the output directory
    Build(BuildArgs),
    /// Validate archive.json and config.toml without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Build(args) => {
            let config = config::load_config(&cli.source)?;
            println!("==> Reading {}", cli.source.join(generate::INPUT_FILE).display());
            let archive = generate::load_archive(&cli.source)?;
            println!("==> Rendering {} messages \u{2192} {}", archive.len(), cli.output.display());
            let options = generate::Options {
                force: args.force,
                use_store: !args.no_store,
            };
            let report = generate::generate(&archive, &config, &cli.output, options)?;
            output::print_generate_output(&report, &config);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let config = config::load_config(&cli.source)?;
            let archive = generate::load_archive(&cli.source)?;
            let has_config_file = cli.source.join("config.toml").is_file();
            output::print_check_output(&archive, &config, has_config_file);
            println!("==> Archive is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
