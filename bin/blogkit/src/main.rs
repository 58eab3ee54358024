//! blogkit CLI
//!
//! Generates a blog's sitemap.xml, robots.txt and Open Graph preview images.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};

/// Command-line interface for blogkit.
#[derive(Parser)]
#[command(
    name = "blogkit",
    version,
    about = "Build-time sitemap, robots.txt and preview image generator"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "blogkit.toml")]
    config: std::path::PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Write sitemap.xml, robots.txt and preview images
    Build {
        /// Output directory (overrides build.output_dir)
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },
    /// Serve the generated artifacts, rendering them per request
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value_t = 4321)]
        port: u16,
    },
    /// Validate configuration and posts without writing anything
    Check,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    blogkit::init_tracing(cli.verbose);

    match cli.command {
        Commands::Build { output } => {
            blogkit::cmd::build::run(&cli.config, output.as_deref())?;
        }
        Commands::Serve { host, port } => {
            let runtime = tokio::runtime::Runtime::new().wrap_err("Failed to start runtime")?;
            runtime.block_on(blogkit::cmd::serve::run(&cli.config, &host, port))?;
        }
        Commands::Check => {
            blogkit::cmd::check::run(&cli.config)?;
        }
    }

    Ok(())
}
