use clap::{Parser, Subcommand};
use snipsite::config::{self, BuildMode, Runtime};
use snipsite::{generate, output, schema};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snipsite")]
#[command(about = "Static renderer for snippet listing sites")]
#[command(long_about = "\
Static renderer for snippet listing sites

Reads a content manifest of pre-resolved listings and renders every
listing page to static HTML.

Inputs:

  content.json          # Listings with their preview items
  config.toml           # Site config (optional, see 'snipsite gen-config')
  assets/               # Static assets, copied to <output>/assets

Paginated listings render at <slug>/p/<n>/index.html; unpaginated ones
at <slug>/index.html. A sitemap.xml is written alongside.

Set SNIPSITE_LOG (e.g. SNIPSITE_LOG=debug) for diagnostic logging.")]
#[command(version)]
struct Cli {
    /// Content manifest
    #[arg(long, default_value = "content.json", global = true)]
    content: PathBuf,

    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Static assets directory
    #[arg(long, default_value = "assets", global = true)]
    assets: PathBuf,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for the environment signals in `[build]`.
#[derive(clap::Args, Clone)]
struct BuildArgs {
    /// Build mode (overrides build.mode)
    #[arg(long, value_enum)]
    mode: Option<BuildMode>,

    /// Runtime the head is rendered for (overrides build.runtime)
    #[arg(long, value_enum)]
    runtime: Option<Runtime>,

    /// Render as if cookie consent was already given
    #[arg(long)]
    accepts_cookies: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Render the site into the output directory
    Generate(BuildArgs),
    /// Validate the content manifest against the content schema
    Check,
    /// Print the content relationship schema as JSON
    Schema,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    match cli.command {
        Command::Generate(build_args) => {
            let mut site_config = config::load_config(&cli.config_dir)?;
            if let Some(mode) = build_args.mode {
                site_config.build.mode = mode;
            }
            if let Some(runtime) = build_args.runtime {
                site_config.build.runtime = runtime;
            }
            if build_args.accepts_cookies {
                site_config.build.accepts_cookies = true;
            }
            init_thread_pool(&site_config.processing);

            println!("==> Generating {} → {}", cli.content.display(), cli.output.display());
            let report = generate::generate(
                &cli.content,
                &cli.output,
                Some(cli.assets.as_path()),
                &site_config,
            )?;
            output::print_generate_output(&report);
        }
        Command::Check => {
            println!("==> Checking {}", cli.content.display());
            let site_config = config::load_config(&cli.config_dir)?;
            let (manifest, _) = generate::ContentManifest::load(&cli.content)?;
            let pages = generate::plan_pages(&manifest, site_config.listing.page_size);
            let graph = generate::build_graph(&manifest, &pages)?;
            output::print_check_output(&manifest, &graph, graph.schema());
            println!("==> Content is valid");
        }
        Command::Schema => {
            let schema = schema::web_data();
            schema.validate()?;
            println!("{}", schema.to_json()?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("SNIPSITE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| format!("failed to initialize tracing subscriber: {e}"))?;
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Never exceeds the number of available cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
