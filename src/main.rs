use clap::{Parser, Subcommand};
use covercard::cache::ImageCache;
use covercard::catalog::CatalogClient;
use covercard::compose::{self, ComposeOptions};
use covercard::config::{self, AppConfig};
use covercard::history::History;
use covercard::imaging::{FontSet, HttpSource};
use covercard::output;
use covercard::resolution::ResolutionRequest;
use covercard::selection;
use covercard::types::ItemType;
use std::path::{Path, PathBuf};

/// Target size flags shared by `compose` and `layout`.
#[derive(clap::Args, Clone)]
struct SizeArgs {
    /// Preset name (square, portrait, story, landscape, poster) or WxH
    #[arg(long)]
    preset: Option<String>,

    /// Custom width in pixels; overrides the preset's width when positive
    #[arg(long)]
    width: Option<String>,

    /// Custom height in pixels; overrides the preset's height when positive
    #[arg(long)]
    height: Option<String>,

    /// Bypass the downloaded-image cache
    #[arg(long)]
    no_cache: bool,
}

impl SizeArgs {
    fn request(&self, config: &AppConfig) -> ResolutionRequest {
        ResolutionRequest {
            preset: self
                .preset
                .clone()
                .unwrap_or_else(|| config.output.resolution.clone()),
            custom_width: self.width.clone(),
            custom_height: self.height.clone(),
        }
    }
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
#[command(name = "covercard")]
#[command(about = "Turn a catalog item into a cover + scannable code + QR composite")]
#[command(long_about = "\
Turn a catalog item into a cover + scannable code + QR composite

Workflow:

  covercard search blue --type album      # numbered results
  covercard select 1                      # pick one
  covercard compose --preset story        # write spotify-album-<id>.png

Layout (top to bottom, left edges shared):

  ┌──────────────────────┐
  │      ┌────────┐      │
  │      │ cover  │      │   square, centered
  │      └────────┘      │
  │      ▮▮▮▮ code ▮▮▮▮  │   keeps its aspect ratio
  │      ┌──┐ Title      │
  │      │QR│ Subtitle   │   shrinks to fit, never below 48px
  │      └──┘            │
  └──────────────────────┘

The search endpoint needs a bearer token in $COVERCARD_TOKEN
(configurable via catalog.token_env).

Run 'covercard gen-config' to generate a documented covercard.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (optional; missing means defaults)
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Override the state directory from the config
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the catalog and remember the results
    Search {
        /// Free-text query
        #[arg(required = true)]
        query: Vec<String>,

        /// Restrict to types (comma-separated: album,artist,playlist,track)
        #[arg(long = "type", value_delimiter = ',')]
        types: Vec<ItemType>,
    },
    /// Select result N (1-based) of the last search; without N, show the selection
    Select { index: Option<usize> },
    /// Render the selected item as a PNG composite
    Compose {
        #[command(flatten)]
        size: SizeArgs,

        /// Output file (default: <output.directory>/<prefix>-<type>-<id>.png)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the computed draw plan for the selection as JSON
    Layout {
        #[command(flatten)]
        size: SizeArgs,
    },
    /// Show recent searches
    History {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },
    /// List output size presets
    Presets,
    /// Delete downloaded cover and code images
    CleanCache,
    /// Print a stock covercard.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.config)?;
    let state_dir = cli.state_dir.clone().unwrap_or_else(|| config.state_dir());

    match cli.command {
        Command::Search { query, types } => {
            let query = query.join(" ");
            let types = if types.is_empty() {
                config.catalog.default_types.clone()
            } else {
                types
            };
            let client = CatalogClient::from_env(&config.catalog, &config.code, &config.network)?;
            let response = client.search(&query, &types)?;
            selection::save_results(&state_dir, &response)?;

            let mut history = History::in_state_dir(&state_dir, config.history.max_entries)?;
            history.record(&response.query);
            history.save()?;

            output::print_search_results(&response);
        }
        Command::Select { index: Some(index) } => {
            let item = selection::select(&state_dir, index)?;
            output::print_selection(Some(&item));
        }
        Command::Select { index: None } => {
            let item = selection::load_selection(&state_dir)?;
            output::print_selection(item.as_ref());
        }
        Command::Compose { size, out } => {
            let item = selection::load_selection(&state_dir)?;
            let source = image_source(&config, &state_dir, size.no_cache)?;
            let fonts = FontSet::load(&config.fonts);
            let composite = compose::compose(
                item.as_ref(),
                &size.request(&config),
                &source,
                &fonts,
                &ComposeOptions::from_config(&config),
            )?;

            let path = out.unwrap_or_else(|| {
                Path::new(&config.output.directory).join(&composite.file_name)
            });
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &composite.png)?;
            output::print_composite(&composite, &path);
        }
        Command::Layout { size } => {
            let item = selection::load_selection(&state_dir)?;
            let source = image_source(&config, &state_dir, size.no_cache)?;
            let planned = compose::plan_composite(
                item.as_ref(),
                &size.request(&config),
                &source,
                &ComposeOptions::from_config(&config),
            )?;
            println!("{}", serde_json::to_string_pretty(&planned.plan)?);
        }
        Command::History { clear } => {
            let mut history = History::in_state_dir(&state_dir, config.history.max_entries)?;
            if clear {
                history.clear();
                history.save()?;
            }
            output::print_history(history.entries());
        }
        Command::Presets => {
            output::print_presets(&config.output.resolution);
        }
        Command::CleanCache => {
            let cache = ImageCache::in_state_dir(&state_dir);
            let removed = cache.clear()?;
            println!("Removed {} cached image(s) from {}", removed, cache.dir().display());
        }
        // Printed before config loading so a broken config can be regenerated
        Command::GenConfig => {}
    }

    Ok(())
}

/// Route tracing output to stderr so stdout stays clean for results and JSON.
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// HTTP loader, with the on-disk cache unless disabled in config or by flag.
fn image_source(
    config: &AppConfig,
    state_dir: &Path,
    no_cache: bool,
) -> Result<HttpSource, Box<dyn std::error::Error>> {
    let cache = (config.network.cache && !no_cache).then(|| ImageCache::in_state_dir(state_dir));
    Ok(HttpSource::new(&config.network, cache)?)
}
