use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use phase_engine::logging::{LoggingConfig, init_logging};
use phase_mesh::codec::try_decode;
use phase_mesh::factory::{create_color_stop, reselect_colors};
use phase_mesh::limits::{DEFAULT_INTENSITY, INTENSITY_RANGE, MAX_COLOR_STOPS};
use phase_mesh::model::parse_hex_color;
use phase_mesh::validate::validate_config;
use phase_mesh::{BlendMode, ExportSize, Gradient, GradientConfig, GradientPatch};
use phase_studio::export::{ExportOptions, Exporter};
use phase_studio::persist::FileStore;
use phase_studio::share::{PageLocation, SystemClipboard};
use phase_studio::{GradientStore, ImportResolution, ImportStatus, StudioConfig};

#[derive(Parser)]
#[command(name = "phase-shift")]
#[command(about = "Create, share and export mesh gradients")]
#[command(after_help = "Examples:
  phase-shift add --color '#FF6B6B' --color '#4ECDC4' --blend screen
  phase-shift share --copy
  phase-shift import 'https://example.com/?gradients=W3siY29...' --resolve merge
  phase-shift export <ID> --size 1024 --circle")]
#[command(version)]
struct Cli {
    /// Use project-local state directory (.phase-shift) instead of the user data directory
    #[arg(long, global = true)]
    local_state: bool,

    /// Page URL share links are built on
    #[arg(long, global = true)]
    page_url: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved gradients, newest first
    List,

    /// Create a gradient from one or more colors placed at random
    Add {
        /// Stop color as #RRGGBB (repeat for more stops)
        #[arg(short, long = "color", required = true)]
        colors: Vec<String>,

        /// Blend mode (see `blend-modes`)
        #[arg(short, long)]
        blend: Option<BlendMode>,

        /// Stop intensity, 10 to 100
        #[arg(short, long, default_value_t = DEFAULT_INTENSITY)]
        intensity: f64,
    },

    /// Change a gradient's blend mode or color selection
    Update {
        id: String,

        #[arg(short, long)]
        blend: Option<BlendMode>,

        /// New color selection; colors already present keep their stops
        #[arg(short, long = "color")]
        colors: Vec<String>,
    },

    /// Move one stop of a gradient (percent of the canvas, clamped to 0..100)
    Move {
        id: String,
        index: usize,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },

    /// Delete a gradient
    Delete { id: String },

    /// Delete every gradient
    Clear,

    /// Print a share link for the whole collection
    Share {
        /// Copy the link to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Import gradients from a share link or bare token
    Import {
        url_or_token: String,

        /// What to do with the new gradients; without it they are only listed
        #[arg(long, value_enum)]
        resolve: Option<Resolve>,
    },

    /// Decode a share token and print its gradients as JSON
    Decode { token: String },

    /// Render a gradient to PNG
    Export {
        id: String,

        /// Side length in pixels: 32, 64, 128, 256, 512, 1024 or 2048
        #[arg(short, long, value_parser = parse_size)]
        size: Option<ExportSize>,

        /// Mask to a circle with a transparent surround
        #[arg(long)]
        circle: bool,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// List the available blend modes
    BlendModes,
}

#[derive(Copy, Clone, ValueEnum)]
enum Resolve {
    Merge,
    Replace,
    Ignore,
}

impl From<Resolve> for ImportResolution {
    fn from(r: Resolve) -> Self {
        match r {
            Resolve::Merge => ImportResolution::Merge,
            Resolve::Replace => ImportResolution::Replace,
            Resolve::Ignore => ImportResolution::Ignore,
        }
    }
}

fn parse_size(s: &str) -> Result<ExportSize, String> {
    let px: u32 = s.trim_end_matches("px").parse().map_err(|e| format!("{e}"))?;
    ExportSize::try_from(px).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = match cli.verbose {
        0 => LoggingConfig::default(),
        1 => LoggingConfig::with_filter("info"),
        2 => LoggingConfig::with_filter("debug"),
        _ => LoggingConfig::with_filter("trace"),
    };
    init_logging(logging);

    let mut config = StudioConfig::from_env(cli.local_state)?;
    if let Some(url) = cli.page_url {
        config.page_url = url;
    }
    log::debug!("state directory: {}", config.state_dir.display());

    let location = match &cli.command {
        Commands::Import { url_or_token, .. } => import_location(&config.page_url, url_or_token),
        _ => PageLocation::parse(&config.page_url),
    };

    let (mut store, status) = GradientStore::open(FileStore::new(&config.state_dir), location, &config);
    let result = run(cli.command, &mut store, status, &config);

    if !store.flush() {
        log::warn!("latest changes could not be saved to {}", config.state_dir.display());
    }
    result
}

/// A full URL is used as is; a bare token is attached to the page URL.
fn import_location(page_url: &str, url_or_token: &str) -> PageLocation {
    if url_or_token.contains("://") {
        PageLocation::parse(url_or_token)
    } else {
        PageLocation::parse(&PageLocation::parse(page_url).with_token(url_or_token))
    }
}

fn run(command: Commands, store: &mut GradientStore<FileStore>, status: ImportStatus, config: &StudioConfig) -> Result<()> {
    if !matches!(command, Commands::Import { .. }) {
        report_startup_import(&status);
    }

    match command {
        Commands::List => {
            if store.gradients().is_empty() {
                println!("No gradients yet. Create one with `phase-shift add --color '#FF6B6B'`.");
            }
            for g in store.gradients() {
                print_gradient(g);
            }
        }

        Commands::Add { colors, blend, intensity } => {
            check_colors(&colors)?;
            if !INTENSITY_RANGE.contains(&intensity) {
                bail!("intensity must be between 10 and 100, got {intensity}");
            }
            let color_stops = colors.iter().map(|c| create_color_stop(c.as_str(), None, intensity)).collect();
            let gradient_config = GradientConfig { color_stops, blend_mode: Some(blend.unwrap_or_default()) };
            if !validate_config(&gradient_config) {
                bail!("gradient is out of range");
            }

            let g = store.add_gradient(gradient_config);
            println!("Gradient created!");
            print_gradient(&g);
        }

        Commands::Update { id, blend, colors } => {
            let current = store.get_gradient(&id).with_context(|| format!("no gradient with id {id}"))?;
            let mut patch = GradientPatch { blend_mode: blend, ..GradientPatch::default() };
            if !colors.is_empty() {
                check_colors(&colors)?;
                patch.color_stops = Some(reselect_colors(&current.color_stops, &colors));
            }
            if patch == GradientPatch::default() {
                bail!("nothing to update: pass --blend and/or --color");
            }

            store.update_gradient(&id, patch);
            println!("Gradient updated!");
            if let Some(g) = store.get_gradient(&id) {
                print_gradient(g);
            }
        }

        Commands::Move { id, index, x, y } => {
            if !store.reposition_stop(&id, index, x, y) {
                bail!("no stop {index} on gradient {id}");
            }
            if let Some(g) = store.get_gradient(&id) {
                print_gradient(g);
            }
        }

        Commands::Delete { id } => {
            if !store.delete_gradient(&id) {
                bail!("no gradient with id {id}");
            }
            println!("Deleted {id}");
        }

        Commands::Clear => {
            let n = store.gradients().len();
            store.clear_gradients();
            println!("Deleted {n} gradient(s)");
        }

        Commands::Share { copy } => {
            if copy {
                let url = store.copy_share_url(&mut SystemClipboard)?;
                println!("{url}");
                println!("Share link copied to clipboard");
            } else {
                println!("{}", store.share_url()?);
            }
        }

        Commands::Import { resolve, .. } => import(store, status, resolve)?,

        Commands::Decode { token } => {
            let gradients = try_decode(&token)?;
            let configs: Vec<GradientConfig> = gradients.iter().map(Gradient::to_config).collect();
            println!("{}", serde_json::to_string_pretty(&configs)?);
        }

        Commands::Export { id, size, circle, out } => {
            let g = store.get_gradient(&id).with_context(|| format!("no gradient with id {id}"))?;
            let options = ExportOptions { size: size.unwrap_or(config.default_export_size), circular: circle };
            let mut exporter = Exporter::new(out, config.min_export_interval);
            let path = exporter.export(g, options, Instant::now())?;
            println!("Exported {}", path.display());
        }

        Commands::BlendModes => {
            for mode in BlendMode::ALL {
                println!("{:<12} {:<20} {}", mode.as_str(), mode.label(), mode.description());
            }
        }
    }

    Ok(())
}

fn import(store: &mut GradientStore<FileStore>, status: ImportStatus, resolve: Option<Resolve>) -> Result<()> {
    match status {
        ImportStatus::None => bail!("no share token found"),
        ImportStatus::Rejected(e) => Err(e).context("Failed to load gradients"),
        ImportStatus::AllDuplicates => {
            println!("Every gradient in this link is already in your collection");
            Ok(())
        }
        ImportStatus::Pending(n) => {
            let Some(resolve) = resolve else {
                println!("{n} new gradient(s) in this link ({} saved):", store.gradients().len());
                for g in store.pending_import().unwrap_or_default() {
                    print_gradient(g);
                }
                println!("Re-run with --resolve merge|replace|ignore");
                return Ok(());
            };

            let taken = store.resolve_import(resolve.into());
            match resolve {
                Resolve::Merge => println!("Gradients merged! Added {taken} to your collection"),
                Resolve::Replace => println!("Gradients replaced! Loaded {taken} from shared link"),
                Resolve::Ignore => println!("Import cancelled. Kept your existing gradients"),
            }
            Ok(())
        }
    }
}

/// Mentions a share token that arrived through `--page-url`.
fn report_startup_import(status: &ImportStatus) {
    match status {
        ImportStatus::Pending(n) => {
            println!("Page URL carries {n} new gradient(s); use `phase-shift import` to take them in");
        }
        ImportStatus::Rejected(e) => log::warn!("ignoring share token on page URL: {e}"),
        ImportStatus::None | ImportStatus::AllDuplicates => {}
    }
}

fn check_colors(colors: &[String]) -> Result<()> {
    if colors.len() > MAX_COLOR_STOPS {
        bail!("at most {MAX_COLOR_STOPS} colors per gradient, got {}", colors.len());
    }
    if let Some(bad) = colors.iter().find(|c| parse_hex_color(c).is_none()) {
        bail!("invalid color {bad:?}, expected #RRGGBB");
    }
    Ok(())
}

fn print_gradient(g: &Gradient) {
    let colors: Vec<&str> = g.color_stops.iter().map(|s| s.color.as_str()).collect();
    let created = chrono::DateTime::from_timestamp_millis(g.created_at)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    println!("{}  {:<12} {:<16} {}", g.id(), g.effective_blend_mode().as_str(), created, colors.join(" "));
}
