/// Real TV - broadcast-style playlist generator
use clap::{Args, Parser, Subcommand};
use rtv_cli::{commands, BreakOptions, CliConfig, ExportFormat, Migration, RunOptions};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rtv")]
#[command(about = "Generate broadcast-style playlists from serialized shows", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "RTV_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the pool, playlists, cursors and recent runs
    Status,
    /// Generate without publishing or saving
    Preview(RunArgs),
    /// Generate, export, and advance cursors
    Generate {
        #[command(flatten)]
        run: RunArgs,
        /// Export file format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
    /// Rewrite an older state file in the current schema
    Migrate,
    /// Add a show, matching the name against the library
    AddShow {
        name: String,
        /// Premiere year, used for year-based ordering
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Remove a show from the pool and every playlist
    RemoveShow { name: String },
    /// Let a show take rotation turns again
    EnableShow { name: String },
    /// Keep a show out of rotation without losing its place
    DisableShow { name: String },
    /// Create a playlist from shows already in the pool
    CreatePlaylist {
        name: String,
        /// Member show, repeatable
        #[arg(short, long = "show")]
        shows: Vec<String>,
        /// Break style: single, block or disabled
        #[arg(long, default_value = "single")]
        breaks: String,
        /// Episodes between breaks
        #[arg(long, default_value_t = 1)]
        frequency: u32,
        /// Clips that must air before one may repeat
        #[arg(long, default_value_t = rtv_core::types::DEFAULT_MIN_GAP)]
        min_gap: usize,
        /// Minimum block length in seconds
        #[arg(long, default_value_t = 30)]
        block_min: u64,
        /// Maximum block length in seconds
        #[arg(long, default_value_t = 120)]
        block_max: u64,
        /// Episodes per generation
        #[arg(short, long)]
        episodes: Option<usize>,
        /// config_order, premiere_year, premiere_year_desc or alphabetical
        #[arg(long)]
        sort_by: Option<String>,
    },
    /// Delete a playlist and its cursors
    DeletePlaylist { name: String },
    /// Add a pool show to a playlist, starting at S01E01
    AddToPlaylist { playlist: String, show: String },
    /// Remove a show from a playlist, dropping its cursor
    RemoveFromPlaylist { playlist: String, show: String },
    /// Use a playlist when no name is given
    SetDefault { name: String },
    /// Add a clip category or change its weight
    AddCategory {
        name: String,
        /// Relative chance of drawing from this category
        #[arg(short, long, default_value_t = 1.0)]
        weight: f64,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Playlist name; the default playlist when omitted
    playlist: Option<String>,
    /// Number of episodes
    #[arg(short, long)]
    episodes: Option<usize>,
    /// Start every show over at S01E01
    #[arg(long)]
    from_start: bool,
    /// Seed for reproducible clip selection
    #[arg(long)]
    seed: Option<u64>,
}

impl From<RunArgs> for RunOptions {
    fn from(args: RunArgs) -> Self {
        Self {
            playlist: args.playlist,
            episodes: args.episodes,
            from_start: args.from_start,
            seed: args.seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Status => {
            let station = commands::status(&config)?;
            print!("{}", commands::format_status(&station));
        }
        Commands::Preview(run) => {
            let preview = commands::preview(&config, &run.into())?;
            for (i, row) in rtv_schedule::export_rows(&preview.items).iter().enumerate() {
                println!(
                    "{:>4}  {:<10} {:>6}  {}",
                    i + 1,
                    row.kind.as_str(),
                    row.duration,
                    row.title
                );
            }
            print!("{}", commands::format_report(&preview.report));
        }
        Commands::Generate { run, format } => {
            let published = commands::generate(&config, &run.into(), format)?;
            print!("{}", commands::format_report(&published.report));
            println!("Wrote {} items to {}", published.items, published.remote);
        }
        Commands::Migrate => match commands::migrate(&config)? {
            Migration::NoState => println!(
                "No state file at {}",
                config.paths.state_file.display()
            ),
            Migration::UpToDate => println!("State file is already current"),
            Migration::Migrated { from, backup } => println!(
                "Migrated from schema v{from}; previous file kept at {}",
                backup.display()
            ),
        },
        Commands::AddShow { name, year } => {
            let found = commands::add_show(&config, &name, year)?;
            println!(
                "Added '{}' (match confidence {:.0}%)",
                found.name,
                found.confidence * 100.0
            );
        }
        Commands::RemoveShow { name } => {
            let show = commands::remove_show(&config, &name)?;
            println!("Removed '{}'", show.name);
        }
        Commands::EnableShow { name } => {
            commands::set_enabled(&config, &name, true)?;
            println!("Enabled '{name}'");
        }
        Commands::DisableShow { name } => {
            commands::set_enabled(&config, &name, false)?;
            println!("Disabled '{name}'");
        }
        Commands::CreatePlaylist {
            name,
            shows,
            breaks,
            frequency,
            min_gap,
            block_min,
            block_max,
            episodes,
            sort_by,
        } => {
            let breaks = BreakOptions {
                style: breaks,
                frequency,
                min_gap,
                block_min,
                block_max,
            };
            commands::create_playlist(
                &config,
                &name,
                &shows,
                &breaks,
                episodes,
                sort_by.as_deref(),
            )?;
            println!("Created playlist '{name}'");
        }
        Commands::DeletePlaylist { name } => {
            let playlist = commands::delete_playlist(&config, &name)?;
            println!("Deleted playlist '{}'", playlist.name());
        }
        Commands::AddToPlaylist { playlist, show } => {
            commands::add_to_playlist(&config, &playlist, &show)?;
            println!("Added '{show}' to '{playlist}'");
        }
        Commands::RemoveFromPlaylist { playlist, show } => {
            commands::remove_from_playlist(&config, &playlist, &show)?;
            println!("Removed '{show}' from '{playlist}'");
        }
        Commands::SetDefault { name } => {
            commands::set_default(&config, &name)?;
            println!("Default playlist is now '{name}'");
        }
        Commands::AddCategory { name, weight } => {
            let category = commands::add_category(&config, &name, weight)?;
            println!("Category '{}' weighted {}", category.name, category.weight);
        }
    }

    Ok(())
}
