use anyhow::Context;
use clap::{Parser, Subcommand};
use crown_meta::api::client::RiotApiClient;
use crown_meta::api::DEFAULT_MATCH_COUNT;
use crown_meta::config::{Config, Server};
use crown_meta::display::output::{
    display_collection_summary, display_error, display_info, display_rankings, display_success,
    display_warning, skipped_players_notice,
};
use crown_meta::pipeline::{CollectOptions, Collector, DEFAULT_PLAYER_COUNT, MAX_MATCH_COUNT};
use crown_meta::preferences::{PreferenceStore, Preferences};
use crown_meta::snapshot::SnapshotStore;
use crown_meta::view::{apply_filter, sorted_results, RoleFilter, ViewFilter};
use crown_meta::AppError;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_DIR: &str = "public/snapshots";

#[derive(Parser, Debug)]
#[command(name = "Crown Meta")]
#[command(about = "Most played champions of the top ranked players, by role", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect recent ranked games of the top players and write a snapshot
    Collect {
        /// Server to read the ladder from (default: RIOT_SERVER or euw)
        #[arg(short, long)]
        server: Option<Server>,

        /// Number of top players to analyze
        #[arg(short, long, default_value_t = DEFAULT_PLAYER_COUNT)]
        players: usize,

        /// Recent ranked games per player (max: 100)
        #[arg(short, long, default_value_t = DEFAULT_MATCH_COUNT)]
        matches: usize,

        /// Root directory for snapshots (one subdirectory per server)
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
    },

    /// Show the latest snapshot as a ranked table
    Show {
        /// Server whose snapshots to read (default: last used)
        #[arg(short, long)]
        server: Option<Server>,

        /// Role filter: all, top, jungle, mid, adc, support (default: last used)
        #[arg(short, long)]
        role: Option<RoleFilter>,

        /// Case-insensitive champion name search
        #[arg(long, default_value = "")]
        search: String,

        /// Maximum rows to print
        #[arg(short, long, default_value_t = 30)]
        limit: usize,

        /// Root directory for snapshots
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        match e.downcast_ref::<AppError>() {
            Some(app_error) if app_error.is_fatal() => {
                display_error(&format!("{:#}", e));
                eprintln!("   The API key looks invalid or expired. Check RIOT_API_KEY in your .env file.");
                eprintln!("   A new key can be generated at https://developer.riotgames.com/");
            }
            _ => display_error(&format!("{:#}", e)),
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Command::Collect {
            server,
            players,
            matches,
            output_dir,
        } => collect(server, players, matches, &output_dir),
        Command::Show {
            server,
            role,
            search,
            limit,
            output_dir,
        } => show(server, role, search, limit, &output_dir),
    }
}

fn collect(
    server: Option<Server>,
    players: usize,
    matches: usize,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(server) = server {
        config = config.with_server(server);
    }

    let options = CollectOptions {
        player_count: players,
        match_count: matches.clamp(1, MAX_MATCH_COUNT),
    };
    let store = SnapshotStore::new(output_dir.join(config.server.as_str()));

    display_info(&format!(
        "Analyzing the top {} players on {} ({} ranked games each)",
        options.player_count, config.server, options.match_count
    ));

    let client = RiotApiClient::new(config);
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .context("invalid progress template")?
            .progress_chars("=> "),
    );

    display_info("Fetching Challenger/Grandmaster/Master leaderboards...");
    let (report, path) = Collector::new(&client, options)
        .with_progress(progress)
        .run(&store)?;

    if report.players_failed > 0 {
        display_warning(&skipped_players_notice(report.players_failed));
    }
    display_collection_summary(&report);

    let sorted = sorted_results(&report.snapshot.results);
    let filter = ViewFilter::default();
    display_rankings(&apply_filter(&sorted, &filter), &filter, 20);

    display_success(&format!("Snapshot saved to {}", path.display()));
    Ok(())
}

fn show(
    server: Option<Server>,
    role: Option<RoleFilter>,
    search: String,
    limit: usize,
    output_dir: &Path,
) -> anyhow::Result<()> {
    let preference_store = PreferenceStore::default_location();
    let saved = preference_store.load();
    let preferences = Preferences {
        role: role.unwrap_or(saved.role),
        server: server.unwrap_or(saved.server),
    };

    let store = SnapshotStore::new(output_dir.join(preferences.server.as_str()));
    let Some(mut loaded) = store
        .load_recent()
        .with_context(|| format!("reading snapshots in {}", store.dir().display()))?
    else {
        display_warning(&format!(
            "No snapshot found in {}. Run `collect` first.",
            store.dir().display()
        ));
        return Ok(());
    };

    // Snapshots written before trends existed carry none.
    if loaded
        .current
        .results
        .iter()
        .all(|s| s.trend_percentage.is_none())
        && !loaded.history.is_empty()
    {
        crown_meta::analysis::ranking::attach_trends(&mut loaded.current.results, &loaded.history);
    }

    display_info(&format!(
        "Snapshot from {} ({} players analyzed, {} earlier snapshots)",
        loaded.current.timestamp.format("%Y-%m-%d %H:%M UTC"),
        loaded.current.total_players_analyzed,
        loaded.history.len()
    ));

    let filter = ViewFilter {
        role: preferences.role,
        search_query: search,
    };
    let sorted = sorted_results(&loaded.current.results);
    display_rankings(&apply_filter(&sorted, &filter), &filter, limit);

    if let Err(e) = preference_store.save(&preferences) {
        log::warn!("could not save preferences: {}", e);
    }
    Ok(())
}
