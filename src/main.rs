use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use uuid::Uuid;

use shelf_swipe::{
    config::Config,
    db::{
        self, ExclusionStore, LibraryFlag, LibraryRepository, PreferencesRepository,
        RedisExclusionStore,
    },
    models::{
        library_item::sort_library, FetchOptions, LibraryUpdate, NewLibraryItem, PreferenceSet,
        SortMode,
    },
    services::{covers, CatalogProvider, DiscoverFeed, GoogleBooksProvider, RecommendationFetcher},
    telemetry,
};

/// Book discovery from the command line
#[derive(Parser, Debug)]
#[command(name = "shelf-swipe", version, about)]
struct Cli {
    /// Id of the signed-in user
    #[arg(long, global = true)]
    user: Option<Uuid>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch recommendations for the user's preferences
    Discover(DiscoverArgs),
    /// Exclude a volume from future recommendations
    Dismiss { volume_id: String },
    /// Show one volume with its resolved cover
    Book { volume_id: String },
    /// Manage the personal library
    #[command(subcommand)]
    Library(LibraryCommand),
    /// Show the stored preferences
    Preferences,
}

#[derive(Args, Debug)]
struct DiscoverArgs {
    #[arg(long = "genre")]
    genres: Vec<String>,
    #[arg(long = "mood")]
    moods: Vec<String>,
    #[arg(long = "trope")]
    tropes: Vec<String>,
    #[arg(long)]
    representation: Vec<String>,
    #[arg(long = "author")]
    authors: Vec<String>,
    #[arg(long = "format")]
    formats: Vec<String>,

    /// Catalog offset used for every genre
    #[arg(long)]
    start_index: Option<u32>,
    /// Sample a random catalog page per genre
    #[arg(long)]
    randomize: bool,
    #[arg(long)]
    max_results: Option<u32>,
    /// Number of extra randomized batches to load
    #[arg(long, default_value_t = 0)]
    more: u32,
    /// Store the given preferences for the user
    #[arg(long)]
    save: bool,
}

impl DiscoverArgs {
    fn preferences(&self) -> Option<PreferenceSet> {
        let prefs = PreferenceSet {
            genres: dedup(&self.genres),
            moods: dedup(&self.moods),
            tropes: dedup(&self.tropes),
            representation: dedup(&self.representation),
            authors: dedup(&self.authors),
            formats: dedup(&self.formats),
        };
        (prefs != PreferenceSet::default()).then_some(prefs)
    }
}

fn dedup(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(value) {
            out.push(value.clone());
        }
    }
    out
}

#[derive(Subcommand, Debug)]
enum LibraryCommand {
    /// List saved books
    List {
        #[arg(long, value_enum, default_value_t = SortArg::None)]
        sort: SortArg,
    },
    /// Save a catalog volume
    Add { volume_id: String },
    /// Toggle the favourite flag
    Favorite { item_id: Uuid },
    /// Toggle the has-read flag
    Read { item_id: Uuid },
    /// Set status flags explicitly
    Mark {
        item_id: Uuid,
        #[arg(long)]
        favorite: Option<bool>,
        #[arg(long)]
        read: Option<bool>,
    },
    /// Remove a saved book
    Remove { item_id: Uuid },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    None,
    Alpha,
    Favorites,
    HasRead,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::None => SortMode::None,
            SortArg::Alpha => SortMode::Alpha,
            SortArg::Favorites => SortMode::Favorites,
            SortArg::HasRead => SortMode::HasRead,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn require_user(user: Option<Uuid>) -> anyhow::Result<Uuid> {
    user.ok_or_else(|| anyhow::anyhow!("--user is required for this command"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    telemetry::init_tracing(&config.log_format);

    let catalog: Arc<dyn CatalogProvider> = Arc::new(GoogleBooksProvider::from_config(&config));

    match cli.command {
        Command::Discover(args) => discover(&config, catalog, require_user(cli.user)?, args).await,
        Command::Dismiss { volume_id } => {
            let user_id = require_user(cli.user)?;
            let store = RedisExclusionStore::new(db::create_redis_client(&config.redis_url)?);
            store.add(user_id, &volume_id).await?;
            tracing::info!(user_id = %user_id, volume_id = %volume_id, "Volume dismissed");
            Ok(())
        }
        Command::Book { volume_id } => {
            let item = catalog.fetch_by_id(&volume_id).await?;
            print_json(&serde_json::json!({
                "cover": covers::resolve_cover(&item, &config.cover_api_url),
                "volume": item,
            }))
        }
        Command::Library(command) => library(&config, catalog, require_user(cli.user)?, command).await,
        Command::Preferences => {
            let user_id = require_user(cli.user)?;
            let pool = db::create_pool(&config.database_url).await?;
            db::run_migrations(&pool).await?;
            let prefs = PreferencesRepository::new(pool)
                .get_user_preferences(user_id)
                .await?;
            print_json(&prefs)
        }
    }
}

async fn discover(
    config: &Config,
    catalog: Arc<dyn CatalogProvider>,
    user_id: Uuid,
    args: DiscoverArgs,
) -> anyhow::Result<()> {
    let preferences = match args.preferences() {
        Some(prefs) if !args.save => prefs,
        given => {
            let pool = db::create_pool(&config.database_url).await?;
            db::run_migrations(&pool).await?;
            let repo = PreferencesRepository::new(pool);
            match given {
                Some(prefs) => {
                    repo.upsert_user_preferences(user_id, &prefs).await?;
                    prefs
                }
                None => repo.get_user_preferences(user_id).await?.unwrap_or_default(),
            }
        }
    };

    if !preferences.has_genre() {
        tracing::warn!("No genre selected; pick at least one with --genre");
    }

    let mut options = FetchOptions::default()
        .with_max_results(args.max_results.unwrap_or(config.max_results_per_genre));
    if let Some(start) = args.start_index {
        options = options.with_start_index(start);
    }
    if args.randomize {
        options = options.randomized();
    }

    let exclusions = Arc::new(RedisExclusionStore::new(db::create_redis_client(
        &config.redis_url,
    )?));
    let mut feed = DiscoverFeed::new(
        RecommendationFetcher::new(catalog),
        exclusions,
        user_id,
        preferences,
        options,
    );

    feed.load_initial().await?;
    for _ in 0..args.more {
        feed.load_more().await?;
    }

    print_json(&feed.items())
}

async fn library(
    config: &Config,
    catalog: Arc<dyn CatalogProvider>,
    user_id: Uuid,
    command: LibraryCommand,
) -> anyhow::Result<()> {
    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    let repo = LibraryRepository::new(pool.clone());

    match command {
        LibraryCommand::List { sort } => {
            let mut items = repo.get_library(user_id).await?;
            sort_library(&mut items, sort.into());
            print_json(&items)
        }
        LibraryCommand::Add { volume_id } => {
            if repo.is_book_in_library(user_id, &volume_id).await? {
                println!("This book has already been saved.");
                return Ok(());
            }
            let item = catalog.fetch_by_id(&volume_id).await?;
            let prefs = PreferencesRepository::new(pool)
                .get_user_preferences(user_id)
                .await?
                .unwrap_or_default();
            let new_item = NewLibraryItem::from_catalog(user_id, &item, &config.cover_api_url)?
                .with_tags(&prefs);
            print_json(&repo.add_to_library(&new_item).await?)
        }
        LibraryCommand::Favorite { item_id } => {
            print_json(&repo.toggle_flag(item_id, LibraryFlag::Favorite).await?)
        }
        LibraryCommand::Read { item_id } => {
            print_json(&repo.toggle_flag(item_id, LibraryFlag::HasRead).await?)
        }
        LibraryCommand::Mark {
            item_id,
            favorite,
            read,
        } => {
            let update = LibraryUpdate {
                is_favorite: favorite,
                has_read: read,
            };
            print_json(&repo.update_library_item(item_id, update).await?)
        }
        LibraryCommand::Remove { item_id } => {
            repo.delete_library_item(item_id).await?;
            Ok(())
        }
    }
}
