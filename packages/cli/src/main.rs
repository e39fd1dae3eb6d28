// Terminal frontend for the Yorumator review backend

use std::path::PathBuf;

use api::{Client, HttpTransport};
use clap::{Parser, Subcommand, ValueEnum};
use store::FileStore;
use tracing_subscriber::EnvFilter;

mod commands;
mod settings;

#[derive(Parser)]
#[command(name = "yorumator")]
#[command(about = "Yorumator - electronics product reviews from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to <config dir>/yorumator/yorumator.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Sort {
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl From<Sort> for api::SortOrder {
    fn from(sort: Sort) -> Self {
        match sort {
            Sort::PriceAsc => api::SortOrder::PriceAsc,
            Sort::PriceDesc => api::SortOrder::PriceDesc,
            Sort::RatingDesc => api::SortOrder::RatingDesc,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and keep the session on disk
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// One-time code for accounts with two-factor login
        #[arg(long)]
        otp: Option<String>,
    },

    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Show who is signed in
    Whoami,

    /// List products
    Products {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        brand: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, value_enum)]
        sort: Option<Sort>,

        #[arg(long)]
        min_rating: Option<f64>,

        /// Pages of results to fetch
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// List brands and categories
    Filters,

    /// Show a product with its reviews
    Product { id: String },

    /// Post a review
    Review {
        product_id: String,

        #[arg(short, long, default_value = "5")]
        rating: u8,

        #[arg(short, long)]
        text: String,
    },

    /// Like (or with --dislike, dislike) a review
    React {
        product_id: String,

        review_id: String,

        #[arg(long)]
        dislike: bool,
    },

    /// Toggle a product in your favorites
    Favorite { product_id: String },

    /// List your favorites
    Favorites,

    /// Show a user's profile; with --toggle, follow or unfollow them
    Profile {
        user_id: String,

        #[arg(long)]
        toggle: bool,
    },

    /// Show notifications
    Notifications {
        /// Mark one notification read
        #[arg(long)]
        read: Option<String>,

        /// Mark every notification read
        #[arg(long)]
        read_all: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = settings::load(cli.config.as_deref())?;
    let storage = settings::storage_dir(&config);
    tracing::debug!(base_url = config.base_url(), storage = %storage.display(), "starting");

    let client = Client::new(HttpTransport::from_config(&config)?, FileStore::new(storage));
    client.initialize().await;

    commands::run(&client, cli.command).await
}
