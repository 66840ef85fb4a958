use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use cinereview_config::{DeleteCategoryPolicy, PathManager};
use commands::{catalog, config, reviews};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinereview")]
#[command(about = "CineReview - Browse movies and share what you thought of them")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Also write logs to a file (rotated daily). Without PATH, logs go to
    /// the logs directory next to config.toml
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    /// Directory holding config.toml and credentials.toml
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read, publish and delete reviews of a movie
    Reviews {
        #[command(subcommand)]
        cmd: ReviewCommands,
    },
    /// List the cast of a movie
    Casting {
        movie_id: String,
    },
    /// Show an actor's profile and filmography
    Actor {
        actor_id: String,
    },
    /// Search movies by title
    Search {
        query: String,

        /// Result page, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    #[command(long_about = "Manage the backend connection, review options and the stored session. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ReviewCommands {
    /// Show critics' and spectators' reviews with their average scores
    Show {
        movie_id: String,
    },
    #[command(long_about = "Publish a review as the signed-in user. Verified accounts publish as critics, everyone else as spectators. Missing --score or --text values are prompted for.")]
    Post {
        movie_id: String,

        /// Score from 1 to 5
        #[arg(long, allow_negative_numbers = true)]
        score: Option<i32>,

        /// Review text
        #[arg(long)]
        text: Option<String>,
    },
    /// Delete one of your reviews
    Delete {
        movie_id: String,

        review_id: String,

        /// Skip the confirmation prompt
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DeletePolicyArg {
    /// Category of the viewer doing the deletion
    ActingViewer,
    /// Category the review was published in
    StoredReview,
}

impl From<DeletePolicyArg> for DeleteCategoryPolicy {
    fn from(arg: DeletePolicyArg) -> Self {
        match arg {
            DeletePolicyArg::ActingViewer => DeleteCategoryPolicy::ActingViewer,
            DeletePolicyArg::StoredReview => DeleteCategoryPolicy::StoredReview,
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommands {
    #[command(long_about = "Display the current configuration and session. The ID token is masked.")]
    Show,

    /// Configure the backend the client talks to
    Backend {
        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        timeout_secs: Option<u64>,

        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Configure how reviews are deleted
    Reviews {
        #[arg(long, value_enum)]
        delete_category: Option<DeletePolicyArg>,

        #[arg(long)]
        confirm_deletes: Option<bool>,
    },

    #[command(long_about = "Store the signed-in session. Use --verified for accounts with a verified email address; their reviews are published as critics.")]
    Session {
        #[arg(long)]
        uid: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        photo_url: Option<String>,

        #[arg(long, action = ArgAction::SetTrue)]
        verified: bool,

        /// Bearer token sent with mutating requests
        #[arg(long)]
        id_token: Option<String>,
    },

    /// Forget the stored session
    ClearSession,
}

fn resolve_log_file(arg: Option<Option<PathBuf>>, paths: &PathManager) -> Option<PathBuf> {
    arg.map(|path| path.unwrap_or_else(|| paths.default_log_file()))
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let paths = match cli.config_dir.clone() {
        Some(dir) => PathManager::with_base(dir),
        None => PathManager::default(),
    };

    logging::init_logging(cli.verbose, cli.quiet, resolve_log_file(cli.log_file.clone(), &paths))
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    tracing::debug!(config_dir = %paths.config_dir().display(), "Using configuration directory");

    match cli.command {
        Commands::Reviews { cmd } => reviews::run_reviews(cmd, &paths, &output).await,
        Commands::Casting { movie_id } => catalog::show_casting(movie_id, &paths, &output).await,
        Commands::Actor { actor_id } => catalog::show_actor(actor_id, &paths, &output).await,
        Commands::Search { query, page } => catalog::search_movies(query, page, &paths, &output).await,
        Commands::Config { cmd } => {
            let cmd = cmd.unwrap_or(ConfigCommands::Show);
            config::run_config(cmd, &paths, &output).await
        }
    }
}
