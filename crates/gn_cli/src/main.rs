use clap::Parser;
use gn_core::config::HumanDuration;
use gn_core::narration::{completion_channel, NarrationController};
use gn_core::pipeline::{self, Query};
use gn_core::{Config, Error, Result, Session, SharePlatform, SortKey};
use gn_fetch::logging::level_for_verbosity;
use gn_fetch::{create_source, fetch_once, init_logging};
use gn_web::{create_app, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{debug, info, warn};

mod app;
mod commands;
mod render;

#[derive(Parser, Debug)]
#[command(author, version, about = "Read, search and listen to the news", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// newsdata.io API key (overrides the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,
    #[arg(long, global = true)]
    keyword: Option<String>,
    #[arg(long, global = true)]
    country: Option<String>,
    /// Read articles from a saved API response instead of the network
    #[arg(long, global = true)]
    from_file: Option<PathBuf>,
    /// More output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Interactive reader (default)
    Browse {
        /// How often the date line is refreshed (e.g. 2s, 1m)
        #[arg(long)]
        clock_interval: Option<HumanDuration>,
    },
    /// Print one page of articles and exit
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "newest")]
        sort: SortKey,
        #[arg(long)]
        section: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Print share links for an article URL
    Share {
        url: String,
        #[arg(long)]
        platform: Option<SharePlatform>,
    },
    /// Serve the reader over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load_or_default(cli.config.as_deref())?;
    if let Some(key) = &cli.api_key {
        config.api.api_key = key.clone();
    }
    if let Some(keyword) = &cli.keyword {
        config.api.keyword = keyword.clone();
    }
    if let Some(country) = &cli.country {
        config.api.country = country.clone();
    }
    if let Some(Commands::Browse {
        clock_interval: Some(interval),
    }) = &cli.command
    {
        config.clock_interval = *interval;
    }
    config.validate()?;
    Ok(config)
}

async fn browse(config: &Config, cli: &Cli) -> Result<()> {
    let source = create_source(&config.api, cli.from_file.as_deref())?;
    let (completions_tx, completions_rx) = completion_channel();
    let narration = gn_narration::create_narrator(&config.narration, completions_tx)
        .map(NarrationController::new);
    if let Err(e) = &narration {
        warn!("🔇 {}", e);
    }

    let session = Session::new(config, narration);
    let app = app::App::new(session, source, completions_rx, config.clock_interval.0);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    app.run(stdin, &mut stdout).await
}

async fn list(
    config: &Config,
    cli: &Cli,
    query: Query,
    page: usize,
) -> Result<()> {
    let source = create_source(&config.api, cli.from_file.as_deref())?;
    let outcome = fetch_once(source.as_ref(), 1).await;
    let articles = outcome.result.map_err(|e| {
        debug!("List fetch failed: {}", e);
        Error::Fetch(e)
    })?;

    let projection = pipeline::project(&articles, &query, page, config.page_size);
    if projection.is_empty() {
        println!("No articles to show.");
        return Ok(());
    }
    for (i, article) in projection.items.iter().enumerate() {
        println!("{:>3}. {}", i + 1, article.title);
        println!("     [{}] {} | {}", article.section, article.published_at.raw, article.url);
    }
    let mut stdout = std::io::stdout();
    render::pagination(&projection, &mut stdout)
}

fn share(url: &str, platform: Option<SharePlatform>) -> Result<()> {
    let platforms = match platform {
        Some(p) => vec![p],
        None => SharePlatform::ALL.to_vec(),
    };
    for platform in platforms {
        println!("{}: {}", platform, platform.share_url(url)?);
    }
    Ok(())
}

async fn serve(config: &Config, cli: &Cli, addr: SocketAddr) -> Result<()> {
    let source = create_source(&config.api, cli.from_file.as_deref())?;
    let state = AppState::new(source, config);
    let summary = state.refresh().await;
    info!(
        "📰 {} articles loaded{}",
        summary.articles,
        summary.error.map(|e| format!(" ({})", e)).unwrap_or_default()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 Listening on http://{}", addr);
    axum::serve(listener, create_app(state))
        .await
        .map_err(Error::Io)
}

async fn run(cli: Cli) -> Result<()> {
    let logger = init_logging(level_for_verbosity(cli.verbose));
    let config = load_config(&cli)?;
    logger.debug(&format!("Using endpoint {}", config.api.endpoint));

    match &cli.command {
        None | Some(Commands::Browse { .. }) => browse(&config, &cli).await,
        Some(Commands::List {
            search,
            sort,
            section,
            page,
        }) => {
            let query = Query::new(search.clone(), *sort, section.as_deref());
            list(&config, &cli, query, *page).await
        }
        Some(Commands::Share { url, platform }) => share(url, *platform),
        Some(Commands::Serve { addr }) => serve(&config, &cli, *addr).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use gn_core::error::UNKNOWN_FAILURE_MESSAGE;
    use gn_core::FetchError;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "ginja",
            "--api-key",
            "secret",
            "--country",
            "gh",
            "browse",
            "--clock-interval",
            "5s",
        ]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.api.api_key, "secret");
        assert_eq!(config.api.country, "gh");
        assert_eq!(config.api.keyword, "Nigeria");
        assert_eq!(config.clock_interval.0.as_secs(), 5);
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::parse_from(["ginja", "list", "--sort", "oldest", "--section", "sports"]);
        match cli.command {
            Some(Commands::List { sort, section, page, .. }) => {
                assert_eq!(sort, SortKey::Oldest);
                assert_eq!(section.as_deref(), Some("sports"));
                assert_eq!(page, 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_fetch_failure_carries_user_message() {
        let cli = Cli::parse_from(["ginja", "--from-file", "/nonexistent/gn_listing.json", "list"]);
        let config = load_config(&cli).unwrap();
        let query = Query::new("", SortKey::Newest, None);
        let err = list(&config, &cli, query, 1).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(FetchError::Unknown(_))));
        assert_eq!(err.to_string(), UNKNOWN_FAILURE_MESSAGE);
    }

    #[test]
    fn test_share_rejects_unknown_platform() {
        assert!(Cli::try_parse_from(["ginja", "share", "https://a.b", "--platform", "myspace"]).is_err());
    }
}
