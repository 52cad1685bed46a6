use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use dylink::acquire::{ArtifactSaver, Collaborators, Engine, StatusBoard};
use dylink::api::ApiClient;
use dylink::clipboard::{self, ClipboardWriter};
use dylink::launcher::SystemLauncher;
use dylink::logging;
use dylink::models::{AcquisitionOutcome, AcquisitionRequest};
use dylink::operator::{ConsoleOperator, Operator};
use dylink::storage::{self, Config, ConfigStorage, TomlConfigStorage, ensure_directories};

const BASE_URL_ENV: &str = "DYLINK_API_BASE_URL";

#[derive(Parser)]
#[command(name = "dylink")]
#[command(about = "Short links, Douyin share parsing and text crypto", long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/dylink/dylink.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides the config file and DYLINK_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<Url>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct DownloadOpts {
    /// Skip the backend proxy and go straight to the origin
    #[arg(long)]
    no_proxy: bool,

    /// Directory to save the video in
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Shorten {
        url: String,
        /// Copy the short link to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Resolve a Douyin share string to its video URL
    Parse {
        share_string: String,
        /// Download the video after resolving it
        #[arg(long)]
        download: bool,
        /// Copy the video URL to the clipboard
        #[arg(long)]
        copy: bool,
        #[command(flatten)]
        opts: DownloadOpts,
    },

    /// Download a video, working around hotlink protection
    Download {
        video_url: Url,
        #[command(flatten)]
        opts: DownloadOpts,
    },

    /// Encrypt text with the backend key
    Encrypt {
        text: String,
        /// Copy the result to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Decrypt text produced by `encrypt`
    Decrypt {
        encrypted: String,
        /// Copy the result to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Copy text to the clipboard
    Copy { text: String },

    /// Own the clipboard selection until another application replaces it
    #[command(hide = true)]
    HoldClipboard,
}

/// Loaded configuration plus the resolved runtime paths
struct Session {
    config: Config,
    config_path: PathBuf,
    data_dir: PathBuf,
    base_url: Option<Url>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (data_dir, config_dir) = ensure_directories()?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("dylink.toml"));
    let config = TomlConfigStorage::new(config_path.clone()).load()?;

    let file_level = if config.general.debug_logging { "debug" } else { "info" };
    if let Err(e) = logging::init_logger(&data_dir.join("dylink.log"), file_level, "warn") {
        env_logger::init();
        log::warn!("File logging unavailable: {:#}", e);
    }

    let base_url = resolve_base_url(cli.base_url.clone(), env::var(BASE_URL_ENV).ok(), &config)?;
    let session = Session {
        config,
        config_path,
        data_dir,
        base_url,
    };

    match cli.command {
        Commands::Shorten { url, copy } => cmd_shorten(&session, &url, copy).await,
        Commands::Parse {
            share_string,
            download,
            copy,
            opts,
        } => cmd_parse(&session, &share_string, download, copy, &opts).await,
        Commands::Download { video_url, opts } => {
            cmd_download(&session, video_url, &opts).await;
            Ok(())
        }
        Commands::Encrypt { text, copy } => {
            let encrypted = api_client(&session)?.encrypt(&text).await?;
            print_result(&encrypted, copy);
            Ok(())
        }
        Commands::Decrypt { encrypted, copy } => {
            let decrypted = api_client(&session)?.decrypt(&encrypted).await?;
            print_result(&decrypted, copy);
            Ok(())
        }
        Commands::Copy { text } => {
            copy_text(&text);
            Ok(())
        }
        Commands::HoldClipboard => clipboard::serve_held_selection(),
    }
}

/// `--base-url` beats the environment, which beats the config file
fn resolve_base_url(cli: Option<Url>, env_value: Option<String>, config: &Config) -> Result<Option<Url>> {
    if cli.is_some() {
        return Ok(cli);
    }
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        let url = Url::parse(value.trim())
            .with_context(|| format!("{} is not a valid URL: {}", BASE_URL_ENV, value))?;
        return Ok(Some(url));
    }
    Ok(config.general.api_base_url.clone())
}

fn api_client(session: &Session) -> Result<ApiClient> {
    let base_url = session.base_url.clone().ok_or_else(|| {
        anyhow!(
            "No backend configured. Set api_base_url in {:?}, {} or pass --base-url",
            session.config_path,
            BASE_URL_ENV
        )
    })?;
    let timeout = Duration::from_secs(session.config.acquisition.request_timeout_secs);
    Ok(ApiClient::new(base_url, timeout)?)
}

fn copy_text(text: &str) {
    let operator = ConsoleOperator::stdio();
    ClipboardWriter::probe().copy_to_clipboard(text, &operator);
}

fn print_result(text: &str, copy: bool) {
    println!("{}", text);
    if copy {
        copy_text(text);
    }
}

async fn cmd_shorten(session: &Session, url: &str, copy: bool) -> Result<()> {
    let link = api_client(session)?
        .shorten(url)
        .await
        .context("Failed to create short link")?;
    print_result(link.short_url.as_str(), copy);
    Ok(())
}

async fn cmd_parse(
    session: &Session,
    share_string: &str,
    download: bool,
    copy: bool,
    opts: &DownloadOpts,
) -> Result<()> {
    let parsed = api_client(session)?
        .parse_share(share_string)
        .await
        .context("Failed to parse share string")?;

    if let Some(title) = parsed.display_title() {
        eprintln!("{}", title);
    }
    print_result(&parsed.video_url, copy);

    if download {
        let video_url = Url::parse(&parsed.video_url)
            .with_context(|| format!("Backend returned an invalid video URL: {}", parsed.video_url))?;
        cmd_download(session, video_url, opts).await;
    }
    Ok(())
}

/// Run the download chain. Outcomes are reported, never turned into errors.
async fn cmd_download(session: &Session, video_url: Url, opts: &DownloadOpts) {
    let operator: Arc<dyn Operator> = Arc::new(ConsoleOperator::stdio());
    let dir = opts
        .output_dir
        .clone()
        .unwrap_or_else(|| storage::download_dir(&session.config, &session.data_dir));

    let collaborators = Collaborators {
        saver: ArtifactSaver::new(dir),
        launcher: Arc::new(SystemLauncher),
        operator: Arc::clone(&operator),
        clipboard: ClipboardWriter::probe(),
    };

    let proxy_endpoint = if opts.no_proxy {
        None
    } else {
        session.config.proxy_endpoint(session.base_url.as_ref())
    };
    let request = AcquisitionRequest::new(video_url).with_proxy(proxy_endpoint);
    let board = StatusBoard::with_renderer(Box::new(|status: Option<&str>| {
        if let Some(message) = status {
            eprintln!("{}", message);
        }
    }));

    let outcome = match Engine::standard(&session.config.acquisition, collaborators) {
        Ok(engine) => engine.acquire(&request, &board).await,
        Err(e) => {
            log::error!("Failed to build HTTP client: {}", e);
            AcquisitionOutcome::Abandoned
        }
    };

    match outcome {
        AcquisitionOutcome::Delivered(path) => println!("{}", path.display()),
        AcquisitionOutcome::Unconfirmed => {
            operator.notify("Handed the link to your browser; check its downloads")
        }
        // The fallback already reported to the operator
        AcquisitionOutcome::UserDeferred(_) => {}
        AcquisitionOutcome::Abandoned => operator.notify("Download abandoned"),
    }
}
