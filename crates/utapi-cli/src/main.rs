//! utapi - command-line client for UploadThing

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utapi_client::{
    Config, DeleteFilesOpts, ListFilesOpts, PrepareUploadOpts, RenameFileOpt, UtApi,
    DEFAULT_HOST, DEFAULT_VERSION,
};

#[derive(Parser, Debug)]
#[command(name = "utapi")]
#[command(about = "Upload and manage files on UploadThing")]
#[command(version)]
struct Args {
    /// Secret API key
    #[arg(long, env = "UPLOADTHING_API_KEY", hide_env_values = true)]
    api_key: String,

    /// API host
    #[arg(long, default_value = DEFAULT_HOST, env = "UPLOADTHING_HOST")]
    host: String,

    /// API version path segment
    #[arg(long, default_value = DEFAULT_VERSION, env = "UPLOADTHING_VERSION")]
    api_version: String,

    /// Enable debug logging
    #[arg(short, long, env = "UTAPI_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a local file
    Upload {
        /// File to upload
        path: PathBuf,

        /// Route identifier (repeatable)
        #[arg(short, long = "route")]
        routes: Vec<String>,

        /// Callback URL notified after the upload
        #[arg(long)]
        callback_url: Option<String>,

        /// Callback slug (defaults to the file name)
        #[arg(long)]
        callback_slug: Option<String>,
    },

    /// Delete files by key
    Delete {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Rename a file
    Rename {
        file_key: String,
        new_name: String,
    },

    /// List uploaded files
    List {
        #[arg(long, default_value = "10")]
        limit: u64,

        #[arg(long, default_value = "0")]
        offset: u64,
    },

    /// Show storage usage
    Usage,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr so stdout stays parseable JSON
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("utapi_client={},utapi_cli={}", log_level, log_level).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::new(args.api_key)
        .with_host(args.host)
        .with_version(args.api_version);
    tracing::debug!("Using API at {}", config.base_url());

    let client = UtApi::new(config)?;

    let output = match args.command {
        Command::Upload {
            path,
            routes,
            callback_url,
            callback_slug,
        } => {
            let slug = callback_slug.unwrap_or_else(|| {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            let opts = PrepareUploadOpts {
                callback_url: callback_url.unwrap_or_default(),
                callback_slug: slug,
                route_config: routes,
                ..Default::default()
            };

            let grant = client.upload_local_file(&path, opts).await?;
            tracing::info!("Uploaded {} as {}", path.display(), grant.key);
            serde_json::to_value(&grant)?
        }
        Command::Delete { keys } => {
            let result = client.delete_files(DeleteFilesOpts::new(keys)).await?;
            tracing::info!("Deleted {} file(s)", result.deleted_count);
            serde_json::to_value(&result)?
        }
        Command::Rename { file_key, new_name } => {
            let result = client
                .rename_files(&[RenameFileOpt::new(file_key, new_name)])
                .await?;
            serde_json::to_value(&result)?
        }
        Command::List { limit, offset } => {
            let result = client.list_files(ListFilesOpts { limit, offset }).await?;
            serde_json::to_value(&result)?
        }
        Command::Usage => serde_json::to_value(client.get_usage_info().await?)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
