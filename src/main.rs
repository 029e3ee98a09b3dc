//! drive_hierarchy CLI - Export a Google Drive folder tree to JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use drive_hierarchy::config::{DEFAULT_APP_NAME, DEFAULT_CLIENT_SECRET, DEFAULT_SCOPE};
use drive_hierarchy::{
    build, logging, parse_folder_id, sort, write_hierarchy, Authenticator, Config, DriveClient,
};

/// Walk a Google Drive folder and write its hierarchy as JSON.
#[derive(Parser)]
#[command(name = "drive_hierarchy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Application name; also names the output file and credential cache.
    #[arg(long, env = "DRIVE_HIERARCHY_APP_NAME", default_value = DEFAULT_APP_NAME)]
    app_name: String,

    /// Root folder URL or ID (empty exports an empty tree).
    #[arg(long, env = "DRIVE_FOLDER_ID", default_value = "")]
    folder: String,

    /// Display name recorded for the root folder.
    #[arg(long, env = "DRIVE_FOLDER_NAME", default_value = "")]
    folder_name: String,

    /// OAuth scope to request.
    #[arg(long, default_value = DEFAULT_SCOPE)]
    scope: String,

    /// Path to the OAuth client secret or service account key file.
    #[arg(long, env = "DRIVE_CLIENT_SECRET", default_value = DEFAULT_CLIENT_SECRET)]
    client_secret: PathBuf,

    /// Credential cache file [default: ~/.credentials/.<APP_NAME>].
    #[arg(long, env = "DRIVE_CREDENTIALS_CACHE")]
    credentials_cache: Option<PathBuf>,

    /// Bearer token to use instead of the OAuth flow.
    #[arg(long, env = "DRIVE_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Output file [default: <APP_NAME>.json].
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Keep listing order instead of sorting by name.
    #[arg(long)]
    no_sort: bool,

    /// Pretty-print the JSON document.
    #[arg(long)]
    pretty: bool,

    /// Leave out items in the trash.
    #[arg(long)]
    exclude_trashed: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let folder_id = parse_folder_id(&self.folder)
            .with_context(|| format!("Invalid folder URL or ID: {}", self.folder))?;

        Ok(Config {
            app_name: self.app_name,
            folder_id,
            folder_name: self.folder_name,
            scope: self.scope,
            client_secret: self.client_secret,
            credentials_cache: self.credentials_cache,
            output: self.output,
            access_token: self.access_token,
            sort: !self.no_sort,
            pretty: self.pretty,
            exclude_trashed: self.exclude_trashed,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = cli.into_config()?;

    let auth = Authenticator::from_config(&config)
        .await
        .context("Failed to load credentials")?;

    // Fail on bad credentials before the walk starts.
    auth.get_access_token()
        .await
        .context("Authorization failed")?;

    let client = DriveClient::new(auth).exclude_trashed(config.exclude_trashed);

    info!(folder_id = %config.folder_id, "Building hierarchy");
    let mut root = build(&client, &config.folder_id, &config.folder_name)
        .await
        .with_context(|| format!("Failed to build hierarchy for folder: {}", config.folder_id))?;

    if config.sort {
        sort(&mut root);
    }

    let output = config.output_path();
    write_hierarchy(&output, &root, config.pretty)
        .with_context(|| format!("Failed to write {:?}", output))?;

    info!(
        folders = root.folder_count(),
        files = root.file_count(),
        "Export complete"
    );
    println!(
        "Wrote {} folder(s) and {} file(s) to {:?}",
        root.folder_count(),
        root.file_count(),
        output
    );

    Ok(())
}
