//! Command-line interface for the APIX automation binary.
//!
//! The CLI exposes subcommands for looking up repository metadata in a
//! registry spreadsheet, rendering matches into an `apix.yaml` manifest,
//! and publishing the manifest to the repository as a pull request.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process
};

use apix::{
    fetch_registry_bytes, publish_manifest, render_manifest, ApiRecord, Error, LookupService,
    Settings
};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Command line interface for registry lookups and manifest publication.
#[derive(Debug, Parser)]
#[command(name = "apix", version, about = "Match repositories against the API metadata registry")]
struct Cli {
    #[command(subcommand)]
    command: Command
}

#[derive(Debug, Subcommand)]
/// Supported commands exposed by the CLI.
enum Command {
    /// Look up registry records for a repository URL.
    Lookup(LookupArgs),
    /// Render matched records into an apix.yaml manifest.
    Render(RenderArgs),
    /// Render and publish the manifest as a pull request.
    Publish(PublishArgs),
    /// Download a registry spreadsheet from a GitHub repository.
    Fetch(FetchArgs)
}

#[derive(Debug, Args)]
/// Arguments accepted by the `lookup` subcommand.
struct LookupArgs {
    /// Path to the registry spreadsheet (.csv, .xlsx, or .xls).
    #[arg(long = "data-file", value_name = "PATH")]
    data_file: PathBuf,

    /// Repository URL to search for.
    #[arg(long = "url", value_name = "URL")]
    url: String,

    /// Output formatted JSON for easier inspection.
    #[arg(long = "pretty", action = ArgAction::SetTrue)]
    pretty: bool
}

#[derive(Debug, Args)]
/// Arguments accepted by the `render` subcommand.
struct RenderArgs {
    /// Path to the registry spreadsheet (.csv, .xlsx, or .xls).
    #[arg(long = "data-file", value_name = "PATH")]
    data_file: PathBuf,

    /// Repository URL to search for.
    #[arg(long = "url", value_name = "URL")]
    url: String,

    /// Write the manifest to a file instead of stdout.
    #[arg(long = "output", value_name = "PATH")]
    output: Option<PathBuf>
}

#[derive(Debug, Args)]
/// Arguments accepted by the `publish` subcommand.
struct PublishArgs {
    /// Path to the registry spreadsheet (.csv, .xlsx, or .xls).
    #[arg(long = "data-file", value_name = "PATH")]
    data_file: PathBuf,

    /// Repository URL to search for and publish into.
    #[arg(long = "url", value_name = "URL")]
    url: String,

    #[command(flatten)]
    settings: Settings
}

#[derive(Debug, Args)]
/// Arguments accepted by the `fetch` subcommand.
struct FetchArgs {
    /// Owner or organization hosting the registry repository.
    #[arg(long = "owner", value_name = "OWNER")]
    owner: String,

    /// Name of the registry repository.
    #[arg(long = "repo", value_name = "REPO")]
    repo: String,

    /// Path of the registry file within the repository.
    #[arg(long = "path", value_name = "PATH")]
    path: String,

    /// Branch, tag, or commit to read from.
    #[arg(long = "branch", value_name = "REF", default_value = "main")]
    branch: String,

    /// Local destination for the downloaded file.
    #[arg(long = "output", value_name = "PATH")]
    output: PathBuf,

    #[command(flatten)]
    settings: Settings
}

/// Entry point that reports errors and sets the appropriate exit status.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(error) = run().await {
        eprintln!("{}", error.to_display_string());
        process::exit(1);
    }
}

/// Executes the CLI using parsed arguments.
///
/// # Errors
///
/// Propagates errors originating from registry loading, rendering, and
/// publication.
async fn run() -> Result<(), Error> {
    let cli = Cli::parse();

    match cli.command {
        Command::Lookup(args) => run_lookup(args),
        Command::Render(args) => run_render(args),
        Command::Publish(args) => run_publish(args).await,
        Command::Fetch(args) => run_fetch(args).await
    }
}

fn run_lookup(args: LookupArgs) -> Result<(), Error> {
    let records = find_records(&args.data_file, &args.url)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_records(&mut handle, &records, args.pretty)?;

    Ok(())
}

fn write_records<W: io::Write>(
    writer: &mut W,
    records: &[ApiRecord],
    pretty: bool
) -> Result<(), Error> {
    let result = if pretty {
        serde_json::to_writer_pretty(writer, records)
    } else {
        serde_json::to_writer(writer, records)
    };
    result.map_err(|error| Error::service(format!("failed to serialize records: {error}")))
}

fn run_render(args: RenderArgs) -> Result<(), Error> {
    let records = find_records(&args.data_file, &args.url)?;
    let manifest = render_manifest(&records)?;

    match args.output {
        Some(path) => fs::write(&path, manifest)
            .map_err(|source| apix::io_error(&path, source))?,
        None => print!("{manifest}")
    }

    Ok(())
}

async fn run_publish(args: PublishArgs) -> Result<(), Error> {
    let records = find_records(&args.data_file, &args.url)?;
    let manifest = render_manifest(&records)?;

    let result = publish_manifest(&args.settings, &args.url, &manifest).await?;
    match result.pr_url {
        Some(url) => println!("{url}"),
        None => println!("pull request #{}", result.pr_number)
    }

    Ok(())
}

async fn run_fetch(args: FetchArgs) -> Result<(), Error> {
    let bytes = fetch_registry_bytes(
        &args.settings,
        &args.owner,
        &args.repo,
        &args.path,
        &args.branch
    )
    .await?;

    fs::write(&args.output, bytes).map_err(|source| apix::io_error(&args.output, source))?;
    println!("{}", args.output.display());

    Ok(())
}

/// Loads the registry and resolves records for the queried repository.
///
/// Registry load failures and zero-match queries both surface as the same
/// not-found error; only the logs distinguish them.
fn find_records(data_file: &Path, url: &str) -> Result<Vec<ApiRecord>, Error> {
    LookupService::new(data_file)
        .find_by_repository(url)
        .ok_or_else(|| Error::validation(format!("no API metadata found for '{url}'")))
}
