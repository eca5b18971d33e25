use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ucsc_track_mirror::app::{App, GencodeResult, MirrorOptions, ProgressSink, TrackResult};
use ucsc_track_mirror::domain::{Dbms, GencodeVersion, OrganismDb, TableName};
use ucsc_track_mirror::error::MirrorError;
use ucsc_track_mirror::output::{HumanOutput, JsonOutput, OutputMode};
use ucsc_track_mirror::store::DumpStore;
use ucsc_track_mirror::ucsc::UcscHttpClient;

#[derive(Parser)]
#[command(name = "track-mirror")]
#[command(about = "Mirror UCSC genome-browser tracks as SQL insert statements")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    json: bool,

    /// Directory the ucsc_files tree is rooted at (defaults to the
    /// current directory).
    #[arg(long, global = true)]
    root: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Add a gencode release (wgEncodeGencode*V<n> tables)")]
    Gencode(GencodeArgs),
    #[command(about = "Add a single named track table")]
    Track(TrackArgs),
}

#[derive(Args)]
struct GencodeArgs {
    /// Gencode version to add, e.g. 44
    #[arg(short = 'g', long = "gencode-version")]
    version: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct TrackArgs {
    /// Table name on UCSC, e.g. mane
    #[arg(short = 't', long = "table")]
    table: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct CommonArgs {
    /// UCSC database name, e.g. hg38
    #[arg(short = 'd', long = "db")]
    db: String,

    /// Database engine the generated loader script uses
    #[arg(long, value_enum, default_value_t = Dbms::Mysql)]
    dbms: Dbms,

    /// Regenerate insert files even when they already exist
    #[arg(long)]
    force: bool,

    /// Convert already-downloaded dumps without contacting UCSC
    #[arg(long)]
    skip_download: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match run(cli, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let report = miette::Report::new(err);
            eprintln!("{report:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, mode: OutputMode) -> Result<(), MirrorError> {
    let store = match cli.root {
        Some(root) => DumpStore::new_with_root(root),
        None => DumpStore::new()?,
    };
    let ucsc = UcscHttpClient::new()?;
    let app = App::new(store, ucsc);
    let sink: &dyn ProgressSink = match mode {
        OutputMode::Json => &JsonOutput,
        OutputMode::Human => &HumanOutput,
    };

    match cli.command {
        Commands::Gencode(args) => {
            let db: OrganismDb = args.common.db.parse()?;
            let version: GencodeVersion = args.version.parse()?;
            let options = options_from(&args.common);
            let result = app.add_gencode(&db, version, &options, sink)?;
            report_gencode(&result, mode);
        }
        Commands::Track(args) => {
            let db: OrganismDb = args.common.db.parse()?;
            let table: TableName = args.table.parse()?;
            let options = options_from(&args.common);
            let result = app.add_track(&db, &table, &options, sink)?;
            report_track(&result, mode);
        }
    }
    Ok(())
}

fn options_from(common: &CommonArgs) -> MirrorOptions {
    MirrorOptions {
        force: common.force,
        skip_download: common.skip_download,
        dbms: common.dbms,
    }
}

fn report_gencode(result: &GencodeResult, mode: OutputMode) {
    match mode {
        OutputMode::Json => {
            let _ = JsonOutput::print_gencode(result);
        }
        OutputMode::Human => {
            println!(
                "gencode V{} for {}: {} table dumps converted, trackDb {:?}, hgFindSpec {:?}",
                result.version,
                result.db,
                result.tables.len(),
                result.trackdb.action,
                result.hgfindspec.action,
            );
            println!("loader script: {}", result.wrapper);
        }
    }
}

fn report_track(result: &TrackResult, mode: OutputMode) {
    match mode {
        OutputMode::Json => {
            let _ = JsonOutput::print_track(result);
        }
        OutputMode::Human => {
            println!(
                "track {} for {}: {} table dumps converted, trackDb {:?}, hgFindSpec {:?}",
                result.table,
                result.db,
                result.tables.len(),
                result.trackdb.action,
                result.hgfindspec.action,
            );
            println!("loader script: {}", result.wrapper);
        }
    }
}
