//! `rfms` command-line front end: lists, imports and exports records and
//! manages the remembered session.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use rfms_client::domain::ports::{FixtureAuthenticator, NoticeKind};
use rfms_client::domain::stores::AuthStore;
use rfms_client::domain::{
    Credentials, FailureLog, NotificationRelay, SupervisorDay, UploadFile,
};
use rfms_client::outbound::{DirectoryFileSink, FileTokenStorage, HttpTransport};
use rfms_client::{ClientSettings, StoreContext};

/// `rfms` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "rfms",
    about = "Railway failure management client",
    version
)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long = "json-logs")]
    json_logs: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a collection.
    List {
        /// Collection to list.
        resource: ListTarget,
    },
    /// Print one record.
    Show {
        #[command(subcommand)]
        target: ShowTarget,
    },
    /// Upload a spreadsheet to an import endpoint.
    Import {
        /// Collection receiving the rows.
        resource: ImportTarget,
        /// Spreadsheet to upload.
        path: PathBuf,
    },
    /// Download a spreadsheet export into the export directory.
    Export {
        /// Collection to export.
        resource: ExportTarget,
    },
    /// Sign in and remember the session.
    Login {
        /// Account name.
        #[arg(long)]
        username: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Send the supervisor movement report for a day to Telegram.
    SendMovementReport {
        /// Day in `YYYY-MM-DD` form.
        date: NaiveDate,
    },
    /// Forget the remembered session.
    Logout,
    /// Print the signed-in user.
    Whoami,
}

#[derive(Debug, Subcommand)]
enum ShowTarget {
    /// A failure log entry.
    Failure {
        /// Primary key.
        id: u64,
    },
    /// Files attached to a failure log entry.
    Attachments {
        /// Failure log primary key.
        failure: u64,
    },
    /// Supervisor movements for a day.
    Movements {
        /// Day in `YYYY-MM-DD` form.
        date: NaiveDate,
    },
    /// Failure identifier format.
    FailureIdSettings,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ListTarget {
    Depots,
    Circuits,
    Stations,
    Sections,
    Supervisors,
    Failures,
    ArchivedFailures,
    RecentFailures,
    Reports,
    Users,
    TelegramGroups,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImportTarget {
    Depots,
    Circuits,
    Stations,
    Sections,
    Supervisors,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportTarget {
    Depots,
    Circuits,
    Stations,
    Supervisors,
}

type Relay = NotificationRelay;
type Context = StoreContext<HttpTransport, Relay>;
type Auth = AuthStore<FixtureAuthenticator, FileTokenStorage, Relay>;

struct App {
    relay: Arc<Relay>,
    auth: Auth,
    stores: Context,
    sink: DirectoryFileSink,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.json_logs);
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(cli.command))
}

fn init_tracing(json: bool) {
    let builder = fmt().with_env_filter(EnvFilter::from_default_env());
    let result = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    if let Err(error) = result {
        warn!(error = %error, "tracing init failed");
    }
}

async fn run(command: Command) -> Result<()> {
    let app = build_app()?;
    let outcome = execute(&app, command).await;
    print_notices(&app.relay);
    outcome
}

fn build_app() -> Result<App> {
    let settings = ClientSettings::load_from_iter([OsString::from("rfms")])
        .map_err(|error| eyre!("failed to load configuration: {error}"))?;
    let relay = Arc::new(NotificationRelay::with_default_ttl(settings.notice_ttl()));
    let storage = Arc::new(FileTokenStorage::new(settings.session_file())?);
    let auth = AuthStore::new(Arc::new(FixtureAuthenticator), storage, Arc::clone(&relay));
    auth.init_from_storage()?;

    let transport = Arc::new(
        HttpTransport::new(settings.http_settings()?)?.with_bearer(auth.subscribe()),
    );
    let stores = StoreContext::with_warning_ttl(&transport, &relay, settings.warning_ttl());
    Ok(App {
        relay,
        auth,
        stores,
        sink: DirectoryFileSink::new(settings.export_dir()),
    })
}

async fn execute(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            let credentials = Credentials::try_from_parts(username, password)?;
            let session = app.auth.login(&credentials).await?;
            info!(username = %session.user.username, "session stored");
        }
        Command::Logout => app.auth.logout()?,
        Command::Whoami => match app.auth.user() {
            Some(user) => println!("{}", user.username),
            None => println!("not signed in"),
        },
        Command::List { resource } => {
            app.auth.require_session()?;
            list(&app.stores, resource).await?;
        }
        Command::Show { target } => {
            app.auth.require_session()?;
            show(&app.stores, target).await?;
        }
        Command::SendMovementReport { date } => {
            app.auth.require_session()?;
            app.stores.movements.send_report(date).await?;
        }
        Command::Import { resource, path } => {
            app.auth.require_session()?;
            let file = read_upload(&path)?;
            let outcome = match resource {
                ImportTarget::Depots => app.stores.depots.import_file(file).await?,
                ImportTarget::Circuits => app.stores.circuits.import_file(file).await?,
                ImportTarget::Stations => app.stores.stations.import_file(file).await?,
                ImportTarget::Sections => app.stores.sections.import_file(file).await?,
                ImportTarget::Supervisors => app.stores.supervisors.import_file(file).await?,
            };
            println!("{}", outcome.headline);
            for error in &outcome.errors {
                println!("  {error}");
            }
        }
        Command::Export { resource } => {
            app.auth.require_session()?;
            let stores = &app.stores;
            let path = match resource {
                ExportTarget::Depots => stores.depots.export_file(&app.sink).await?,
                ExportTarget::Circuits => stores.circuits.export_file(&app.sink).await?,
                ExportTarget::Stations => stores.stations.export_file(&app.sink).await?,
                ExportTarget::Supervisors => stores.supervisors.export_file(&app.sink).await?,
            };
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn list(stores: &Context, resource: ListTarget) -> Result<()> {
    match resource {
        ListTarget::Depots => print_rows(&stores.depots.fetch_all().await?, |depot| {
            format!("{}\t{}\t{}", depot.id, depot.name, depot.location)
        }),
        ListTarget::Circuits => print_rows(&stores.circuits.fetch_all().await?, |circuit| {
            format!("{}\t{}\t{}", circuit.id, circuit.circuit_id, circuit.name)
        }),
        ListTarget::Stations => print_rows(&stores.stations.fetch_all().await?, |station| {
            format!("{}\t{}\t{}", station.id, station.code, station.name)
        }),
        ListTarget::Sections => print_rows(&stores.sections.fetch_all().await?, |section| {
            format!("{}\t{}", section.id, section.name)
        }),
        ListTarget::Supervisors => {
            print_rows(&stores.supervisors.fetch_all().await?, |supervisor| {
                format!(
                    "{}\t{}\t{}",
                    supervisor.id, supervisor.name, supervisor.designation
                )
            });
        }
        ListTarget::Failures => {
            print_rows(&stores.failures.fetch_all().await?, failure_row);
        }
        ListTarget::ArchivedFailures => {
            print_rows(&stores.failures.fetch_archived().await?, failure_row);
        }
        ListTarget::RecentFailures => {
            print_rows(&stores.recent_failures.fetch().await?, failure_row);
        }
        ListTarget::Reports => print_rows(&stores.reports.fetch_all().await?, |report| {
            format!("{}\t{}\t{:?}", report.id, report.name, report.frequency)
        }),
        ListTarget::Users => print_rows(&stores.users.fetch_all().await?, |user| {
            format!("{}\t{}\t{}", user.id, user.username, user.role)
        }),
        ListTarget::TelegramGroups => {
            print_rows(&stores.telegram.fetch_all().await?, |group| {
                format!("{}\t{}\t{}", group.id, group.name, group.chat_id)
            });
        }
    }
    Ok(())
}

async fn show(stores: &Context, target: ShowTarget) -> Result<()> {
    match target {
        ShowTarget::Failure { id } => {
            print_failure_detail(&stores.failures.fetch_one(id).await?);
        }
        ShowTarget::Attachments { failure } => {
            print_rows(&stores.attachments.fetch(failure).await?, |attachment| {
                format!(
                    "{}\t{}\t{}",
                    attachment.id, attachment.file, attachment.description
                )
            });
        }
        ShowTarget::Movements { date } => {
            let sheet = stores.movements.fetch_by_date(date).await?;
            print_rows(&sheet.supervisors, movement_row);
        }
        ShowTarget::FailureIdSettings => {
            let settings = stores.failure_id_settings.fetch().await?;
            println!("prefix: {}", settings.prefix);
            println!("padding: {}", settings.padding);
            println!("reset_cycle: {}", settings.reset_cycle);
            println!("example: {}", settings.format(1));
        }
    }
    Ok(())
}

fn movement_row(day: &SupervisorDay) -> String {
    let status = match &day.movement {
        None => "not recorded".to_owned(),
        Some(movement) if movement.on_leave => match movement.look_after {
            Some(cover) => format!("on leave, covered by #{cover}"),
            None => "on leave".to_owned(),
        },
        Some(movement) => format!("on duty at {}", movement.location),
    };
    format!("{}\t{}\t{}\t{status}", day.id, day.name, day.designation)
}

fn print_rows<E>(rows: &[E], describe: impl Fn(&E) -> String) {
    for row in rows {
        println!("{}", describe(row));
    }
}

fn failure_row(log: &FailureLog) -> String {
    let circuit = log
        .circuit
        .as_ref()
        .map_or_else(String::new, ToString::to_string);
    format!(
        "{}\t{}\t{:?}\t{:?}\t{}\t{}",
        log.id,
        log.fail_id,
        log.current_status,
        log.severity,
        circuit,
        log.reported_at.to_rfc3339()
    )
}

fn print_failure_detail(log: &FailureLog) {
    println!("id: {}", log.id);
    println!("fail_id: {}", log.fail_id);
    println!("status: {:?}", log.current_status);
    println!("severity: {:?}", log.severity);
    println!("entry_type: {:?}", log.entry_type);
    for (label, related) in [
        ("circuit", &log.circuit),
        ("station", &log.station),
        ("section", &log.section),
        ("sub_section", &log.sub_section),
        ("assigned_to", &log.assigned_to),
    ] {
        if let Some(related) = related {
            println!("{label}: {related}");
        }
    }
    println!("reported_at: {}", log.reported_at.to_rfc3339());
    if let Some(resolved_at) = log.resolved_at {
        println!("resolved_at: {}", resolved_at.to_rfc3339());
    }
    if !log.remark_fail.is_empty() {
        println!("remark_fail: {}", log.remark_fail);
    }
    if !log.remark_right.is_empty() {
        println!("remark_right: {}", log.remark_right);
    }
}

fn print_notices(relay: &Relay) {
    for notice in relay.drain() {
        let label = match notice.kind {
            NoticeKind::Info => "info",
            NoticeKind::Success => "ok",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        };
        println!("[{label}] {}: {}", notice.title, notice.message);
    }
}

fn read_upload(path: &Path) -> io::Result<UploadFile> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "import path must be a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open import directory '{}': {error}",
            parent.display()
        ))
    })?;
    let bytes = directory.read(file_name).map_err(|error| {
        io::Error::other(format!("read import file '{}': {error}", path.display()))
    })?;
    Ok(UploadFile::new(file_name.to_string_lossy(), bytes))
}
