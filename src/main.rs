use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use clinica::booking::{self, BookingError, BookingFlow};
use clinica::config::{ClientConfig, ConfigError, normalize_base_url};
use clinica::guard::{self, GuardDecision, PathDecision};
use clinica::http::{ApiClient, ApiError};
use clinica::nav::{MemoryNavigator, Navigator};
use clinica::routes::{LOGIN_ROUTE, REGISTER_ROUTE, ROOT_ROUTE, SLOTS_ROUTE, SPECIALTIES_ROUTE};
use clinica::services::uploads::{self, ImageFile};
use clinica::services::{doctors, schedules, specialties};
use clinica::session::{FileStore, SessionStore};
use clinica::state::{AppointmentsManager, AuthManager, NoticeLevel, Notices};
use clinica::validate::{self, RegistrationForm, ValidationError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{}", .0.user_message("La solicitud falló"))]
    Api(#[from] ApiError),
    #[error("{0}")]
    Booking(#[from] BookingError),
    #[error("{}", .0.message)]
    Invalid(#[from] ValidationError),
    #[error("{0}")]
    Failed(String),
    #[error("no hay un horario disponible a las {time} para esa fecha")]
    NoSlotAt { time: String },
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "clinica", about = "Clinic appointment client")]
struct Cli {
    /// Backend base URL (overrides CLINICA_API_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Session file (overrides CLINICA_SESSION_FILE).
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        email: String,
        #[arg(long, env = "CLINICA_PASSWORD")]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLINICA_PASSWORD")]
        password: String,
        #[arg(long)]
        dni: String,
        #[arg(long)]
        phone: String,
    },
    Logout,
    Whoami,
    /// Show what the route guard decides for a path.
    Route {
        path: String,
    },
    Specialties,
    Doctors {
        #[arg(long)]
        specialty: Option<String>,
    },
    /// Open slots of a doctor on a date (YYYY-MM-DD).
    Slots {
        doctor: i64,
        date: String,
    },
    /// Book the slot starting at `time` (HH:MM).
    Book {
        doctor: i64,
        date: String,
        time: String,
        #[arg(long)]
        description: Option<String>,
    },
    Appointments,
    Cancel {
        id: i64,
    },
    /// Upload a doctor or specialty image and print the stored file name.
    Upload {
        path: PathBuf,
    },
}

impl Command {
    /// Page the command stands for. Decides whether a 401 logs the user out.
    fn page(&self) -> &'static str {
        match self {
            Self::Login { .. } => LOGIN_ROUTE,
            Self::Register { .. } => REGISTER_ROUTE,
            Self::Logout | Self::Route { .. } => ROOT_ROUTE,
            Self::Whoami => "/cliente/perfil",
            Self::Specialties | Self::Doctors { .. } => SPECIALTIES_ROUTE,
            Self::Slots { .. } => SLOTS_ROUTE,
            Self::Book { .. } => "/cliente/turnos",
            Self::Appointments | Self::Cancel { .. } => "/cliente/citas",
            Self::Upload { .. } => "/admin/doctores",
        }
    }
}

struct Context {
    api: ApiClient,
    nav: Arc<MemoryNavigator>,
    notices: Notices,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref().and_then(normalize_base_url) {
        config.base_url = base_url;
    }
    if let Some(session_file) = cli.session_file {
        config.session_file = session_file;
    }

    let session = SessionStore::new(Arc::new(FileStore::open(config.session_file.clone())));
    let nav = Arc::new(MemoryNavigator::at(cli.command.page()));
    let api = ApiClient::from_config(&config, session, nav.clone())?;
    let ctx = Context { api, nav, notices: Notices::default() };

    let result = run(&ctx, cli.command).await;
    print_notices(&ctx.notices);
    result
}

async fn run(ctx: &Context, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            let mut auth = AuthManager::new(ctx.api.clone(), ctx.notices.clone());
            if !auth.login(&email, &password).await {
                return Err(failed(auth.error));
            }
            println!("home: {}", ctx.nav.current_path());
            Ok(())
        }
        Command::Register { name, email, password, dni, phone } => {
            let mut auth = AuthManager::new(ctx.api.clone(), ctx.notices.clone());
            let form = RegistrationForm { name, email, password, dni, phone };
            if !auth.register(&form).await {
                return Err(failed(auth.error));
            }
            println!("next: {}", ctx.nav.current_path());
            Ok(())
        }
        Command::Logout => {
            AuthManager::new(ctx.api.clone(), ctx.notices.clone()).logout();
            Ok(())
        }
        Command::Whoami => run_whoami(ctx).await,
        Command::Route { path } => {
            run_route(ctx, &path);
            Ok(())
        }
        Command::Specialties => print_json(&specialties::list(&ctx.api).await?),
        Command::Doctors { specialty } => {
            let list = match specialty {
                Some(specialty) => doctors::list_by_specialty(&ctx.api, &specialty).await?,
                None => doctors::list(&ctx.api).await?,
            };
            print_json(&list)
        }
        Command::Slots { doctor, date } => {
            let flow = slots_for(ctx, doctor, &date).await?;
            for slot in &flow.slots.items {
                println!("{:>6}  {}  {}", slot.id_horario, slot.time_range(), slot.turno.as_deref().unwrap_or(""));
            }
            Ok(())
        }
        Command::Book { doctor, date, time, description } => run_book(ctx, doctor, &date, &time, description).await,
        Command::Appointments => {
            let mut manager = AppointmentsManager::new(ctx.api.clone(), ctx.notices.clone());
            if !manager.load().await {
                return Err(failed(manager.state.error));
            }
            print_json(manager.items())
        }
        Command::Cancel { id } => {
            let mut manager = AppointmentsManager::new(ctx.api.clone(), ctx.notices.clone());
            if manager.cancel(id).await {
                Ok(())
            } else {
                Err(CliError::Failed(format!("cita {id} no cancelada")))
            }
        }
        Command::Upload { path } => {
            let file = ImageFile::read(&path).map_err(|source| CliError::Read { path, source })?;
            println!("{}", uploads::upload_image(&ctx.api, &file).await?);
            Ok(())
        }
    }
}

async fn run_whoami(ctx: &Context) -> Result<(), CliError> {
    let mut auth = AuthManager::new(ctx.api.clone(), ctx.notices.clone());
    if !auth.restore() {
        println!("no session");
        return Ok(());
    }
    if auth.load_profile().await {
        print_json(&auth.profile)
    } else {
        // offline: fall back to what the session file holds
        print_json(&auth.user)
    }
}

fn run_route(ctx: &Context, path: &str) {
    let decision = guard::navigate_guarded(ctx.api.session(), ctx.nav.as_ref(), path);
    let verdict = match decision {
        PathDecision::Public => "public".to_string(),
        PathDecision::NotFound => "not found".to_string(),
        PathDecision::Guarded(GuardDecision::Render(session)) => format!("render as {}", session.role()),
        PathDecision::Guarded(GuardDecision::Redirect { to, mode }) => format!("redirect to {to} ({mode:?})"),
        PathDecision::Guarded(GuardDecision::Denied) => "denied".to_string(),
    };
    println!("{path}: {verdict}");
    println!("location: {}", ctx.nav.current_path());
}

/// Flow with `doctor` and `date` selected and that day's slots fetched.
async fn slots_for(ctx: &Context, doctor: i64, date: &str) -> Result<BookingFlow, CliError> {
    let date = validate::parse_date(date)?;
    let doctor = doctors::get(&ctx.api, doctor).await?;
    let mut flow = BookingFlow::at(booking::local_now(), ctx.notices.clone());
    if !flow.select_doctor(&ctx.api, doctor).await {
        return Err(failed(flow.slots.error.clone()));
    }
    if !flow.select_date(&ctx.api, date).await {
        return Err(failed(flow.error().or(flow.slots.error.as_deref()).map(str::to_string)));
    }
    Ok(flow)
}

async fn run_book(
    ctx: &Context,
    doctor: i64,
    date: &str,
    time: &str,
    description: Option<String>,
) -> Result<(), CliError> {
    let start = validate::parse_time(time)?;
    let mut flow = slots_for(ctx, doctor, date).await?;
    let slot_id = flow
        .slots
        .items
        .iter()
        .find(|s| s.start() == Some(start))
        .map(|s| s.id_horario)
        .ok_or_else(|| CliError::NoSlotAt { time: schedules::format_time(start) })?;
    flow.select_slot(slot_id)?;
    if let Some(description) = description {
        flow.set_description(description);
    }
    if !flow.submit(&ctx.api).await {
        return Err(failed(flow.error().map(str::to_string)));
    }
    if let Some(appointment) = flow.confirmed() {
        println!("cita {} ({})", appointment.id_cita, appointment.estado);
    }
    Ok(())
}

fn failed(error: Option<String>) -> CliError {
    CliError::Failed(error.unwrap_or_else(|| "operación fallida".to_string()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_notices(notices: &Notices) {
    for notice in notices.drain() {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warn",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{tag}] {}", notice.message);
    }
}
