use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;

use caja::api::{CajaApi, CloseRequest, HttpApi, MovementKind, MovementRequest, OpenSessionRequest};
use caja::caja::{
    ActionGate, ActionHandler, ActorRole, CashSession, ClosureKind, HistoryFilter, SessionAction,
};
use caja::config::{
    clear_session, config_dir, ensure_initialized, load_config, load_session, require_session,
    resolve_output_dir, save_session, write_template, Config, SessionRef,
};
use caja::error::{CajaError, Result};
use caja::page::{fetch_open_sessions, load_context, load_page_context, CajaPage, Tab};
use caja::{logging, monitor, render, report};

#[derive(Parser)]
#[command(name = "caja")]
#[command(version, about = "Cash register session dashboard", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.caja or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Override the API base URL from config.toml
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log requests and gate decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Remember who is operating the dashboard
    Login {
        /// User identifier as known by the backend
        #[arg(short, long)]
        user: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// owner (cashier) or admin
        #[arg(short, long, value_enum, ignore_case = true, default_value_t = ActorRole::Owner)]
        role: ActorRole,
    },

    /// Forget the logged-in user
    Logout,

    /// Show configuration and logged-in user
    Status,

    /// Render the full dashboard page
    Page {
        /// Tab to show
        #[arg(short, long, value_enum, default_value_t = Tab::Monitor)]
        tab: Tab,

        /// History page number (history tab only)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show every open cash session
    Monitor,

    /// List closed cash sessions
    History {
        /// Closures from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Closures up to this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Only closures of this user id
        #[arg(long)]
        owner: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },

    /// Show one cash session with its breakdown and available actions
    Show {
        /// Cash session id
        session: String,
    },

    /// Open a new cash session for the logged-in user
    Open {
        /// Opening float in the drawer
        #[arg(long)]
        amount: f64,
    },

    /// Register an income movement (ingreso)
    Income {
        /// Cash session id
        session: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        concept: String,
    },

    /// Register an expense movement (egreso)
    Expense {
        /// Cash session id
        session: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        concept: String,
    },

    /// Close a cash session (administrative closure for other users' sessions)
    Close {
        /// Cash session id
        session: String,

        /// Physically counted cash
        #[arg(long)]
        counted: f64,

        /// Closure note
        #[arg(long)]
        note: Option<String>,
    },

    /// Write the closure report of a closed session
    Print {
        /// Cash session id
        session: String,

        /// Open the report with the system default viewer
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    let env = || Env::load(&cfg_dir, cli.api_url.as_deref());

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Login { user, name, role } => cmd_login(&cfg_dir, user, name, role),
        Commands::Logout => cmd_logout(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir, cli.api_url.as_deref()),
        Commands::Page { tab, page } => cmd_page(&env()?, tab, page),
        Commands::Monitor => cmd_monitor(&env()?),
        Commands::History {
            from,
            to,
            owner,
            page,
            per_page,
        } => {
            let filter =
                HistoryFilter::parse(from.as_deref(), to.as_deref(), owner, page, per_page)?;
            cmd_history(&env()?, &filter)
        }
        Commands::Show { session } => cmd_show(&env()?, &session),
        Commands::Open { amount } => cmd_open(&env()?, amount),
        Commands::Income {
            session,
            amount,
            concept,
        } => cmd_movement(&env()?, &session, MovementKind::Income, amount, concept),
        Commands::Expense {
            session,
            amount,
            concept,
        } => cmd_movement(&env()?, &session, MovementKind::Expense, amount, concept),
        Commands::Close {
            session,
            counted,
            note,
        } => cmd_close(&env()?, &session, counted, note),
        Commands::Print { session, open } => cmd_print(&env()?, &session, open),
    }
}

/// Everything a command talking to the backend needs.
struct Env {
    cfg_dir: PathBuf,
    config: Config,
    session: SessionRef,
    api: HttpApi,
}

impl Env {
    fn load(cfg_dir: &Path, api_url: Option<&str>) -> Result<Self> {
        ensure_initialized(cfg_dir)?;
        let mut config = load_config(cfg_dir)?;
        if let Some(url) = api_url {
            config.api.base_url = url.to_string();
        }
        let session = require_session(cfg_dir)?;
        let api = HttpApi::new(&config.api);

        Ok(Self {
            cfg_dir: cfg_dir.to_path_buf(),
            config,
            session,
            api,
        })
    }

    fn gate<'a>(&self, session: &'a CashSession) -> ActionGate<'a> {
        ActionGate::resolve(
            session,
            &self.session.actor,
            self.config.policy.admin_own_session,
        )
    }
}

/// Initialize config directory with the template config.toml
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    if cfg_dir.exists() {
        return Err(CajaError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    write_template(cfg_dir)?;

    println!("Initialized caja config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point it at your backend:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Log in:                    caja login --user <id> --name <name>");
    println!();
    println!("Then open the dashboard:");
    println!("  caja page");

    Ok(())
}

fn cmd_login(cfg_dir: &Path, user: String, name: String, role: ActorRole) -> Result<()> {
    ensure_initialized(cfg_dir)?;

    let session = SessionRef {
        logged_in_at: chrono::Utc::now(),
        actor: caja::Actor {
            user_id: user,
            name,
            role,
        },
    };
    save_session(cfg_dir, &session)?;

    println!(
        "Logged in as {} ({})",
        session.actor.name, session.actor.role
    );
    Ok(())
}

fn cmd_logout(cfg_dir: &Path) -> Result<()> {
    ensure_initialized(cfg_dir)?;
    if clear_session(cfg_dir)? {
        println!("Logged out.");
    } else {
        println!("Nobody was logged in.");
    }
    Ok(())
}

/// Show configuration and logged-in user
fn cmd_status(cfg_dir: &Path, api_url: Option<&str>) -> Result<()> {
    ensure_initialized(cfg_dir)?;
    let config = load_config(cfg_dir)?;
    let session = load_session(cfg_dir)?;

    println!("Caja Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Business:         {}", config.business.name);
    println!(
        "API:              {}",
        api_url.unwrap_or(&config.api.base_url)
    );
    println!(
        "Admin own caja:   {:?}",
        config.policy.admin_own_session
    );
    match session {
        Some(s) => println!(
            "Logged in as:     {} ({}, id {})",
            s.actor.name, s.actor.role, s.actor.user_id
        ),
        None => println!("Logged in as:     nobody"),
    }

    Ok(())
}

/// The page renders even when the backend is down; failures show inline.
fn cmd_page(env: &Env, tab: Tab, page: u32) -> Result<()> {
    let context = load_page_context(&env.api, &env.session);
    let filter = HistoryFilter {
        page,
        ..HistoryFilter::default()
    };
    filter.validate()?;

    let out = CajaPage::new(&env.config, &context, tab).render(&env.api, &filter)?;
    println!("{out}");
    Ok(())
}

/// Monitor fetch failures are shown inline and do not fail the command.
fn cmd_monitor(env: &Env) -> Result<()> {
    let state = fetch_open_sessions(&env.api);
    let view = monitor::monitor_view(
        &state,
        &env.session.actor,
        env.config.policy.admin_own_session,
    );
    println!("{}", render::monitor(&view, &env.config.display.currency()));
    Ok(())
}

fn cmd_history(env: &Env, filter: &HistoryFilter) -> Result<()> {
    let page = env.api.closure_history(filter)?;
    println!(
        "{}",
        render::history_table(&page, &env.config.display.currency())
    );
    Ok(())
}

fn cmd_show(env: &Env, session_id: &str) -> Result<()> {
    let session = env.api.session(session_id)?;
    let gate = env.gate(&session);
    println!(
        "{}",
        render::session_detail(&gate, &env.config.display.currency())
    );
    Ok(())
}

fn cmd_open(env: &Env, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(CajaError::InvalidAmount("zero or more"));
    }

    let context = load_context(&env.api, &env.session)?;
    if let Some(current) = context.current.as_ref().filter(|s| s.is_open()) {
        return Err(CajaError::SessionAlreadyOpen(current.id.clone()));
    }

    let session = env.api.open_session(&OpenSessionRequest {
        usuario_id: context.actor.user_id.clone(),
        monto_inicial: amount,
    })?;
    info!(session = %session.id, "cash session opened");

    println!(
        "Opened caja #{} with {}",
        session.id,
        env.config.display.currency().amount(amount)
    );
    Ok(())
}

fn cmd_movement(
    env: &Env,
    session_id: &str,
    kind: MovementKind,
    amount: f64,
    concept: String,
) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CajaError::InvalidAmount("greater than zero"));
    }

    let session = env.api.session(session_id)?;
    let action = match kind {
        MovementKind::Income => SessionAction::RegisterIncome,
        MovementKind::Expense => SessionAction::RegisterExpense,
    };
    let mut handler = CommandHandler::new(env, amount);
    handler.concept = concept;
    env.gate(&session).dispatch(action, &mut handler)
}

fn cmd_close(env: &Env, session_id: &str, counted: f64, note: Option<String>) -> Result<()> {
    if !counted.is_finite() || counted < 0.0 {
        return Err(CajaError::InvalidAmount("zero or more"));
    }

    let session = env.api.session(session_id)?;
    let mut handler = CommandHandler::new(env, counted);
    handler.note = note;
    env.gate(&session).close(&mut handler)
}

fn cmd_print(env: &Env, session_id: &str, open: bool) -> Result<()> {
    let session = env.api.session(session_id)?;
    let mut handler = CommandHandler::new(env, 0.0);
    handler.open_report = open;
    env.gate(&session)
        .dispatch(SessionAction::PrintReport, &mut handler)
}

/// Gate callbacks backed by the API. Only the fields of the dispatched
/// action are read.
struct CommandHandler<'a> {
    env: &'a Env,
    amount: f64,
    concept: String,
    note: Option<String>,
    open_report: bool,
}

impl<'a> CommandHandler<'a> {
    fn new(env: &'a Env, amount: f64) -> Self {
        Self {
            env,
            amount,
            concept: String::new(),
            note: None,
            open_report: false,
        }
    }

    fn movement(&self, session: &CashSession, kind: MovementKind) -> Result<()> {
        let movement = self.env.api.register_movement(
            &session.id,
            &MovementRequest {
                kind,
                amount: self.amount,
                concept: self.concept.clone(),
            },
        )?;
        let label = match movement.kind {
            MovementKind::Income => "income",
            MovementKind::Expense => "expense",
        };
        println!(
            "Registered {label} of {} on caja #{} ({})",
            self.env.config.display.currency().amount(movement.amount),
            session.id,
            movement.concept
        );
        Ok(())
    }
}

impl ActionHandler for CommandHandler<'_> {
    fn register_income(&mut self, session: &CashSession) -> Result<()> {
        self.movement(session, MovementKind::Income)
    }

    fn register_expense(&mut self, session: &CashSession) -> Result<()> {
        self.movement(session, MovementKind::Expense)
    }

    fn close(&mut self, session: &CashSession, kind: ClosureKind) -> Result<()> {
        let record = self.env.api.close_session(
            &session.id,
            &CloseRequest {
                kind,
                counted_cash: self.amount,
                note: self.note.clone(),
            },
        )?;
        info!(session = %session.id, %kind, "cash session closed");

        let fmt = self.env.config.display.currency();
        let heading = match kind {
            ClosureKind::Normal => "Closed",
            ClosureKind::Administrative => "Administratively closed",
        };
        println!("{heading} caja #{} ({})", session.id, session.owner.name);
        println!("  Expected:   {}", fmt.format(record.expected_cash.as_ref()));
        println!("  Counted:    {}", fmt.format(record.counted_cash.as_ref()));
        println!("  Difference: {}", fmt.format(record.difference.as_ref()));
        println!("Print the report with: caja print {}", session.id);
        Ok(())
    }

    fn print_report(&mut self, session: &CashSession) -> Result<()> {
        let output_dir = resolve_output_dir(&self.env.config.report.output_dir, &self.env.cfg_dir);
        let path = report::write_report(
            session,
            &self.env.config.business,
            &self.env.config.display.currency(),
            &output_dir,
        )?;
        println!("Report saved: {}", path.display());

        if self.open_report {
            open_path(&path)?;
        }
        Ok(())
    }
}

fn open_path(path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", path.to_str().unwrap_or("")])
            .spawn()?;
    }
    Ok(())
}
