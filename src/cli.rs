//! CLI definition and dispatch.

use chrono::{Duration, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::http_leave_adapter::{DEFAULT_HOST, DEFAULT_TIMEOUT_SECS, HttpLeaveAdapter};
use crate::domain::calendar::candidate_dates;
use crate::domain::config_validation::{
    config_auth, config_credential, config_days, config_host, config_include_owner_name,
    config_owner_id, config_timeout_secs, validate_config,
};
use crate::domain::credential::{AuthScheme, Credential};
use crate::domain::error::{HomeOfficeError, ValidationError};
use crate::domain::params::{Params, RawParams, check_dates, check_weekdays};
use crate::domain::reconcile::{self, Mode, ReconcileOptions};
use crate::domain::session::Session;
use crate::domain::summary::RunSummary;
use crate::domain::weekday::{WeekdaySet, parse_weekdays};
use crate::ports::config_port::ConfigPort;
use crate::ports::leave_port::LeavePort;

/// Default length of the requested period when `--to` is omitted.
pub const DEFAULT_PERIOD_DAYS: i64 = 60;

/// Exit code for a completed run in which at least one submission failed.
pub const PARTIAL_FAILURE_EXIT: u8 = 6;

#[derive(Parser, Debug)]
#[command(
    name = "homeofficinator",
    about = "Request remote-work days on Lucca for every missing weekday in a period"
)]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Cookie string (`name=value; ...`) or bearer token
    #[arg(long, env = "HOMEOFFICE_CREDENTIAL", hide_env_values = true)]
    pub credential: Option<String>,
    /// How the credential is sent: cookie or bearer
    #[arg(long)]
    pub auth: Option<AuthScheme>,
    /// Platform origin, e.g. https://acme.ilucca.net
    #[arg(long)]
    pub host: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RangeArgs {
    /// First day (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day (YYYY-MM-DD), defaults to 60 days after the first
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Weekdays to request, e.g. "mon,wed"
    #[arg(long)]
    pub days: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Request remote work for every selected day not yet taken
    Request {
        #[command(flatten)]
        connection: ConnectionArgs,
        #[command(flatten)]
        range: RangeArgs,
        /// Numeric user id; looked up from the credential when omitted
        #[arg(long)]
        owner_id: Option<u64>,
        /// Send the owner's display name along with each request
        #[arg(long)]
        include_owner_name: bool,
        /// Query existing leave but submit nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// List the candidate days without contacting the platform
    Plan {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Print the user id behind the credential
    Whoami {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

/// Where and how to reach the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub host: String,
    pub auth: AuthScheme,
    pub credential: String,
    pub timeout: std::time::Duration,
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match cli.config.as_ref().map(load_config).transpose() {
        Ok(c) => c,
        Err(code) => return code,
    };
    let config = config.as_ref().map(|c| c as &dyn ConfigPort);

    if let Some(c) = config {
        if let Err(e) = validate_config(c) {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    match cli.command {
        Command::Request {
            connection,
            range,
            owner_id,
            include_owner_name,
            dry_run,
        } => run_request(
            &connection,
            &range,
            owner_id,
            include_owner_name,
            dry_run,
            config,
        ),
        Command::Plan { range } => run_plan(&range, config),
        Command::Whoami { connection } => run_whoami(&connection, config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = HomeOfficeError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Merges flags over config values. Flags win.
pub fn resolve_connection(
    args: &ConnectionArgs,
    config: Option<&dyn ConfigPort>,
) -> Result<Connection, HomeOfficeError> {
    let host = match &args.host {
        Some(h) => h.clone(),
        None => config
            .map(config_host)
            .transpose()?
            .flatten()
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
    };
    let auth = match args.auth {
        Some(a) => a,
        None => config.map(config_auth).transpose()?.flatten().unwrap_or_default(),
    };
    let credential = args
        .credential
        .clone()
        .or_else(|| config.and_then(config_credential))
        .unwrap_or_default();
    let timeout_secs = match args.timeout {
        Some(t) => t,
        None => config
            .map(config_timeout_secs)
            .transpose()?
            .flatten()
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    };
    Ok(Connection {
        host,
        auth,
        credential,
        timeout: std::time::Duration::from_secs(timeout_secs.max(1)),
    })
}

/// Resolves the period and weekday selection. An absent selection comes back
/// empty and is rejected by validation.
pub fn resolve_range(
    args: &RangeArgs,
    config: Option<&dyn ConfigPort>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate, WeekdaySet), HomeOfficeError> {
    let from = args.from.unwrap_or(today);
    let to = match args.to {
        Some(to) => to,
        None => from
            .checked_add_signed(Duration::days(DEFAULT_PERIOD_DAYS))
            .ok_or_else(|| ValidationError::InvalidRange {
                from,
                to: NaiveDate::MAX,
                reason: format!("no calendar date {DEFAULT_PERIOD_DAYS} days after the start"),
            })?,
    };
    let weekdays = match &args.days {
        Some(days) => parse_weekdays(days)?,
        None => config
            .map(config_days)
            .transpose()?
            .flatten()
            .unwrap_or_default(),
    };
    Ok((from, to, weekdays))
}

pub fn build_raw_params(
    connection: &Connection,
    range: &RangeArgs,
    owner_id: Option<u64>,
    config: Option<&dyn ConfigPort>,
    today: NaiveDate,
) -> Result<RawParams, HomeOfficeError> {
    let (date_from, date_to, weekdays) = resolve_range(range, config, today)?;
    let owner_id = match owner_id {
        Some(id) => Some(id),
        None => config.map(config_owner_id).transpose()?.flatten(),
    };
    Ok(RawParams {
        credential: connection.credential.clone(),
        auth: connection.auth,
        date_from,
        date_to,
        weekdays,
        owner_id,
    })
}

/// Opens a session whose port is the HTTP adapter, connected on first use.
pub fn http_session(connection: &Connection, credential: &Credential) -> Session<HttpLeaveAdapter> {
    let host = connection.host.clone();
    let timeout = connection.timeout;
    let credential = credential.clone();
    Session::new(move || Ok(HttpLeaveAdapter::connect(&host, &credential, timeout)?))
}

/// Streams the reconciliation log to `out`, one line per entry, and tallies it.
pub fn run_reconciliation<P: LeavePort, W: Write>(
    session: &mut Session<P>,
    params: &Params,
    options: ReconcileOptions,
    out: &mut W,
) -> Result<RunSummary, HomeOfficeError> {
    let log = reconcile::start(session, params, options)?;
    eprintln!(
        "Owner {}: {} day(s) already on record",
        log.owner().id,
        log.existing().len()
    );
    let mut summary = RunSummary::default();
    for entry in log {
        writeln!(out, "{entry}")?;
        out.flush()?;
        summary.record(&entry);
    }
    Ok(summary)
}

/// Resolves and validates everything a request run needs, before any I/O.
pub fn prepare_request(
    connection_args: &ConnectionArgs,
    range: &RangeArgs,
    owner_id: Option<u64>,
    config: Option<&dyn ConfigPort>,
    today: NaiveDate,
) -> Result<(Connection, Params), HomeOfficeError> {
    let connection = resolve_connection(connection_args, config)?;
    let raw = build_raw_params(&connection, range, owner_id, config, today)?;
    let params = Params::validate(raw)?;
    Ok((connection, params))
}

fn run_request(
    connection_args: &ConnectionArgs,
    range: &RangeArgs,
    owner_id: Option<u64>,
    include_owner_name: bool,
    dry_run: bool,
    config: Option<&dyn ConfigPort>,
) -> ExitCode {
    let (connection, params) =
        match prepare_request(connection_args, range, owner_id, config, today()) {
            Ok(prepared) => prepared,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };

    let options = ReconcileOptions {
        mode: if dry_run { Mode::DryRun } else { Mode::Submit },
        include_owner_name: include_owner_name || config.is_some_and(config_include_owner_name),
    };

    eprintln!(
        "Requesting remote work on {} from {} to {} via {}{}",
        params.weekdays(),
        params.date_from(),
        params.date_to(),
        connection.host,
        if dry_run { " (dry run)" } else { "" }
    );

    let mut session = http_session(&connection, params.credential());
    let stdout = io::stdout();
    let result = run_reconciliation(&mut session, &params, options, &mut stdout.lock());
    session.close();

    match result {
        Ok(summary) => {
            eprintln!("\n{summary}");
            if summary.has_failures() {
                ExitCode::from(PARTIAL_FAILURE_EXIT)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Lists candidate days for the selection, checked the same way a request is.
pub fn plan(
    range: &RangeArgs,
    config: Option<&dyn ConfigPort>,
    today: NaiveDate,
) -> Result<Vec<NaiveDate>, HomeOfficeError> {
    let (from, to, weekdays) = resolve_range(range, config, today)?;
    check_dates(from, to)?;
    check_weekdays(&weekdays)?;
    Ok(candidate_dates(from, to, weekdays).collect())
}

/// Writes one `YYYY-MM-DD Weekday` line per candidate day.
pub fn write_plan<W: Write>(dates: &[NaiveDate], out: &mut W) -> Result<(), HomeOfficeError> {
    for day in dates {
        writeln!(out, "{} {}", day, day.format("%A"))?;
    }
    out.flush()?;
    Ok(())
}

fn run_plan(range: &RangeArgs, config: Option<&dyn ConfigPort>) -> ExitCode {
    let result = plan(range, config, today()).and_then(|dates| {
        write_plan(&dates, &mut io::stdout().lock())?;
        Ok(dates.len())
    });
    match result {
        Ok(count) => {
            eprintln!("{count} candidate day(s)");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_whoami(connection_args: &ConnectionArgs, config: Option<&dyn ConfigPort>) -> ExitCode {
    let connection = match resolve_connection(connection_args, config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let credential = match Credential::parse(&connection.credential, connection.auth) {
        Ok(c) => c,
        Err(e) => {
            let e = HomeOfficeError::from(e);
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut session = http_session(&connection, &credential);
    let result = session.owner_id();
    session.close();

    let result = result.and_then(|id| Ok(writeln!(io::stdout().lock(), "{id}")?));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_request_flags() {
        let cli = Cli::try_parse_from([
            "homeofficinator",
            "request",
            "--credential",
            "sid=abc",
            "--from",
            "2024-01-01",
            "--to",
            "2024-01-31",
            "--days",
            "mon,wed",
            "--owner-id",
            "42",
            "--dry-run",
        ])
        .unwrap();
        match cli.command {
            Command::Request {
                connection,
                range,
                owner_id,
                dry_run,
                include_owner_name,
            } => {
                assert_eq!(connection.credential.as_deref(), Some("sid=abc"));
                assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(range.days.as_deref(), Some("mon,wed"));
                assert_eq!(owner_id, Some(42));
                assert!(dry_run);
                assert!(!include_owner_name);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_date_flag() {
        let result = Cli::try_parse_from(["homeofficinator", "plan", "--from", "01/02/2024"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_auth_scheme_flag() {
        let cli = Cli::try_parse_from(["homeofficinator", "whoami", "--auth", "bearer"]).unwrap();
        match cli.command {
            Command::Whoami { connection } => assert_eq!(connection.auth, Some(AuthScheme::Bearer)),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
