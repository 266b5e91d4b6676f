use std::io::Read;

use clap::Parser;
use indexmap::IndexMap;

use crate::cli::args::{
    ApiKeyPlacement, CollectionCommand, DataCommand, EnvCommand, HistoryCommand, ImportArgs,
    RequestCommand, SendArgs,
};
use crate::cli::{Args, AuthType, Command};
use crate::config::Config;
use crate::curl;
use crate::errors::{ReqpadError, Result};
use crate::logging::init_tracing;
use crate::middleware::auth::{ApiKeyLocation, AuthConfig, BasicAuth};
use crate::models::{now_millis, Collection, Environment};
use crate::output::{self, table, Painter};
use crate::service::RequestService;
use crate::status::ExitStatus;
use crate::store::Store;
use crate::vars;

/// Main entry point for the CLI.
///
/// Handles argument parsing, logging setup and the async runtime, then
/// dispatches to the subcommand handler.
pub fn run(args: Vec<String>) -> ExitStatus {
    let parsed = match Args::try_parse_from(&args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    init_tracing(parsed.verbose, parsed.log_format);
    let traceback = parsed.traceback;

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return ExitStatus::Error;
        }
    };

    match runtime.block_on(program(parsed)) {
        Ok(status) => status,
        Err(e) => handle_error(e, traceback),
    }
}

pub async fn program(args: Args) -> Result<ExitStatus> {
    tracing::debug!(?args, "parsed arguments");
    let config = Config::load(args.config_dir.as_deref())?;

    if let Command::Config = args.command {
        print_config(&config);
        return Ok(ExitStatus::Success);
    }

    let service = RequestService::from_config(config)?;
    let painter = Painter::detect();

    match args.command {
        Command::Import(import) => run_import(&service, import, painter),
        Command::Export { id, pretty } => {
            let command = service.export_curl(&id)?;
            if pretty {
                println!("{}", curl::format_curl_pretty(&command));
            } else {
                println!("{}", command);
            }
            Ok(ExitStatus::Success)
        }
        Command::Send(send) => run_send(&service, send, painter).await,
        Command::Request(cmd) => run_request(service.store(), cmd, painter),
        Command::Collection(cmd) => run_collection(service.store(), cmd),
        Command::Env(cmd) => run_env(service.store(), cmd),
        Command::History(cmd) => run_history(service.store(), cmd, painter),
        Command::Data(cmd) => run_data(service.store(), cmd),
        Command::Config => Ok(ExitStatus::Success),
    }
}

fn handle_error(error: ReqpadError, traceback: bool) -> ExitStatus {
    if traceback {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {}", error);
    }

    // All errors return the same exit code (1) following Unix conventions
    ExitStatus::Error
}

fn print_config(config: &Config) {
    println!("config file:        {}", config.config_file().display());
    println!("store:              {}", config.storage_path.display());
    println!("timeout:            {}", humantime::format_duration(config.timeout));
    println!("verify_ssl:         {}", config.verify_ssl);
    println!("auto_save_requests: {}", config.auto_save_requests);
    for (name, value) in &config.default_headers {
        println!("header:             {}: {}", name, value);
    }
}

fn run_import(service: &RequestService, args: ImportArgs, painter: Painter) -> Result<ExitStatus> {
    let command = match args.command.as_deref() {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(cmd) => cmd.to_string(),
    };

    let collection_id = args
        .collection
        .as_deref()
        .map(|key| resolve_collection(service.store(), key).map(|c| c.id))
        .transpose()?;

    let request = service.import_curl(&command, args.name.as_deref(), collection_id, !args.dry_run)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&request)?);
    } else {
        if !args.dry_run {
            println!("{}", painter.success(&format!("Saved request {}", request.id)));
        }
        print!("{}", output::render_request(&request, painter));
    }
    Ok(ExitStatus::Success)
}

async fn run_send(service: &RequestService, args: SendArgs, painter: Painter) -> Result<ExitStatus> {
    let auth = auth_from_args(&args)?;

    let request = if args.curl {
        service.import_curl(&args.target, None, None, false)?
    } else {
        service
            .store()
            .request(&args.target)
            .ok_or_else(|| ReqpadError::not_found("request", &args.target))?
    };

    let record = service.send(&request, &auth).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", output::render_response(&record, painter, args.headers));
    }

    Ok(ExitStatus::from_response(record.status_code, record.is_error, args.check_status))
}

/// Build the request authentication from `--auth` / `--auth-type`
fn auth_from_args(args: &SendArgs) -> Result<AuthConfig> {
    let Some(credentials) = &args.auth else {
        return Ok(AuthConfig::None);
    };
    let credentials = credentials.as_str();

    Ok(match args.auth_type {
        AuthType::Basic => AuthConfig::Basic(BasicAuth::from_credentials(credentials)),
        AuthType::Bearer => AuthConfig::bearer(credentials),
        AuthType::ApiKey => {
            let (name, value) = credentials.split_once(':').ok_or_else(|| {
                ReqpadError::Argument("api-key credentials must be NAME:VALUE".to_string())
            })?;
            let location = match args.api_key_in {
                ApiKeyPlacement::Header => ApiKeyLocation::Header,
                ApiKeyPlacement::Query => ApiKeyLocation::QueryParam,
            };
            AuthConfig::api_key(name.trim(), value.trim(), location)
        }
    })
}

fn run_request(store: &Store, cmd: RequestCommand, painter: Painter) -> Result<ExitStatus> {
    match cmd {
        RequestCommand::List { collection, search, limit } => {
            let mut requests = match collection.as_deref() {
                Some(key) => store.requests_in_collection(&resolve_collection(store, key)?.id),
                None => store.list_requests(),
            };
            if let Some(query) = search.as_deref() {
                let matching: Vec<String> =
                    store.search_requests(query).into_iter().map(|r| r.id).collect();
                requests.retain(|r| matching.contains(&r.id));
            }
            if let Some(limit) = limit {
                requests.truncate(limit);
            }
            println!("{}", table::requests_table(&requests));
        }
        RequestCommand::Show { id } => {
            let request = store
                .request(&id)
                .ok_or_else(|| ReqpadError::not_found("request", &id))?;
            print!("{}", output::render_request(&request, painter));
            let history = store.responses_for_request(&id);
            if let Some(last) = history.first() {
                println!(
                    "\n{} responses recorded, last: {} {}",
                    history.len(),
                    last.status_code,
                    table::format_timestamp(last.timestamp)
                );
            }
        }
        RequestCommand::Delete { id } => {
            if !store.delete_request(&id)? {
                return Err(ReqpadError::not_found("request", id));
            }
            println!("Deleted request {}", id);
        }
        RequestCommand::Duplicate { id } => {
            let copy = store.duplicate_request(&id)?;
            println!("{}", copy.id);
        }
    }
    Ok(ExitStatus::Success)
}

fn run_collection(store: &Store, cmd: CollectionCommand) -> Result<ExitStatus> {
    match cmd {
        CollectionCommand::List { search } => {
            let collections = match search.as_deref() {
                Some(query) => store.search_collections(query),
                None => store.list_collections(),
            };
            let mut counts: IndexMap<String, usize> = IndexMap::new();
            for request in store.snapshot().requests.values() {
                if let Some(id) = &request.collection_id {
                    *counts.entry(id.clone()).or_default() += 1;
                }
            }
            println!("{}", table::collections_table(&collections, &counts));
        }
        CollectionCommand::Create { name, description } => {
            let collection = store.create_collection(Collection::new(name, description))?;
            println!("{}", collection.id);
        }
        CollectionCommand::Show { collection } => {
            let collection = resolve_collection(store, &collection)?;
            println!("{} ({})", collection.name, collection.id);
            if let Some(description) = &collection.description {
                println!("{}", description);
            }
            println!("{}", table::requests_table(&store.requests_in_collection(&collection.id)));
        }
        CollectionCommand::Delete { collection } => {
            let collection = resolve_collection(store, &collection)?;
            store.delete_collection(&collection.id)?;
            println!("Deleted collection {}", collection.name);
        }
    }
    Ok(ExitStatus::Success)
}

fn run_env(store: &Store, cmd: EnvCommand) -> Result<ExitStatus> {
    match cmd {
        EnvCommand::List => {
            println!("{}", table::environments_table(&store.list_environments()));
        }
        EnvCommand::Create { name, vars: assignments, from_dotenv, activate } => {
            let mut variables = match from_dotenv {
                Some(path) => vars::parse_dotenv(&std::fs::read_to_string(&path)?)?,
                None => IndexMap::new(),
            };
            for assignment in &assignments {
                let (key, value) = assignment.split_once('=').ok_or_else(|| {
                    ReqpadError::Argument(format!("expected NAME=VALUE, got '{}'", assignment))
                })?;
                variables.insert(key.trim().to_string(), value.to_string());
            }

            let mut env = Environment::new(name, variables);
            env.is_active = activate;
            let env = store.create_environment(env)?;
            println!("{}", env.id);
        }
        EnvCommand::Show { env } => {
            let env = resolve_environment(store, &env)?;
            let marker = if env.is_active { " (active)" } else { "" };
            println!("{} ({}){}", env.name, env.id, marker);
            println!("{}", table::variables_table(&env.variables));
        }
        EnvCommand::Set { env, name, value } => {
            let mut env = resolve_environment(store, &env)?;
            env.variables.insert(name, value);
            store.update_environment(env)?;
        }
        EnvCommand::Unset { env, name } => {
            let mut env = resolve_environment(store, &env)?;
            if env.variables.shift_remove(&name).is_none() {
                return Err(ReqpadError::not_found("variable", name));
            }
            store.update_environment(env)?;
        }
        EnvCommand::Activate { env } => {
            let env = resolve_environment(store, &env)?;
            store.set_active_environment(&env.id)?;
            println!("Active environment: {}", env.name);
        }
        EnvCommand::Delete { env } => {
            let env = resolve_environment(store, &env)?;
            store.delete_environment(&env.id)?;
            println!("Deleted environment {}", env.name);
        }
    }
    Ok(ExitStatus::Success)
}

fn run_history(store: &Store, cmd: HistoryCommand, painter: Painter) -> Result<ExitStatus> {
    match cmd {
        HistoryCommand::List { request, limit } => {
            let mut responses = match request.as_deref() {
                Some(id) => store.responses_for_request(id),
                None => store.list_responses(),
            };
            responses.truncate(limit);
            println!("{}", table::history_table(&responses));
        }
        HistoryCommand::Show { id, headers } => {
            let record = store
                .response(&id)
                .ok_or_else(|| ReqpadError::not_found("response", &id))?;
            print!("{}", output::render_response(&record, painter, headers));
        }
        HistoryCommand::Clear { older_than, request } => {
            let removed = if let Some(age) = older_than {
                let age = humantime::parse_duration(&age)
                    .map_err(|e| ReqpadError::Argument(format!("invalid duration '{}': {}", age, e)))?;
                store.delete_responses_older_than(cutoff_for_age(now_millis(), age))?
            } else if let Some(id) = request {
                store.delete_responses_for_request(&id)?
            } else {
                store.clear_responses()?
            };
            println!("Removed {} responses", removed);
        }
    }
    Ok(ExitStatus::Success)
}

fn run_data(store: &Store, cmd: DataCommand) -> Result<ExitStatus> {
    match cmd {
        DataCommand::Export { path } => {
            store.export_to(&path)?;
            println!("Exported to {}", path.display());
        }
        DataCommand::Import { path } => {
            let summary = store.import_from(&path)?;
            println!(
                "Imported {} requests, {} responses, {} collections, {} environments",
                summary.requests, summary.responses, summary.collections, summary.environments
            );
        }
    }
    Ok(ExitStatus::Success)
}

/// Timestamp `age` before `now`, clamped so huge ages reach back past every record
fn cutoff_for_age(now: i64, age: std::time::Duration) -> i64 {
    let age = i64::try_from(age.as_millis()).unwrap_or(i64::MAX);
    now.saturating_sub(age)
}

/// Look up by id, then by case-insensitive name
fn resolve_collection(store: &Store, key: &str) -> Result<Collection> {
    if let Some(collection) = store.collection(key) {
        return Ok(collection);
    }
    store
        .list_collections()
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(key))
        .ok_or_else(|| ReqpadError::not_found("collection", key))
}

/// Look up by id, then by case-insensitive name
fn resolve_environment(store: &Store, key: &str) -> Result<Environment> {
    if let Some(env) = store.environment(key) {
        return Ok(env);
    }
    store
        .list_environments()
        .into_iter()
        .find(|e| e.name.eq_ignore_ascii_case(key))
        .ok_or_else(|| ReqpadError::not_found("environment", key))
}
