//! # CLI Layer
//!
//! This module is **one possible UI client** for dialbook. It is the only
//! place that:
//! - Knows about terminal I/O (stdout, stderr, the confirmation prompt)
//! - Handles argument parsing
//! - Installs the log subscriber
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: parses arguments, resolves configuration, picks the gateway
//! - `dispatch()`: mounts both lists, then hands off to a resource handler
//! - `handle_*()`: per-command handlers that call the API and print results
//!
//! Every resource command starts by loading both lists, the same way a
//! screen would on open. Load failures go to stderr and the command still
//! runs against whatever did load.

use super::render::{
    eprint_messages, print_messages, render_config, render_country_list, render_prefix_list,
    render_records,
};
use super::setup::{Cli, Commands, CountryCommands, PrefixCommands};
use clap::Parser;
use dialbook::api::{CmdResult, ConfigAction, DialbookApi};
use dialbook::commands;
use dialbook::config::{check_base_url, DialbookConfig, ENV_CONFIG_DIR};
use dialbook::error::{DialbookError, Result};
use dialbook::gateway::http::HttpGateway;
use dialbook::gateway::memory::InMemoryGateway;
use dialbook::gateway::Gateway;
use dialbook::search::{CountrySearch, PrefixSearch};
use directories::ProjectDirs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

enum Target {
    Country(CountryCommands),
    Prefix(PrefixCommands),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_dir = config_dir()?;
    let target = match cli.command {
        Commands::Config { key, value } => return handle_config(&config_dir, key, value),
        Commands::Country { action } => Target::Country(action),
        Commands::Prefix { action } => Target::Prefix(action),
    };

    let mut config = DialbookConfig::load(&config_dir)?.with_env_overrides();
    if let Some(url) = cli.base_url {
        check_base_url(&url)?;
        config.base_url = url;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if cli.demo {
        debug!("running against built-in sample data");
        let api = DialbookApi::new(InMemoryGateway::seeded(), config_dir)
            .with_submit_timeout(config.submit_timeout());
        runtime.block_on(dispatch(api, target))
    } else {
        debug!(base_url = %config.base_url, "using HTTP gateway");
        let gateway = HttpGateway::new(config.gateway())?;
        let api =
            DialbookApi::new(gateway, config_dir).with_submit_timeout(config.submit_timeout());
        runtime.block_on(dispatch(api, target))
    }
}

/// `RUST_LOG` wins; otherwise warnings only, or debug for our crate with `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("warn,dialbook=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("com", "dialbook", "dialbook")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| DialbookError::Config("Could not determine config dir".to_string()))
}

async fn dispatch<G: Gateway>(mut api: DialbookApi<G>, target: Target) -> Result<()> {
    let mounted = api.mount().await?;
    eprint_messages(&mounted.messages);

    match target {
        Target::Country(action) => handle_country(&mut api, action).await,
        Target::Prefix(action) => handle_prefix(&mut api, action).await,
    }
}

async fn handle_country<G: Gateway>(
    api: &mut DialbookApi<G>,
    action: CountryCommands,
) -> Result<()> {
    let result = match action {
        CountryCommands::List => {
            let result = api.list_countries()?;
            print!("{}", render_country_list(&result.listed_countries));
            result
        }
        CountryCommands::Show { code } => {
            let result = api.show_country(&code).await?;
            print!("{}", render_records(&result.affected));
            result
        }
        CountryCommands::Create { code, fields } => {
            api.create_country(&fields.pairs(code.as_deref())).await?
        }
        CountryCommands::Update { code, fields } => {
            api.update_country(&code, &fields.pairs(None)).await?
        }
        CountryCommands::Delete { code, yes } => {
            let asked = api.request_country_delete(&code)?;
            if !yes && !confirm(&asked)? {
                api.cancel_country_delete()?
            } else {
                api.confirm_country_delete(&code).await?
            }
        }
        CountryCommands::Search { value } => {
            let (mode, term) = match value {
                Some(term) => (CountrySearch::ByExactValue, term),
                None => (CountrySearch::All, String::new()),
            };
            let result = api.search_countries(mode, &term).await?;
            print!("{}", render_country_list(&result.listed_countries));
            result
        }
        CountryCommands::Import { path } => api.import_countries(&path).await?,
    };

    print_messages(&result.messages);
    Ok(())
}

async fn handle_prefix<G: Gateway>(api: &mut DialbookApi<G>, action: PrefixCommands) -> Result<()> {
    let result = match action {
        PrefixCommands::List => {
            let result = api.list_prefixes()?;
            print!("{}", render_prefix_list(&result.listed_prefixes));
            result
        }
        PrefixCommands::Show { id } => {
            let result = api.show_prefix(id).await?;
            print!("{}", render_records(&result.affected));
            result
        }
        PrefixCommands::Create { fields } => api.create_prefix(&fields.pairs()).await?,
        PrefixCommands::Update { id, fields } => api.update_prefix(id, &fields.pairs()).await?,
        PrefixCommands::Delete { id, yes } => {
            let asked = api.request_prefix_delete(id)?;
            if !yes && !confirm(&asked)? {
                api.cancel_prefix_delete()?
            } else {
                api.confirm_prefix_delete(id).await?
            }
        }
        PrefixCommands::Search { code, name } => {
            let (mode, term) = match (code, name) {
                (Some(code), _) => (PrefixSearch::ByCountryCode, code),
                (None, Some(name)) => (PrefixSearch::ByCountryName, name),
                (None, None) => (PrefixSearch::All, String::new()),
            };
            let result = api.search_prefixes(mode, &term).await?;
            print!("{}", render_prefix_list(&result.listed_prefixes));
            result
        }
    };

    print_messages(&result.messages);
    Ok(())
}

/// Show what is about to be deleted and ask. Anything but y/yes is a no,
/// including a closed stdin.
fn confirm(asked: &CmdResult) -> Result<bool> {
    print_messages(&asked.messages);
    print!("{}", render_records(&asked.affected));
    print!("Delete? [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn handle_config(config_dir: &Path, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = commands::config::run(config_dir, action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_messages(&result.messages);
    Ok(())
}
