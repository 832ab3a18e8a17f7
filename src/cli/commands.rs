//! Command dispatch: builds the session from settings and runs one command.

use std::io;
use std::path::PathBuf;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::SelectorSession;
use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands, FilterArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{NodeId, SearchOutcome, TreeView, ANY_TOKEN};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, SelectionItem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None => Err(CliError::Usage(
            "no command given, see `areapick --help`".to_string(),
        )),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(command) => {
            let container = ServiceContainer::new(load_settings(cli)?)?;
            let mut session = open_session(&container)?;
            match command {
                Commands::Tree { filters } => {
                    apply_filters(&mut session, filters)?;
                    cmd_tree(&session)
                }
                Commands::Search { term } => cmd_search(&session, term),
                Commands::Pick { keep_defaults } => {
                    cmd_pick(&container, &mut session, *keep_defaults)
                }
                Commands::Payload { filters } => {
                    apply_filters(&mut session, filters)?;
                    cmd_payload(&session)
                }
                Commands::Submit { filters } => {
                    apply_filters(&mut session, filters)?;
                    cmd_submit(&container, &session)
                }
                Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
            }
        }
    }
}

fn local_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.config_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("get current directory", e).into()),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let dir = local_dir(cli)?;
    let mut settings = Settings::load(Some(dir.as_path()))?;
    if let Some(catalog) = &cli.catalog {
        settings.catalog_path = catalog.clone();
    }
    debug!("load_settings: {:?}", settings);
    Ok(settings)
}

fn open_session(container: &ServiceContainer) -> CliResult<SelectorSession> {
    let settings = &container.settings;
    let store = container
        .catalog_service()
        .load_or_empty(&settings.catalog_path, &settings.hidden_root_name);
    if store.is_empty() {
        output::warning(&format!(
            "no areas loaded from {}",
            settings.catalog_path.display()
        ));
    }
    Ok(SelectorSession::new(store, settings.defaults.clone())?)
}

/// Apply selection and filter edits as one batch.
#[instrument(level = "debug", skip(session))]
pub fn apply_filters(session: &mut SelectorSession, filters: &FilterArgs) -> CliResult<()> {
    if filters.is_empty() {
        return Ok(());
    }
    session.batch(|s| -> CliResult<()> {
        if filters.no_defaults {
            clear_selection(s);
        }
        for name in &filters.deselect {
            s.deselect_by_name(name)?;
        }
        for name in &filters.areas {
            s.select_by_name(name)?;
        }
        if let Some(min) = filters.min_price {
            s.set_min_price(min);
        }
        if let Some(max) = filters.max_price {
            s.set_max_price(max);
        }
        for token in &filters.bedrooms {
            s.toggle_bedroom(parse_bedroom_arg(token)?)?;
        }
        if let Some(token) = &filters.bathrooms {
            s.set_bathroom(token)?;
        }
        if let Some(token) = &filters.fees {
            s.set_fee(token)?;
        }
        Ok(())
    })
}

fn clear_selection(session: &mut SelectorSession) {
    let ids: Vec<NodeId> = session.selection().members().iter().map(|m| m.id).collect();
    for id in ids {
        session.deselect(id);
    }
}

/// `any` or a bucket number.
fn parse_bedroom_arg(token: &str) -> CliResult<Option<u8>> {
    let token = token.trim();
    if token.eq_ignore_ascii_case(ANY_TOKEN) {
        return Ok(None);
    }
    token
        .parse::<u8>()
        .map(Some)
        .map_err(|_| CliError::InvalidArgs(format!("bedroom bucket {token:?}, expected 0-4 or any")))
}

fn cmd_tree(session: &SelectorSession) -> CliResult<()> {
    let tree = session
        .store()
        .to_display_tree(None, Some(session.selection()));
    output::info(&tree);
    if session.reset_visible() {
        output::detail(&"(modified from defaults)");
    }
    Ok(())
}

#[instrument(level = "debug", skip(session))]
fn cmd_search(session: &SelectorSession, term: &str) -> CliResult<()> {
    let outcome = session.search(term);
    let tree = session
        .store()
        .to_display_tree(outcome.result(), Some(session.selection()));
    output::info(&tree);
    if let SearchOutcome::Filtered(result) = &outcome {
        if result.matches.is_empty() {
            output::warning(&format!("no areas match {term:?}"));
        }
    }
    Ok(())
}

/// Picker entries: the area path without the hidden root, keyed by node id.
pub fn pick_items(session: &SelectorSession) -> Vec<SelectionItem> {
    let store = session.store();
    store
        .iter()
        .filter(|n| n.name != store.hidden_root_name())
        .map(|n| {
            let mut path: Vec<&str> = store
                .ancestor_chain(n.id)
                .unwrap_or_default()
                .into_iter()
                .rev()
                .filter_map(|id| store.find_by_id(id).ok())
                .filter(|a| a.name != store.hidden_root_name())
                .map(|a| a.name.as_str())
                .collect();
            path.push(&n.name);
            SelectionItem {
                display: path.join(" / "),
                value: n.id.to_string(),
            }
        })
        .collect()
}

/// Pick one area with the container's selector and add it to the selection.
///
/// Starts from an empty selection unless `keep_defaults` is set.
#[instrument(level = "debug", skip(container, session))]
pub fn cmd_pick(
    container: &ServiceContainer,
    session: &mut SelectorSession,
    keep_defaults: bool,
) -> CliResult<()> {
    if !keep_defaults {
        session.batch(clear_selection);
    }

    let items = pick_items(session);
    let picked = container
        .selector
        .select_one(&items, "area> ")
        .map_err(|message| InfraError::Selector { message })?;
    let Some(item) = picked else {
        output::warning(&"nothing picked");
        return Ok(());
    };

    let id: NodeId = item.value.parse().map_err(|_| InfraError::Selector {
        message: format!("unexpected item value {:?}", item.value),
    })?;
    match session.select(id)? {
        Some(added) => {
            output::action("Selected", &item.display);
            for node in &added {
                output::added(&node.name);
            }
        }
        None => output::detail(&format!("{} already selected", item.display)),
    }

    output::header(&"Selection");
    for name in session.selection().to_name_list() {
        output::detail(&name);
    }
    Ok(())
}

fn cmd_payload(session: &SelectorSession) -> CliResult<()> {
    let payload = session.payload()?;
    let json =
        serde_json::to_string_pretty(&payload).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize payload".to_string(),
            source: Box::new(e),
        })?;
    output::info(&json);
    Ok(())
}

fn cmd_submit(container: &ServiceContainer, session: &SelectorSession) -> CliResult<()> {
    let body = session.submit(container.scoring.as_ref())?;
    output::success(&format!(
        "submitted {} area(s)",
        session.selection().len()
    ));
    output::info(&body);
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("cannot determine global config directory".to_string())
                })?
            } else {
                local_config_path(&local_dir(cli)?)
            };
            let fs = RealFileSystem;
            if fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            fs.ensure_parent(&path)
                .with_path_context("create config directory", &path)?;
            fs.write(&path, &Settings::template())
                .with_path_context("write config", &path)?;
            output::action("Created", &path.display());
            Ok(())
        }
        ConfigCommands::Path => {
            let local = local_config_path(&local_dir(cli)?);
            match global_config_path() {
                Some(global) => output::action("global", &mark_exists(&global)),
                None => output::action("global", &"(unavailable)"),
            }
            output::action("local", &mark_exists(&local));
            Ok(())
        }
    }
}

fn mark_exists(path: &std::path::Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}
