//! CLI command implementations
//!
//! Startup order: configuration, logging level, credentials, store
//! connection. A failure in any of those is fatal. Commands then run
//! against the connected session and print one JSON response per result.

use std::path::Path;

use serde_json::{json, Value};

use crate::document::VersionRecord;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::pipeline::{DirectoryFinder, LoadPipeline, LoadedUnit, StoreFinder};
use crate::resolver::Resolution;
use crate::session::{credentials_from_env, Session, SessionError};
use crate::sync::SyncReport;

use super::args::{Cli, Command, GlobalArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(&cli.global, cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(global: &GlobalArgs, cmd: Command) -> CliResult<()> {
    let config = Config::from_args(global)?;
    Logger::set_min_severity(if config.debug {
        Severity::Trace
    } else {
        Severity::Info
    });
    log_event_with_fields(
        Event::ConfigLoaded,
        &[("prefix", config.prefix.as_str()), ("url", config.url.as_str())],
    );

    let mut session = connect(&config)?;

    match cmd {
        Command::Load { names, search_path } => {
            let search_path = search_path.or_else(|| config.search_path.clone());
            for unit in load(session, &names, search_path.as_deref(), &config.source_suffix)? {
                write_response(serde_json::to_value(unit)?)?;
            }
            Ok(())
        }
        Command::Sync { dir } => {
            let report = sync(&session, &dir)?;
            write_response(serde_json::to_value(report)?)
        }
        Command::History { name, with_source } => {
            write_response(history(&mut session, &name, with_source)?)
        }
    }
}

/// Credentials from the environment, then a connected session
fn connect(config: &Config) -> CliResult<Session> {
    let session = credentials_from_env()
        .and_then(|credentials| Session::connect(&config.url, &credentials, &config.prefix))
        .map_err(|e| {
            log_startup_failure(&e, &config.url);
            CliError::from(e)
        })?;

    Ok(session.with_source_suffix(config.source_suffix.clone()))
}

/// FATAL line for errors that end the process at startup
fn startup_failure_event(err: &SessionError) -> Option<Event> {
    if !err.is_fatal() {
        return None;
    }
    match err {
        SessionError::Configuration(_) => Some(Event::CredentialsMissing),
        _ => Some(Event::StoreConnectFailed),
    }
}

fn log_startup_failure(err: &SessionError, url: &str) {
    if let Some(event) = startup_failure_event(err) {
        let reason = err.to_string();
        log_event_with_fields(event, &[("reason", reason.as_str()), ("url", url)]);
    }
}

/// Load each name through the store, then the optional local search path
pub fn load(
    session: Session,
    names: &[String],
    search_path: Option<&Path>,
    source_suffix: &str,
) -> CliResult<Vec<LoadedUnit>> {
    let mut pipeline = LoadPipeline::new().with_finder(Box::new(StoreFinder::new(session)));
    if let Some(root) = search_path {
        pipeline.register(Box::new(DirectoryFinder::new(root).with_suffix(source_suffix)));
    }

    names
        .iter()
        .map(|name| pipeline.load(name).map_err(CliError::from))
        .collect()
}

/// Push a source tree
pub fn sync(session: &Session, dir: &Path) -> CliResult<SyncReport> {
    if !dir.is_dir() {
        return Err(CliError::io_error(format!(
            "{} is not a directory",
            dir.display()
        )));
    }
    Ok(session.sync_tree(dir)?)
}

fn version_json(record: &VersionRecord, with_source: bool) -> Value {
    let mut value = json!({
        "versionId": record.version_id,
        "createdAt": record.created_at,
    });
    if with_source {
        value["source"] = json!(record.source);
    }
    value
}

/// Current version and history of one unit
pub fn history(session: &mut Session, name: &str, with_source: bool) -> CliResult<Value> {
    let unit = match session.resolve(name)? {
        Resolution::Found(unit) => unit,
        Resolution::NotFound => return Err(CliError::unit_not_found(name)),
    };

    let document = &unit.document;
    Ok(json!({
        "name": unit.name.as_str(),
        "namespace": unit.namespace,
        "key": unit.key.as_str(),
        "isPackage": unit.is_package,
        "current": document.current.as_ref().map(|c| version_json(c, with_source)),
        "history": document
            .history
            .iter()
            .map(|r| version_json(r, with_source))
            .collect::<Vec<_>>(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::cli::errors::CliErrorCode;
    use crate::document::{DocumentKey, QualifiedName, VersionedDocument};
    use crate::store::{DocumentStore, MemoryStore};

    fn session(store: &Arc<MemoryStore>) -> Session {
        Session::open(Box::new(Arc::clone(store)), "pyc").unwrap()
    }

    #[test]
    fn test_startup_failure_events_are_fatal() {
        use crate::store::StoreError;

        let missing = SessionError::Configuration("no credentials".into());
        let refused = SessionError::Connection(StoreError::Unreachable("refused".into()));
        let later = SessionError::Store(StoreError::Unauthorized);

        assert_eq!(startup_failure_event(&missing), Some(Event::CredentialsMissing));
        assert_eq!(startup_failure_event(&refused), Some(Event::StoreConnectFailed));
        assert_eq!(startup_failure_event(&later), None);
        assert_eq!(Event::StoreConnectFailed.severity(), Severity::Fatal);
    }

    #[test]
    fn test_load_invalid_name_code() {
        let store = Arc::new(MemoryStore::with_namespaces(["pyc_pkg"]));
        let err = load(session(&store), &["pkg..util".to_string()], None, "py").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::InvalidName);
    }

    #[test]
    fn test_load_from_store() {
        let store = Arc::new(MemoryStore::with_namespaces(["pyc_pkg"]));
        let s = session(&store);
        s.push_unit("pyc_pkg", "pkg.util", "X = 1").unwrap();

        let units = load(s, &["pkg.util".to_string()], None, "py").unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].source, "X = 1");
        assert_eq!(units[0].origin, "x-couchload:pkg.util");
    }

    #[test]
    fn test_load_falls_back_to_search_path() {
        let store = Arc::new(MemoryStore::with_namespaces(["pyc_pkg"]));
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("local.py"), "LOCAL = True").unwrap();

        let units = load(session(&store), &["local".to_string()], Some(temp.path()), "py").unwrap();
        assert_eq!(units[0].source, "LOCAL = True");
    }

    #[test]
    fn test_load_unknown_unit() {
        let store = Arc::new(MemoryStore::with_namespaces(["pyc_pkg"]));
        let err = load(session(&store), &["pkg.nothing".to_string()], None, "py").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::UnitNotFound);
    }

    #[test]
    fn test_load_shell_is_stale_reference() {
        let store = Arc::new(MemoryStore::with_namespaces(["pyc_pkg"]));
        let name = QualifiedName::parse("pkg.empty").unwrap();
        store
            .create("pyc_pkg", &VersionedDocument::shell(&DocumentKey::bare(&name)))
            .unwrap();

        let err = load(session(&store), &["pkg.empty".to_string()], None, "py").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::StaleReference);
    }

    #[test]
    fn test_sync_requires_directory() {
        let store = Arc::new(MemoryStore::new());
        let err = sync(&session(&store), Path::new("/nonexistent/tree")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::IoError);
    }

    #[test]
    fn test_history_lists_versions_newest_first() {
        let store = Arc::new(MemoryStore::with_namespaces(["pyc_pkg"]));
        let mut s = session(&store);
        s.push_unit("pyc_pkg", "pkg.util", "A").unwrap();
        s.push_unit("pyc_pkg", "pkg.util", "B").unwrap();
        s.push_unit("pyc_pkg", "pkg.util", "C").unwrap();

        let value = history(&mut s, "pkg.util", true).unwrap();
        assert_eq!(value["current"]["source"], "C");
        assert_eq!(value["history"][0]["source"], "B");
        assert_eq!(value["history"][1]["source"], "A");
        assert_eq!(value["isPackage"], false);
    }

    #[test]
    fn test_history_omits_source_by_default() {
        let store = Arc::new(MemoryStore::with_namespaces(["pyc_pkg"]));
        let mut s = session(&store);
        s.push_unit("pyc_pkg", "pkg.util", "A").unwrap();

        let value = history(&mut s, "pkg.util", false).unwrap();
        assert!(value["current"].get("source").is_none());
        assert!(value["current"]["versionId"].is_string());
    }

    #[test]
    fn test_history_unknown_unit() {
        let store = Arc::new(MemoryStore::with_namespaces(["pyc_pkg"]));
        let err = history(&mut session(&store), "other.unit", false).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::UnitNotFound);
    }
}
