//! cache-sweeper entry point.
//!
//! Runs as an Actions step: reads the step inputs, lists the repository's
//! caches and optionally deletes one of them. Workflow commands go to stdout;
//! logging goes to stderr so the runner does not mistake it for commands.

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use sweeper_client::{GithubClient, GithubConfig};
use sweeper_core::{ActionInputs, CacheApi, ConfigError, Reporter, SweepConfig, WorkflowReporter, sweep};
use tracing_subscriber::EnvFilter;

fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();
}

async fn run<A, R, F>(inputs: ActionInputs, reporter: &mut R, connect: F) -> Result<()>
where
    A: CacheApi,
    R: Reporter,
    F: FnOnce(&SweepConfig) -> Result<A>,
{
    let config = SweepConfig::from_inputs(inputs, Utc::now())?;
    tracing::info!(repository = %config.repository, "starting cache sweep");

    let api = connect(&config)?;
    let summary = sweep::run(&api, reporter, &config).await?;

    tracing::info!(listed = summary.listed, pages = summary.pages, outcome = ?summary.outcome, "cache sweep finished");

    Ok(())
}

/// Sweep with the loaded inputs and turn the report trail into the exit status.
///
/// Any error is reported as a failure. The run exits non-zero exactly when
/// something marked it failed; a missing cache is only a warning.
async fn execute<A, R, F>(inputs: Result<ActionInputs, ConfigError>, reporter: &mut R, connect: F) -> ExitCode
where
    A: CacheApi,
    R: Reporter,
    F: FnOnce(&SweepConfig) -> Result<A>,
{
    let result = match inputs {
        Ok(inputs) => run(inputs, reporter, connect).await,
        Err(err) => Err(err.into()),
    };

    if let Err(err) = result {
        tracing::error!(error = %err, "cache sweep failed");
        reporter.set_failed(&format!("{err:#}"));
    }

    if reporter.failed() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

#[tokio::main]
async fn main() -> ExitCode {
    let inputs = ActionInputs::load();
    init_logging(inputs.as_ref().is_ok_and(ActionInputs::debug_enabled));

    let mut reporter = WorkflowReporter::stdout();
    execute(inputs, &mut reporter, |config| {
        GithubClient::new(GithubConfig::from(config)).context("failed to create GitHub client")
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::{CacheEntry, Error};

    #[derive(Default)]
    struct FakeApi {
        entries: Vec<CacheEntry>,
        fail_list: bool,
        fail_delete: bool,
    }

    #[async_trait::async_trait]
    impl CacheApi for FakeApi {
        async fn list_cache_page(&self, page: u32, _per_page: u32) -> Result<Vec<CacheEntry>, Error> {
            if self.fail_list {
                return Err(Error::HttpError("500 Internal Server Error".into()));
            }
            Ok(if page == 1 { self.entries.clone() } else { Vec::new() })
        }

        async fn delete_cache_by_id(&self, _id: i64) -> Result<(), Error> {
            if self.fail_delete {
                return Err(Error::Auth("403 Resource not accessible by integration".into()));
            }
            Ok(())
        }
    }

    fn inputs(max_age: &str, cache_key: &str) -> ActionInputs {
        ActionInputs {
            max_age: Some(max_age.into()),
            token: Some("ghs_secret".into()),
            cache_key: Some(cache_key.into()),
            repository: Some("octo/widgets".into()),
            ..Default::default()
        }
    }

    fn build_cache() -> Vec<CacheEntry> {
        vec![CacheEntry::new(Some(7), "other"), CacheEntry::new(Some(42), "build-abc")]
    }

    async fn sweep_with(inputs: Result<ActionInputs, ConfigError>, api: FakeApi) -> (ExitCode, String) {
        let mut reporter = WorkflowReporter::new(Vec::new());
        let code = execute(inputs, &mut reporter, |_: &SweepConfig| Ok(api)).await;
        (code, String::from_utf8(reporter.into_inner()).unwrap())
    }

    #[tokio::test]
    async fn test_deleted_exits_zero() {
        let api = FakeApi { entries: build_cache(), ..Default::default() };
        let (code, output) = sweep_with(Ok(inputs("3600", "build-abc")), api).await;

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(output, "Cache with key build-abc deleted successfully.\n");
    }

    #[tokio::test]
    async fn test_not_found_exits_zero() {
        let api = FakeApi { entries: build_cache(), ..Default::default() };
        let (code, output) = sweep_with(Ok(inputs("3600", "missing")), api).await;

        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(output, "::warning::No cache found with key missing.\n");
    }

    #[tokio::test]
    async fn test_bad_max_age_exits_nonzero_without_connecting() {
        let mut reporter = WorkflowReporter::new(Vec::new());
        let mut connected = false;

        let code = execute(Ok(inputs("abc", "build-abc")), &mut reporter, |_: &SweepConfig| {
            connected = true;
            Ok(FakeApi::default())
        })
        .await;

        assert_eq!(code, ExitCode::FAILURE);
        assert!(!connected);
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output, "::error::Wrong value for the input 'max-age': abc\n");
    }

    #[tokio::test]
    async fn test_load_failure_exits_nonzero() {
        let err = ConfigError::LoadFailed("bad toml".into());
        let (code, output) = sweep_with(Err(err), FakeApi::default()).await;

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(output, "::error::failed to load configuration: bad toml\n");
    }

    #[tokio::test]
    async fn test_list_error_exits_nonzero() {
        let api = FakeApi { fail_list: true, ..Default::default() };
        let (code, output) = sweep_with(Ok(inputs("3600", "build-abc")), api).await;

        assert_eq!(code, ExitCode::FAILURE);
        assert_eq!(output, "::error::HTTP_ERROR: 500 Internal Server Error\n");
    }

    #[tokio::test]
    async fn test_delete_error_exits_nonzero() {
        let api = FakeApi { entries: build_cache(), fail_delete: true, ..Default::default() };
        let (code, output) = sweep_with(Ok(inputs("3600", "build-abc")), api).await;

        assert_eq!(code, ExitCode::FAILURE);
        assert!(output.starts_with("::error::Failed to delete cache build-abc;%0A%0A"));
        assert!(output.contains("Resource not accessible by integration"));
    }

    #[tokio::test]
    async fn test_client_setup_error_exits_nonzero() {
        let mut reporter = WorkflowReporter::new(Vec::new());

        let code = execute(Ok(inputs("3600", "build-abc")), &mut reporter, |_: &SweepConfig| {
            Err::<FakeApi, _>(anyhow::anyhow!("invalid base URL").context("failed to create GitHub client"))
        })
        .await;

        assert_eq!(code, ExitCode::FAILURE);
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(output, "::error::failed to create GitHub client: invalid base URL\n");
    }
}
