use crate::cli::{connect, print_json, GlobalArgs, TriageArgs};
use crate::config::Config;
use crate::error::TriageError;
use crate::github::GitHubClient;
use crate::triage::{Orchestrator, PrNumber, TriageOutcome, TriageRequest};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::error;

pub async fn execute(global: &GlobalArgs, args: TriageArgs) -> anyhow::Result<()> {
    let (config, resolver) = Config::load_or_default(&global.config)?;

    // Preconditions are checked before any remote call; a rejected request
    // still yields a result document
    let outcome = match prepare(global, &config, &args) {
        Ok((client, pr)) => {
            let orchestrator = Orchestrator::new(Arc::new(client), resolver, &config.labels);
            orchestrator.run(pr).await
        }
        Err(e) => {
            error!("Triage rejected: {}", e);
            TriageOutcome::rejected(requested_pr(&args), &e)
        }
    };

    print_json(&outcome)?;

    if !outcome.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

fn prepare(
    global: &GlobalArgs,
    config: &Config,
    args: &TriageArgs,
) -> Result<(GitHubClient, PrNumber), TriageError> {
    let client = connect(global, config)?;
    let pr = read_request(args)?.validate()?;
    Ok((client, pr))
}

/// The PR number given on the command line, when it is usable as one
fn requested_pr(args: &TriageArgs) -> Option<u64> {
    args.pr.and_then(|n| PrNumber::new(n).ok()).map(PrNumber::get)
}

fn read_request(args: &TriageArgs) -> Result<TriageRequest, TriageError> {
    match (&args.request, args.pr) {
        (Some(path), _) => TriageRequest::from_json(&read_source(path)?),
        (None, Some(number)) => Ok(TriageRequest { number }),
        (None, None) => Err(TriageError::Validation("PR number is required".to_string())),
    }
}

fn read_source(path: &Path) -> Result<String, TriageError> {
    let mut raw = String::new();
    let result = if path == Path::new("-") {
        std::io::stdin().read_to_string(&mut raw).map(|_| ())
    } else {
        std::fs::File::open(path).and_then(|mut f| f.read_to_string(&mut raw).map(|_| ()))
    };
    result.map_err(|e| {
        TriageError::Validation(format!("failed to read triage request {:?}: {}", path, e))
    })?;
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;

    fn args(pr: Option<i64>, request: Option<&Path>) -> TriageArgs {
        TriageArgs {
            pr,
            request: request.map(Path::to_path_buf),
        }
    }

    #[test]
    fn test_read_request_from_flag() {
        let request = read_request(&args(Some(12), None)).unwrap();
        assert_eq!(request.validate().unwrap().get(), 12);
    }

    #[test]
    fn test_read_request_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"number": 42}"#).unwrap();
        let request = read_request(&args(None, Some(file.path()))).unwrap();
        assert_eq!(request.number, 42);
    }

    #[test]
    fn test_negative_number_fails_validation() {
        let err = read_request(&args(Some(-3), None))
            .unwrap()
            .validate()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    }

    #[test]
    fn test_rejected_outcome_keeps_given_pr_number() {
        let err = TriageError::ConfigurationMissing("GITHUB_TOKEN not set".to_string());

        let outcome = TriageOutcome::rejected(requested_pr(&args(Some(5), None)), &err);
        assert_eq!(outcome.pr_number, Some(5));

        assert_eq!(requested_pr(&args(Some(0), None)), None);
        assert_eq!(requested_pr(&args(Some(-4), None)), None);
        assert_eq!(requested_pr(&args(None, Some(Path::new("req.json")))), None);
    }

    #[test]
    fn test_missing_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("request.json");
        let err = read_request(&args(None, Some(&missing))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
    }
}
