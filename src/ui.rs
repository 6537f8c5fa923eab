// Terminal flow for the binary: merge flags with the settings file, ask for
// a missing API key, run the release and turn the outcome into messages and
// an exit code.

use crate::api::ApiClient;
use crate::cli::{Cli, Commands, ReleaseArgs};
use crate::config::{ClientConfig, Settings, DEFAULT_TIMEOUT_SECS};
use crate::endpoints::EndpointRegistry;
use crate::error::ActopusError;
use crate::release::ReleaseClient;
use anyhow::{bail, Context, Result};
use dialoguer::Password;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    match cli.command {
        Commands::Release(args) => release(&args, settings),
    }
}

/// Build the connection settings. Flags and environment win over the
/// settings file; the key is prompted for as a last resort.
pub fn client_config(args: &ReleaseArgs, settings: Settings) -> Result<ClientConfig> {
    let server = args
        .server
        .clone()
        .or(settings.server)
        .context("no server given; pass --server or set ACTOPUS_SERVER")?;
    let key = match args.key.clone().or(settings.api_key) {
        Some(key) => key,
        None => prompt_api_key()?,
    };
    let timeout = args
        .timeout
        .or(settings.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let mut config = ClientConfig::new(server, key)
        .with_timeout(Duration::from_secs(timeout))
        .with_invalid_certs(args.insecure || settings.insecure);
    if let Some(url) = args.base_url.clone().or(settings.base_url) {
        config = config.with_base_url(url);
    }
    Ok(config)
}

fn prompt_api_key() -> Result<String> {
    if !std::io::stdin().is_terminal() {
        bail!("no API key given; pass --key or set ACTOPUS_API_KEY");
    }
    let key: String = Password::new().with_prompt("Octopus API key").interact()?;
    Ok(key)
}

fn release(args: &ReleaseArgs, settings: Settings) -> Result<ExitCode> {
    let config = client_config(args, settings)?;
    // A custom endpoint table replaces the built-in one entirely.
    let registry = match &args.endpoints {
        Some(path) => EndpointRegistry::from_path(path)
            .with_context(|| format!("loading endpoint table {}", path.display()))?,
        None => EndpointRegistry::builtin()?,
    };
    let client = ReleaseClient::new(ApiClient::new(&config)?, registry);

    // The spinner draws to stderr and stays hidden when that is not a tty.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Creating release {} of {}...", args.release, args.project));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = client.create_release(&args.project, &args.release);
    spinner.finish_and_clear();

    // Only a rejected create is a failure for the caller; an existing
    // release or unknown project is reported and the run still succeeds.
    match outcome {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(ActopusError::ResourceAlreadyExists(version)) => {
            println!("Release version already found for {}", version);
            Ok(ExitCode::SUCCESS)
        }
        Err(ActopusError::ResourceNotFound(project)) => {
            println!("Could not find the project {}", project);
            Ok(ExitCode::SUCCESS)
        }
        Err(ActopusError::ResourceCreationError { status, body }) => {
            eprintln!("There was an error creating the release");
            eprintln!("server answered {}: {}", status, body);
            Ok(ExitCode::FAILURE)
        }
        // transport, unexpected status, bad config: main prints and exits 1
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ReleaseArgs {
        ReleaseArgs {
            project: "web".into(),
            release: "1.0.0".into(),
            ..Default::default()
        }
    }

    #[test]
    fn flags_override_settings() {
        let mut a = args();
        a.server = Some("flag.host".into());
        a.key = Some("FLAG-KEY".into());
        a.timeout = Some(3);
        let settings = Settings {
            server: Some("file.host".into()),
            api_key: Some("FILE-KEY".into()),
            timeout_secs: Some(60),
            ..Default::default()
        };

        let config = client_config(&a, settings).unwrap();
        assert_eq!(config.host, "flag.host");
        assert_eq!(config.api_key, "FLAG-KEY");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.base_url(), "https://flag.host/api");
    }

    #[test]
    fn settings_fill_the_gaps() {
        let settings = Settings {
            server: Some("file.host".into()),
            api_key: Some("FILE-KEY".into()),
            base_url: Some("http://localhost:8080/api".into()),
            insecure: true,
            ..Default::default()
        };

        let config = client_config(&args(), settings).unwrap();
        assert_eq!(config.host, "file.host");
        assert_eq!(config.api_key, "FILE-KEY");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.accept_invalid_certs);
        assert_eq!(config.base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn missing_server_is_an_error() {
        let mut a = args();
        a.key = Some("K".into());
        let err = client_config(&a, Settings::default()).unwrap_err();
        assert!(err.to_string().contains("--server"));
    }
}
