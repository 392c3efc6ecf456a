use crate::client::ClientConfig;
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Estimate a property's price with the prediction service
#[derive(Debug, Clone, Parser)]
#[command(name = "housing-estimator", version)]
pub struct Args {
    /// Base URL of the prediction service
    #[arg(long, env = "HOUSING_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Transport timeout in seconds
    #[arg(long, env = "HOUSING_API_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Read the property from a JSON file, estimate once and exit
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// With --input, open the interactive session pre-filled instead of estimating once
    #[arg(long, requires = "input")]
    pub edit: bool,
}

/// Resolved runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub client: ClientConfig,
    pub input: Option<PathBuf>,
    pub edit: bool,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let base_url = normalize_base_url(&args.api_url)
            .with_context(|| format!("Invalid prediction service URL '{}'", args.api_url))?;
        if args.timeout_secs == 0 {
            bail!("Timeout must be at least one second");
        }

        Ok(Self {
            client: ClientConfig {
                base_url,
                timeout: Duration::from_secs(args.timeout_secs),
            },
            input: args.input,
            edit: args.edit,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let url = reqwest::Url::parse(raw.trim()).context("Not a valid URL")?;
    match url.scheme() {
        "http" | "https" => {}
        other => bail!("Unsupported scheme '{}', expected http or https", other),
    }
    if url.host_str().is_none() {
        bail!("URL has no host");
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config> {
        let args = Args::try_parse_from(std::iter::once("housing-estimator").chain(argv.iter().copied()))?;
        Config::from_args(args)
    }

    #[test]
    fn explicit_flags_are_resolved() {
        let config = parse(&["--api-url", "https://api.example.com/", "--timeout-secs", "5"]).unwrap();
        assert_eq!(config.client.base_url, "https://api.example.com");
        assert_eq!(config.client.timeout, Duration::from_secs(5));
        assert_eq!(config.input, None);
    }

    #[test]
    fn keeps_path_prefix() {
        let config = parse(&["--api-url", "http://10.0.0.2:8080/ml/"]).unwrap();
        assert_eq!(config.client.base_url, "http://10.0.0.2:8080/ml");
    }

    #[test]
    fn rejects_bad_urls_and_timeouts() {
        assert!(parse(&["--api-url", "ftp://example.com"]).is_err());
        assert!(parse(&["--api-url", "not a url"]).is_err());
        assert!(parse(&["--api-url", "http://localhost:8000", "--timeout-secs", "0"]).is_err());
    }

    #[test]
    fn input_file_enables_one_shot_mode() {
        let config = parse(&["--api-url", "http://localhost:8000", "--input", "house.json"]).unwrap();
        assert_eq!(config.input, Some(PathBuf::from("house.json")));
        assert!(!config.edit);

        let config = parse(&["--input", "house.json", "--edit"]).unwrap();
        assert!(config.edit);
        assert!(parse(&["--edit"]).is_err());
    }
}
