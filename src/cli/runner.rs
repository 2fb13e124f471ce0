//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::RequestOptions;
use crate::pagination::PageIterator;
use crate::types::{JsonValue, OptionStringExt};
use std::sync::Arc;
use tracing::info;

/// Environment variable consulted when `--token` is absent
pub const TOKEN_ENV: &str = "GRAPH_ACCESS_TOKEN";

/// Outcome of a `walk` command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct WalkSummary {
    items: u64,
    pages: u64,
    complete: bool,
    delta_link: Option<String>,
    next_link: Option<String>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Walk {
                url,
                headers,
                query,
                max_items,
            } => {
                let options = parse_request_options(headers, query)?;
                let summary = self.walk(url, options, *max_items).await?;
                if summary.complete {
                    if let Some(delta_link) = &summary.delta_link {
                        eprintln!("deltaLink: {delta_link}");
                    }
                } else if let Some(next_link) = &summary.next_link {
                    eprintln!("nextLink: {next_link}");
                }
                Ok(())
            }
            Commands::Config => self.show_config(),
        }
    }

    /// Load client config
    fn load_config(&self) -> Result<ClientConfig> {
        match &self.cli.config {
            Some(path) => ClientConfig::from_file(path),
            None => Ok(ClientConfig::default()),
        }
    }

    /// Token from the command line or the environment
    fn access_token(&self) -> Option<String> {
        self.cli
            .token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .none_if_empty()
    }

    /// Walk a collection and print its items
    async fn walk(
        &self,
        url: &str,
        options: RequestOptions,
        max_items: Option<u64>,
    ) -> Result<WalkSummary> {
        if max_items == Some(0) {
            return Ok(WalkSummary::default());
        }

        let mut client = Client::new(self.load_config()?)?;
        if let Some(token) = self.access_token() {
            client = client.with_access_token(token);
        }
        let client = Arc::new(client);

        let first = client.get_with_options(url, &options).await?;
        if !first.is_success() {
            return Err(Error::http_status(
                first.status(),
                first.raw_text().into_owned(),
            ));
        }

        let format = self.cli.format;
        let mut printed = 0u64;
        let callback = move |item: JsonValue| {
            output_item(format, &item);
            printed += 1;
            max_items.map_or(true, |max| printed < max)
        };

        let mut iterator =
            PageIterator::new(Arc::clone(&client), first, callback)?.with_request_options(options);
        let complete = iterator.iterate().await?;

        let summary = WalkSummary {
            items: iterator.items_processed(),
            pages: iterator.pages_fetched() + 1,
            complete,
            delta_link: iterator.delta_link().map(str::to_owned),
            next_link: iterator.next_link().map(str::to_owned),
        };
        if complete {
            info!("Walked {} items over {} pages", summary.items, summary.pages);
        } else {
            info!("Stopped after {} items", summary.items);
        }
        Ok(summary)
    }

    /// Print the effective configuration as YAML
    fn show_config(&self) -> Result<()> {
        let config = self.load_config()?;
        print!("{}", serde_yaml::to_string(&config)?);
        Ok(())
    }
}

/// Output one collection item
fn output_item(format: OutputFormat, item: &JsonValue) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(item).unwrap_or_default());
        }
        OutputFormat::Pretty => {
            println!("{}", serde_json::to_string_pretty(item).unwrap_or_default());
        }
    }
}

/// Build request options from `NAME:VALUE` headers and `KEY=VALUE` query pairs
pub fn parse_request_options(headers: &[String], query: &[String]) -> Result<RequestOptions> {
    let mut options = RequestOptions::new();

    for header in headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| Error::invalid_header(header.as_str(), "expected NAME:VALUE"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_header(header.as_str(), "empty header name"));
        }
        options = options.header(name, value.trim());
    }

    for pair in query {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::config(format!("Invalid query '{pair}': expected KEY=VALUE")))?;
        options = options.query(key.trim(), value);
    }

    Ok(options)
}
