//! CLI runner - executes commands

use crate::catalog::Catalog;
use crate::cli::commands::{Cli, Commands};
use crate::config::ConnectorConfig;
use crate::engine::{Message, SyncEngine};
use crate::error::{Error, Result};
use crate::output::{JsonLinesWriter, MessageWriter};
use crate::registry::FieldRegistry;
use crate::report::{ReportClient, ReportClientConfig};
use crate::state::StateManager;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

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
            Commands::Check => self.check().await,
            Commands::Discover => self.discover().await,
            Commands::Sync { catalog, streams } => {
                self.sync(catalog.as_deref(), streams.as_deref()).await
            }
        }
    }

    /// Load and validate configuration
    fn load_config(&self) -> Result<ConnectorConfig> {
        // Inline config takes precedence
        if let Some(json) = &self.cli.config_json {
            return ConnectorConfig::from_json(json);
        }
        if let Some(path) = &self.cli.config {
            return ConnectorConfig::from_file(path);
        }
        Err(Error::config(
            "Config not specified (use -c or --config-json)",
        ))
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Build the report client from configuration.
    ///
    /// Loading the field registry happens here; a malformed table aborts
    /// before any request is made.
    fn build_client(&self, config: &ConnectorConfig) -> Result<ReportClient> {
        let registry = FieldRegistry::builtin()?;

        let defaults = ReportClientConfig::default();
        let client_config = ReportClientConfig {
            base_url: config.base_url.clone().unwrap_or(defaults.base_url),
            region: config.region.clone(),
            token: config.token.clone(),
            default_date_type: config.default_date_type(),
            timeout: Duration::from_secs(config.timeout_seconds),
            user_agent: defaults.user_agent,
        };

        ReportClient::new(client_config, Arc::new(registry))
    }

    /// Validate credentials by probing the first configured report
    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = self.build_client(&config)?;
        let streams = config.streams()?;

        let first = streams
            .first()
            .ok_or_else(|| Error::missing_field("reports"))?;
        client
            .infer_schema(&first.report_slug, Some(first.date_type))
            .await?;

        info!(report = %first.report_slug, "connection check succeeded");
        println!("Connection OK");
        Ok(())
    }

    /// Discover streams and print the catalog
    async fn discover(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = self.build_client(&config)?;
        let streams = config.streams()?;

        let catalog = Catalog::discover(&client, &streams).await?;
        println!("{}", catalog.to_json_pretty()?);
        Ok(())
    }

    /// Sync streams, emitting messages to stdout
    async fn sync(&self, catalog_path: Option<&Path>, stream_filter: Option<&str>) -> Result<()> {
        let config = self.load_config()?;
        let client = self.build_client(&config)?;
        let streams = config.streams()?;
        let state = self.load_state()?;

        // An explicit catalog carries the consumer's selections; a catalog
        // discovered for an immediate sync selects everything.
        let (catalog, honor_selection) = match catalog_path {
            Some(path) => (Catalog::from_file(path)?, true),
            None => (Catalog::discover(&client, &streams).await?, false),
        };

        let filter: Option<HashSet<&str>> = stream_filter
            .map(|list| list.split(',').map(str::trim).filter(|s| !s.is_empty()).collect());

        let mut engine =
            SyncEngine::new(client, state).with_strict_fields(config.strict_fields);
        let mut writer = JsonLinesWriter::stdout();

        for stream in &streams {
            let Some(entry) = catalog.get_entry(&stream.stream_id) else {
                warn!(stream = %stream.stream_id, "not present in catalog, skipping");
                continue;
            };
            if honor_selection && !entry.is_selected() {
                info!(stream = %stream.stream_id, "skipping - not selected");
                continue;
            }
            if let Some(wanted) = &filter {
                if !wanted.contains(stream.stream_id.as_str()) {
                    continue;
                }
            }

            writer.write(&Message::schema(
                stream.stream_id.clone(),
                entry.schema.clone(),
                entry.key_properties(),
            ))?;

            engine.sync_stream(stream, &mut writer).await?;
        }

        Ok(())
    }
}
