//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::CanvasClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::RequestDescriptor;
use crate::pagination::Paginated;
use crate::types::UserId;
use crate::wire::{CourseInclude, EnrollmentType, FlagSet, Wire, WireEnum};
use serde::Serialize;
use serde_json::Value;
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
        let config = self.load_config()?;
        let mut client = CanvasClient::new(&config)?;

        if let Some(ref user) = self.cli.as_user {
            client.begin_impersonation(UserId::new(user.trim()));
        }

        match &self.cli.command {
            Commands::Check => self.check(&client).await,
            Commands::Get { path, params } => self.get(&client, path, params).await,
            Commands::List {
                path,
                params,
                max_items,
            } => {
                let request = with_params(RequestDescriptor::get(path.as_str()), params);
                self.emit_stream(client.stream::<Value>(request), *max_items)
                    .await
            }
            Commands::Courses { account, include } => {
                let includes = parse_includes(include);
                self.emit_stream(client.account_courses(account, includes), None)
                    .await
            }
            Commands::Users { account } => {
                self.emit_stream(client.account_users(account), None).await
            }
            Commands::Enrollments { course, types } => {
                let types = parse_enrollment_types(types)?;
                self.emit_stream(client.course_enrollments(course, &types), None)
                    .await
            }
            Commands::Terms { account } => {
                self.emit_stream(client.account_terms(account), None).await
            }
        }
    }

    /// Build the client config: file first, then command-line overrides
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => {
                let base_url = self.cli.base_url.clone().ok_or_else(|| {
                    Error::config("Canvas URL not specified (use --base-url or CANVAS_BASE_URL)")
                })?;
                let token = self.cli.token.clone().ok_or_else(|| {
                    Error::config("Access token not specified (use --token or CANVAS_TOKEN)")
                })?;
                ClientConfig::new(base_url, token)
            }
        };

        if self.cli.config.is_some() {
            if let Some(ref url) = self.cli.base_url {
                config.base_url.clone_from(url);
            }
            if let Some(ref token) = self.cli.token {
                config.token.clone_from(token);
            }
        }
        if self.cli.per_page.is_some() {
            config.per_page = self.cli.per_page;
        }

        config.validate()?;
        Ok(config)
    }

    async fn check(&self, client: &CanvasClient) -> Result<()> {
        info!("Checking connection to {}", client.base_url());
        let user = client.current_user().await?;
        info!("Authenticated as {} (id {})", user.name, user.id);
        self.emit(&user)
    }

    async fn get(&self, client: &CanvasClient, path: &str, params: &[(String, String)]) -> Result<()> {
        let request = with_params(RequestDescriptor::get(path), params);
        let page = client.execute(&request).await?;

        match <[Value; 1]>::try_from(page.items) {
            Ok([single]) => self.emit(&single),
            Err(items) => self.emit(&items),
        }
    }

    async fn emit_stream<T: Serialize>(
        &self,
        mut pages: Paginated<'_, T>,
        max_items: Option<usize>,
    ) -> Result<()> {
        let mut count = 0usize;
        while max_items.map_or(true, |max| count < max) {
            let Some(item) = pages.next_item().await else {
                break;
            };
            self.emit(&item?)?;
            count += 1;
        }
        info!(
            "{count} items from {} page(s)",
            pages.pages_fetched()
        );
        Ok(())
    }

    /// Print one value in the selected format
    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        }
        .map_err(|e| Error::Other(format!("Failed to serialize output: {e}")))?;
        println!("{text}");
        Ok(())
    }
}

fn with_params(request: RequestDescriptor, params: &[(String, String)]) -> RequestDescriptor {
    params
        .iter()
        .fold(request, |request, (key, value)| request.query(key.as_str(), value))
}

fn parse_includes(tokens: &[String]) -> FlagSet<CourseInclude> {
    for token in tokens {
        if !CourseInclude::from_wire(token).is_known() {
            warn!("Ignoring unknown include '{token}'");
        }
    }
    FlagSet::from_wire(tokens.iter().map(String::as_str))
}

fn parse_enrollment_types(tokens: &[String]) -> Result<Vec<EnrollmentType>> {
    tokens
        .iter()
        .map(|token| match EnrollmentType::from_wire(token) {
            Wire::Known(kind) => Ok(kind),
            Wire::Unknown(token) => Err(Error::invalid_value(
                "type",
                format!("unknown enrollment type '{token}'"),
            )),
        })
        .collect()
}
