//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, PagingArgs};
use crate::error::{Error, Result};
use crate::loader::{bind_operation, load_definition, ApiDefinition};
use crate::operation::{InvocationParams, ListOperation, ListPage};
use crate::output::{JsonLinesSink, OutputOptions, OutputSink, Projection};
use crate::pagination::{
    ExecutorConfig, InvocationOutcome, PaginatedListExecutor, PagingControl, Termination,
};
use serde_json::{json, Value};
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
            Commands::List {
                operation,
                params,
                paging,
                pass_thru,
            } => self.list(operation, params, paging, *pass_thru).await,
            Commands::Operations => self.operations(),
            Commands::Validate => self.validate(),
            #[cfg(feature = "aws")]
            Commands::S3 {
                bucket,
                prefix,
                delimiter,
                max_keys,
                region,
                endpoint_url,
                paging,
            } => {
                let params = crate::operation::ListObjectsParams {
                    bucket: bucket.clone(),
                    prefix: prefix.clone(),
                    delimiter: delimiter.clone(),
                    max_keys: *max_keys,
                };
                self.s3(params, region.clone(), endpoint_url.as_deref(), paging)
                    .await
            }
        }
    }

    /// Load the definition file
    fn load_definition(&self) -> Result<ApiDefinition> {
        let path = self
            .cli
            .definition
            .as_ref()
            .ok_or_else(|| Error::config("Definition file not specified (use -d flag)"))?;
        load_definition(path)
    }

    fn sink(&self) -> JsonLinesSink<std::io::Stdout> {
        JsonLinesSink::stdout().pretty(self.cli.format == OutputFormat::Pretty)
    }

    /// Run a defined list operation
    async fn list(
        &self,
        operation: &str,
        params: &[String],
        paging: &PagingArgs,
        pass_thru: bool,
    ) -> Result<()> {
        let def = self.load_definition()?;
        let supplied = parse_params(params)?;
        let bound = bind_operation(&def, operation, &supplied)?;
        let default_path = bound.endpoint.items_path.clone();
        let (operation, context) = bound.into_operation()?;

        let options = OutputOptions {
            select: paging.select.clone(),
            pass_thru,
        };
        let projection = options
            .resolve(&context)?
            .into_projection::<ListPage, InvocationParams>(default_path);

        let request = operation.endpoint().request();
        self.run_paged(&operation, request, &projection, &context, paging)
            .await
    }

    /// List objects in an S3 bucket
    #[cfg(feature = "aws")]
    async fn s3(
        &self,
        params: crate::operation::ListObjectsParams,
        region: Option<String>,
        endpoint_url: Option<&str>,
        paging: &PagingArgs,
    ) -> Result<()> {
        use crate::operation::{ListObjectsPage, ListObjectsParams, S3ListObjects};

        let options = OutputOptions {
            select: paging.select.clone(),
            pass_thru: false,
        };
        let projection = options
            .resolve(&params)?
            .into_projection::<ListObjectsPage, ListObjectsParams>(Some("Contents".to_string()));

        let operation = S3ListObjects::from_env(region, endpoint_url).await;
        let request = params.request();
        self.run_paged(&operation, request, &projection, &params, paging)
            .await
    }

    /// Page through an operation, writing every emission to stdout
    async fn run_paged<O, C>(
        &self,
        operation: &O,
        request: O::Request,
        projection: &Projection<O::Response, C, Value>,
        context: &C,
        paging: &PagingArgs,
    ) -> Result<()>
    where
        O: ListOperation,
        C: ?Sized,
    {
        let control = PagingControl::new()
            .with_no_auto_iteration(paging.no_auto_iteration)
            .with_initial_cursor(paging.next_token.clone());

        let mut config = ExecutorConfig::new();
        if let Some(max_pages) = paging.max_pages {
            config = config.with_max_pages(max_pages);
        }

        let executor = PaginatedListExecutor::new(operation).with_config(config);
        let mut sink = self.sink();
        let outcome = executor
            .execute(request, &control, projection, context, &mut sink)
            .await
            .into_result()?;

        report_resume(operation.name(), &outcome);
        Ok(())
    }

    /// Print the operations of the definition
    fn operations(&self) -> Result<()> {
        let def = self.load_definition()?;
        let operations: Vec<Value> = def
            .operations
            .iter()
            .map(|op| {
                json!({
                    "name": op.name,
                    "description": op.description,
                    "method": op.method,
                    "path": op.path,
                    "parameters": op.parameters.iter().map(|p| json!({
                        "name": p.name,
                        "required": p.required,
                        "default": p.default,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();

        self.sink().emit(operations)
    }

    /// Validate the definition
    fn validate(&self) -> Result<()> {
        let def = self.load_definition()?;
        info!(name = %def.name, operations = def.operations.len(), "Definition is valid");
        self.sink().emit(json!({
            "status": "valid",
            "name": def.name,
            "operations": def.operation_names(),
        }))
    }
}

/// Log how to continue after a run that stopped with more pages available
fn report_resume(operation: &str, outcome: &InvocationOutcome) {
    let Some(next_token) = outcome.resume_cursor.as_deref() else {
        return;
    };
    match outcome.termination {
        Termination::UserLimited => info!(
            operation,
            next_token, "More pages available; pass --next-token to continue"
        ),
        Termination::PageLimit => warn!(
            operation,
            next_token,
            pages = outcome.pages_fetched,
            "Stopped at --max-pages; pass --next-token to continue"
        ),
        Termination::Exhausted | Termination::Faulted => {}
    }
}

/// Parse `NAME=VALUE` pairs
pub fn parse_params(params: &[String]) -> Result<Vec<(String, String)>> {
    params
        .iter()
        .map(|param| {
            let (name, value) = param.split_once('=').ok_or_else(|| {
                Error::invalid_argument("param", format!("'{param}' is not NAME=VALUE"))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::invalid_argument(
                    "param",
                    format!("'{param}' has an empty name"),
                ));
            }
            Ok((name.to_string(), value.to_string()))
        })
        .collect()
}
