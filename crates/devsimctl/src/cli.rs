use std::process::ExitCode;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use comfy_table::{Cell, Color, Table};
use const_format::concatcp;
use devsim_client::rpc::RpcConnector;
use devsim_runner::context::DEFAULT_REGISTRY;
use devsim_runner::{
    list_models, model_info, run, ModelSource, RunConfig, RunError, TeardownReport,
};
use eyre::{Report as EyreReport, WrapErr};
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error as ThisError;
use tokio::fs;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::defaults;
use crate::output::{
    Format, InfoLine, ModelList, Output, ParameterTemplate, Report, RunReport, WarnLine,
};

pub const EXAMPLES: &str = r"
  # Run a model built from a descriptor file
  $ devsimctl model.json

  # Run a named model with a configuration file
  $ devsimctl GenModel params.json

  # List the models the registry can build
  $ devsimctl --api http://sim.example:10000 --list-models

  # Write the default parameters of a model to GenModel.json
  $ devsimctl --model-info GenModel
";

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(after_help = concatcp!(
    "Environment variables:\n",
    "  DEVSIM_CONFIG    Path of the config file\n\n",
    "Examples:",
    EXAMPLES
))]
pub struct RootCommand {
    /// Parameter file, optionally preceded by a model name
    #[arg(
        value_name = "[MODEL] PARAMS",
        num_args = 1..=2,
        required_unless_present_any = ["list_models", "model_info"]
    )]
    pub inputs: Vec<String>,

    /// List the models available in the registry and exit
    #[arg(long, conflicts_with = "inputs")]
    pub list_models: bool,

    /// Write the default parameters of a model to a parameter file and exit
    #[arg(long, value_name = "NAME", conflicts_with_all = ["inputs", "list_models"])]
    pub model_info: Option<String>,

    /// Where `--model-info` writes the parameters [default: <MODEL>.json]
    #[arg(long, value_name = "PATH", requires = "model_info")]
    pub out: Option<Utf8PathBuf>,

    /// Config file
    #[arg(long, value_name = "PATH")]
    #[arg(env = "DEVSIM_CONFIG", hide_env_values = true)]
    pub config: Option<Utf8PathBuf>,

    /// Simulation service endpoint URL
    #[arg(long, value_name = "URL")]
    pub api: Option<Url>,

    /// Name the model registry is published under
    #[arg(long, value_name = "NAME")]
    pub registry: Option<String>,

    /// Per-call timeout in seconds, enforced by the transport
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Initial end-time bound, replaced by any bound the model reports
    #[arg(long, value_name = "TIME")]
    pub time_max: Option<f64>,

    #[arg(long, value_name = "FORMAT", default_value_t, value_enum)]
    pub output_format: Format,
}

impl RootCommand {
    pub async fn run(self) -> Result<(), CliError> {
        let output = Output::new(self.output_format);

        let result = self.execute(&output).await;

        if let Err(err) = &result {
            output.write(err);
        }

        result
    }

    async fn execute(&self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref()).await?;

        let api = match (&self.api, &config.api) {
            (Some(api), _) | (None, Some(api)) => api.clone(),
            (None, None) => defaults::DEFAULT_API_URL
                .parse()
                .wrap_err("invalid default endpoint")?,
        };

        let timeout = self
            .timeout
            .map(Duration::from_secs)
            .or_else(|| config.request_timeout());

        let run_config = RunConfig {
            registry: self
                .registry
                .clone()
                .or_else(|| config.registry.clone())
                .unwrap_or_else(|| DEFAULT_REGISTRY.to_owned()),
            time_max: self.time_max,
            release_handles: config.release_handles.unwrap_or(true),
            ..RunConfig::default()
        };

        if self.list_models {
            let connector = RpcConnector::new(api, timeout).wrap_err("invalid endpoint")?;
            let outcome = list_models(&connector, &run_config).await;

            report_teardown(output, &outcome.teardown);

            let models = outcome.result?;
            output.write(&ModelList(&models));

            return Ok(());
        }

        if let Some(name) = &self.model_info {
            let connector = RpcConnector::new(api, timeout).wrap_err("invalid endpoint")?;
            let outcome = model_info(&connector, &run_config, name).await;

            report_teardown(output, &outcome.teardown);

            let text = outcome.result?;
            let parameters: Value = serde_json::from_str(&text)
                .wrap_err_with(|| format!("parameters of `{name}` are not valid JSON"))?;

            let path = self.out.clone().unwrap_or_else(|| template_path(name, &parameters));

            fs::write(&path, &text)
                .await
                .wrap_err_with(|| format!("unable to write parameter file `{path}`"))?;

            output.write(&ParameterTemplate {
                model: name,
                path: &path,
                parameters: &parameters,
            });

            return Ok(());
        }

        let source = self.model_source().await?;
        let connector = RpcConnector::new(api, timeout).wrap_err("invalid endpoint")?;

        let outcome = run(&connector, &run_config, &source).await;

        report_teardown(output, &outcome.teardown);

        let summary = outcome.result?;
        output.write(&InfoLine("Done"));
        output.write(&RunReport(&summary));

        Ok(())
    }

    /// Reads the parameter file before anything goes over the wire.
    async fn model_source(&self) -> eyre::Result<ModelSource> {
        let (name, path) = match self.inputs.as_slice() {
            [path] => (None, path),
            [name, path] => (Some(name.clone()), path),
            _ => eyre::bail!("usage: devsimctl [MODEL] <PARAMS>"),
        };

        let contents = fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("unable to read parameter file `{path}`"))?;

        debug!(%path, %contents, "Loaded parameter file");

        Ok(ModelSource::new(name, contents))
    }
}

/// `<modelName>.json`, named after the parameters' own `modelName` when present.
fn template_path(name: &str, parameters: &Value) -> Utf8PathBuf {
    let stem = parameters
        .get("modelName")
        .and_then(Value::as_str)
        .unwrap_or(name);

    Utf8PathBuf::from(format!("{stem}.json"))
}

fn report_teardown(output: &Output, teardown: &TeardownReport) {
    for failure in &teardown.failures {
        let line = format!("failed to release {}: {}", failure.target, failure.error);
        output.write(&WarnLine(&line));
    }
}

#[derive(Debug, Serialize, ThisError)]
pub enum CliError {
    #[error(transparent)]
    Run(
        #[from]
        #[serde(serialize_with = "serialize_run_error")]
        RunError,
    ),

    #[error(transparent)]
    Other(
        #[from]
        #[serde(serialize_with = "serialize_eyre_report")]
        EyreReport,
    ),
}

impl From<CliError> for ExitCode {
    fn from(_error: CliError) -> Self {
        Self::FAILURE
    }
}

impl Report for CliError {
    fn report(&self) {
        let mut table = Table::new();
        let _ = table.set_header(vec![Cell::new("ERROR").fg(Color::Red)]);
        let _ = table.add_row(vec![match self {
            Self::Run(e) => format!("Run failed: {}", e.describe()),
            Self::Other(e) => format!("Error: {e:?}"),
        }]);
        println!("{table}");
    }
}

fn serialize_run_error<S>(error: &RunError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&error.describe())
}

fn serialize_eyre_report<S>(report: &EyreReport, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(report.chain().map(|e| e.to_string()))
}
