//! Serverless entry point.
//!
//! The context (and its single database connection) is built once per cold
//! start; every invocation is forwarded through the [`Adapter`].

use lambda_runtime::{run, service_fn, Error, LambdaEvent};

use portfolio_api::adapter::{Adapter, HostRequest, HostResponse};
use portfolio_api::config::{load_config, LogFormat};
use portfolio_api::lifecycle::build_context;
use portfolio_api::observability::logging;

async fn function_handler(
    adapter: &Adapter,
    event: LambdaEvent<HostRequest>,
) -> Result<HostResponse, Error> {
    Ok(adapter.dispatch(event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = dotenvy::dotenv();

    let config_path = std::env::var_os("PORTFOLIO_CONFIG").map(std::path::PathBuf::from);
    let mut config = load_config(config_path.as_deref())?;
    config.observability.log_format = LogFormat::Json;
    logging::init_logging(&config.observability);

    tracing::info!("Starting portfolio API function");
    let adapter = Adapter::from_context(build_context(config).await?);

    run(service_fn(move |event: LambdaEvent<HostRequest>| {
        let adapter = adapter.clone();
        async move { function_handler(&adapter, event).await }
    }))
    .await
}
