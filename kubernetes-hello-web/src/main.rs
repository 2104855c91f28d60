//! kubernetes-hello
//!
//! Serves a single diagnostic page describing the process, its request,
//! environment, mounted secrets and configs, the containers of its pod and
//! the DNS zones of the cloud account the pod runs in.

mod cli;
mod error;
mod handlers;
mod render;

use std::sync::Arc;

use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use clap::Parser;
use kubernetes_hello_core::SnapshotService;
use kubernetes_hello_provider::{KubernetesClient, ProcessEnv, ambient_providers};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // `log` records from the libraries are bridged into tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.load_config().context("failed to load configuration")?;

    let providers = ambient_providers(&ProcessEnv).context("failed to create zone providers")?;
    for provider in &providers {
        tracing::info!(
            provider = provider.id(),
            applicable = provider.is_applicable(),
            "zone provider registered"
        );
    }

    let pod = KubernetesClient::from_env(&ProcessEnv);
    tracing::info!(applicable = pod.is_applicable(), "pod inspector registered");

    let service = web::Data::new(
        SnapshotService::from_config(&config, providers, Arc::new(pod))
            .context("failed to create snapshot service")?,
    );

    let bind = cli::bind_address(&config.listen);
    tracing::info!(addr = %format!("http://{bind}"), "listening");

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(from_fn(handlers::log_request))
            .configure(handlers::configure)
    })
    .bind(&bind)
    .with_context(|| format!("failed to listen on {bind}"))?
    .run()
    .await
    .context("server terminated")?;

    Ok(())
}
