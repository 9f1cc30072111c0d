mod bus;
mod chat;
mod config;
mod core;
mod format;
mod listing;
mod matching;
mod outbound;
mod parse;
mod pipeline;
mod telegram;

use crate::bus::types::Bus;
use crate::chat::actor::ChatSourceActor;
use crate::config::config::AppCfg;
use crate::core::types::Actor;
use crate::listing::scrape::HtmlListingClient;
use crate::outbound::actor::OutboundActor;
use crate::parse::vocabulary::OutcomeVocabulary;
use crate::pipeline::actor::PipelineActor;
use crate::telegram::client::TgClient;
use anyhow::Result;
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let cfg = AppCfg::load("config.yml")?;

    // Root span for the supervisor/main thread
    let span = info_span!(
        "Supervisor",
        pid = %std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
    );
    let _enter = span.enter();

    info!("Starting up");

    info!("Initializing shared pub/sub Bus");
    let bus = Bus::new();
    let shutdown = CancellationToken::new();

    info!("Initializing Client");
    let client = Client::builder()
        .user_agent(cfg.http.user_agent.clone())
        .pool_idle_timeout(cfg.http.pool_idle_timeout)
        .pool_max_idle_per_host(cfg.http.pool_max_idle_per_host)
        .timeout(cfg.http.timeout)
        .build()
        .expect("client");

    info!("Building actors");
    // compiled once, read-only, shared by parser and resolver
    let vocab = Arc::new(OutcomeVocabulary::new());
    let tg = TgClient::new(cfg.telegram.clone(), client.clone());
    let listing = Arc::new(HtmlListingClient::new(cfg.listing.clone(), client.clone()));

    let source = ChatSourceActor::new(bus.clone(), tg.clone(), shutdown.clone());
    let pipeline = PipelineActor::new(bus.clone(), shutdown.clone(), vocab, listing);
    let outbound = OutboundActor::new(bus.clone(), tg, cfg.channels.clone(), shutdown.clone());

    info!("Spawning actors");
    let mut actors = tokio::task::JoinSet::new();

    actors.spawn(source.run().instrument(info_span!("ChatSource")));
    actors.spawn(pipeline.run().instrument(info_span!("Pipeline")));
    actors.spawn(outbound.run().instrument(info_span!("Outbound")));

    info!("Waiting for actors");

    tokio::select! {
        _ = async {
             while let Some(res) = actors.join_next().await {
                 match res {
                    Ok(Ok(()))  => info!("Actor exited cleanly"),
                    Ok(Err(e))  => error!(?e, "Actor returned error"),
                    Err(panic)  => error!(?panic, "Actor panicked/cancelled"),
                }
            }
        } => {  }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received, shutting down supervisor loop");
            shutdown.cancel();
        }
    }

    info!("Waiting for graceful shutdown of actors");
    while let Some(res) = actors.join_next().await {
        match res {
            Ok(Ok(())) => info!("Actor exited cleanly"),
            Ok(Err(e)) => error!(?e, "Actor returned error"),
            Err(panic) => error!(?panic, "Actor panicked/cancelled"),
        }
    }

    info!("Supervisor exit");
    Ok(())
}
