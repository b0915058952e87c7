//! HTTP server wiring: route registration and the serve loop.

pub mod config;

pub use config::ServerConfig;

use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::inbound::http::health::{self, HealthState};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users;

/// Build a route/state registration closure for an Actix app.
///
/// Shared between `run` and the test suites so every App instance carries
/// the same surface.
pub fn configure(
    state: HttpState,
    health_state: web::Data<HealthState>,
) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg| {
        cfg.app_data(web::Data::new(state.clone()))
            .app_data(health_state.clone())
            .service(users::list_users)
            .service(users::get_user)
            .service(users::toggle_active)
            .service(health::ready)
            .service(health::live);
    }
}

/// Flip liveness and stop the server once the shutdown signal fires.
///
/// Failing liveness first lets load balancers drain the instance while
/// in-flight requests finish under the graceful stop.
async fn drain_on_shutdown(
    signal: impl std::future::Future<Output = std::io::Result<()>>,
    health_state: web::Data<HealthState>,
    handle: actix_web::dev::ServerHandle,
) {
    if signal.await.is_err() {
        return;
    }
    info!("shutdown signal received, draining");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}

/// Bind and serve until shutdown.
pub async fn run(config: ServerConfig, state: HttpState) -> std::io::Result<()> {
    let health_state = web::Data::new(HealthState::new());
    let factory_health = health_state.clone();
    let server = HttpServer::new(move || {
        App::new().configure(configure(state.clone(), factory_health.clone()))
    })
    .disable_signals()
    .bind(config.bind_addr())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(drain_on_shutdown(
        tokio::signal::ctrl_c(),
        health_state.clone(),
        handle,
    ));

    health_state.mark_ready();
    info!(addr = %config.bind_addr(), "directory backend listening");
    server.await
}
