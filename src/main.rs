mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 Fleet Ops - Back Office de Operaciones de Flota");
    info!("==================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();
    let app_state = AppState::new(pool, EnvironmentConfig::default());

    // Rutas protegidas por JWT; el middleware inyecta el usuario actuante
    let protected = Router::new()
        .nest("/api/vehicle", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/trailer", routes::trailer_routes::create_trailer_router())
        .nest("/api/operator", routes::operator_routes::create_operator_router())
        .nest("/api/trip", routes::trip_routes::create_trip_router())
        .nest(
            "/api/availability",
            routes::availability_routes::create_availability_router(),
        )
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth::auth_middleware,
        ));

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .merge(protected)
        .layer(cors_middleware())
        .with_state(app_state);

    // Puerto del servidor
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Vehicle:");
    info!("   POST /api/vehicle - Crear vehículo");
    info!("   GET  /api/vehicle - Listar vehículos");
    info!("   GET  /api/vehicle/:id - Obtener vehículo");
    info!("   PUT  /api/vehicle/:id - Actualizar vehículo");
    info!("   PATCH /api/vehicle/:id/status - Cambiar estado (máquina de estados)");
    info!("   DELETE /api/vehicle/:id - Eliminar vehículo");
    info!("🚛 Trailer:");
    info!("   POST /api/trailer - Crear remolque");
    info!("   GET  /api/trailer - Listar remolques");
    info!("   GET  /api/trailer/:id - Obtener remolque");
    info!("   PUT  /api/trailer/:id - Actualizar remolque");
    info!("   PATCH /api/trailer/:id/status - Cambiar estado (máquina de estados)");
    info!("   DELETE /api/trailer/:id - Eliminar remolque");
    info!("👤 Operator:");
    info!("   POST /api/operator - Crear operador");
    info!("   GET  /api/operator - Listar operadores");
    info!("   GET  /api/operator/:id - Obtener operador");
    info!("   PUT  /api/operator/:id - Actualizar operador");
    info!("   PATCH /api/operator/:id/status - Cambiar estado administrativo");
    info!("   DELETE /api/operator/:id - Eliminar operador");
    info!("🗓 Trip:");
    info!("   POST /api/trip - Crear viaje y reservar recursos");
    info!("   GET  /api/trip - Listar viajes");
    info!("   GET  /api/trip/:id - Obtener viaje");
    info!("   PUT  /api/trip/:id - Reasignar viaje planificado");
    info!("   POST /api/trip/:id/start - Iniciar viaje");
    info!("   POST /api/trip/:id/complete - Completar viaje y liberar recursos");
    info!("   POST /api/trip/:id/cancel - Cancelar viaje y liberar recursos");
    info!("   DELETE /api/trip/:id - Eliminar viaje");
    info!("✅ Availability:");
    info!("   GET  /api/availability/vehicle/:id - Chequeo en vivo de vehículo");
    info!("   GET  /api/availability/trailer/:id - Chequeo en vivo de remolque");
    info!("   GET  /api/availability/operator/:id - Chequeo en vivo de operador");

    // Iniciar servidor
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-ops",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
