mod config;
mod domain;
mod infrastructure;
mod presentation;
mod usecase;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::{Router, routing::get};
use migration::{Migrator, MigratorTrait};
use mockable::{Clock, DefaultClock};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::{net::TcpListener, signal, sync::Notify};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::AppConfig,
    domain::{
        models::role::DEFAULT_ROLE,
        repositories::role_repository::RoleRepository,
        services::{auditor_service::AuditorProvider, notification_service::NotificationSink},
    },
    infrastructure::{
        argon2_password_hasher::Argon2PasswordHasher,
        brevo_notification_sink::BrevoNotificationSink, jwt_token_generator::JwtTokenGenerator,
        log_notification_sink::LogNotificationSink, os_rng_code_generator::OsRngCodeGenerator,
        outbox_repository::PostgresOutboxRepository, role_repository::PostgresRoleRepository,
        static_auditor::StaticAuditor, token_repository::PostgresTokenRepository,
        user_registration_repository::PostgresUserRegistrationRepository,
        user_repository::PostgresUserRepository,
    },
    presentation::handlers::auth_handler::create_auth_router,
    usecase::{
        activate_account_usecase::ActivateAccountUsecase,
        activation_issuer::ActivationIssuer,
        dispatch_outbox_usecase::{DispatchOutboxUsecase, RetryPolicy},
        login_usecase::LoginUsecase,
        register_user_usecase::RegisterUserUsecase,
    },
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(10)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opt).await?;

    if config.run_migrations {
        Migrator::up(&db, None).await?;
        info!("migrations applied");
    }
    let role = PostgresRoleRepository::new(db.clone())
        .ensure_exists(DEFAULT_ROLE)
        .await?;
    info!(role = role.name(), "default role ready");

    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(DefaultClock);
    let dispatch_trigger = Arc::new(Notify::new());

    match config.brevo.clone() {
        Some(brevo) => {
            info!(sender = %brevo.sender_email, "delivering email through Brevo");
            let sink = BrevoNotificationSink::new(brevo)?;
            spawn_dispatcher(&db, &config, clock.clone(), dispatch_trigger.clone(), sink);
        }
        None => {
            warn!("BREVO_API_KEY not set, activation emails are only logged");
            let sink = LogNotificationSink;
            spawn_dispatcher(&db, &config, clock.clone(), dispatch_trigger.clone(), sink);
        }
    }

    let app = build_app(db, &config, clock, dispatch_trigger);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C, shutting down");
        return;
    }
    info!("received Ctrl+C, shutting down");
}

/// Main router: liveness on `/`, auth endpoints under `/api/auth`.
fn build_app(
    db: DatabaseConnection,
    config: &AppConfig,
    clock: Arc<dyn Clock + Send + Sync>,
    dispatch_trigger: Arc<Notify>,
) -> Router {
    let issuer = || {
        ActivationIssuer::new(
            OsRngCodeGenerator::new(),
            clock.clone(),
            config.activation_url.clone(),
            dispatch_trigger.clone(),
        )
    };
    let auditor: Arc<dyn AuditorProvider> = Arc::new(StaticAuditor::new(config.auditor.clone()));
    let user_repository = PostgresUserRepository::new(db.clone());
    let registration_repository = PostgresUserRegistrationRepository::new(db.clone());
    let password_hasher = Argon2PasswordHasher::new();

    let register_service = RegisterUserUsecase::new(
        PostgresRoleRepository::new(db.clone()),
        registration_repository.clone(),
        password_hasher.clone(),
        issuer(),
        auditor,
    );
    let activate_service = ActivateAccountUsecase::new(
        user_repository.clone(),
        PostgresTokenRepository::new(db),
        registration_repository,
        issuer(),
    );
    let login_service = LoginUsecase::new(
        user_repository,
        password_hasher,
        JwtTokenGenerator::with_expiration(config.jwt_secret.clone(), config.jwt_expiration_hours),
    );

    Router::new()
        .route("/", get(|| async { "Book Network API" }))
        .nest(
            "/api",
            create_auth_router(register_service, activate_service, login_service),
        )
}

fn spawn_dispatcher<N: NotificationSink + 'static>(
    db: &DatabaseConnection,
    config: &AppConfig,
    clock: Arc<dyn Clock + Send + Sync>,
    dispatch_trigger: Arc<Notify>,
    sink: N,
) {
    let dispatcher = DispatchOutboxUsecase::new(
        PostgresOutboxRepository::new(db.clone()),
        sink,
        clock,
        RetryPolicy::from_config(&config.outbox),
    );
    let poll_interval = config.outbox.poll_interval;
    tokio::spawn(async move { dispatcher.run(dispatch_trigger, poll_interval).await });
}
