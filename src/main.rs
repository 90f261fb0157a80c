//! Process entry point: configuration, dependency construction and the
//! axum server.
//!
//! Every external client (Postgres pool, Redis connection, Stripe gateway,
//! mailer) is constructed exactly once here and injected into the module
//! states; nothing holds module-level singletons.

use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cetma_backend::adapters::auth::{Argon2CredentialHasher, JwtTokenService};
use cetma_backend::adapters::certificate::StubCertificateGenerator;
use cetma_backend::adapters::email::ResendMailer;
use cetma_backend::adapters::guard::RedisIdempotencyGuard;
use cetma_backend::adapters::http::certificates::{certificate_routes, CertificateAppState};
use cetma_backend::adapters::http::course::{course_routes, question_routes, CourseAppState};
use cetma_backend::adapters::http::enrollment::{
    enrollment_routes, webhook_routes, EnrollmentAppState,
};
use cetma_backend::adapters::http::middleware::{auth_middleware, AuthState};
use cetma_backend::adapters::http::user::{user_routes, UserAppState};
use cetma_backend::adapters::postgres::{
    PostgresCourseRepository, PostgresEntitlementStore, PostgresQuestionRepository,
    PostgresUserRepository,
};
use cetma_backend::adapters::stripe::{StripeConfig, StripePaymentGateway};
use cetma_backend::application::handlers::enrollment::CheckoutUrls;
use cetma_backend::config::AppConfig;

#[tokio::main]
async fn main() {
    // --- Configuration ---
    let config = AppConfig::load().expect("Failed to load configuration");
    config.validate().expect("Invalid configuration");

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "Loaded configuration"
    );

    // --- Database ---
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Database migrations applied");
    }

    // --- Redis ---
    let redis_client =
        redis::Client::open(config.redis.url.clone()).expect("Invalid Redis URL");
    let redis_conn = redis_client
        .get_multiplexed_tokio_connection()
        .await
        .expect("Failed to connect to Redis");
    tracing::info!("Redis connection established");

    // --- Adapters ---
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let course_repository = Arc::new(PostgresCourseRepository::new(pool.clone()));
    let question_repository = Arc::new(PostgresQuestionRepository::new(pool.clone()));
    let entitlement_store = Arc::new(PostgresEntitlementStore::new(pool.clone()));

    let payment_gateway = Arc::new(StripePaymentGateway::new(
        StripeConfig::new(
            config.payment.stripe_api_key.clone(),
            config.payment.stripe_webhook_secret.clone(),
        )
        .with_currency(config.payment.currency.clone()),
    ));

    let payment_events = Arc::new(RedisIdempotencyGuard::new(
        redis_conn.clone(),
        "payment_event",
        config.redis.payment_event_ttl_secs,
    ));
    let revoked_tokens = Arc::new(RedisIdempotencyGuard::new(
        redis_conn,
        "revoked_token",
        config.redis.revoked_token_ttl_secs,
    ));

    let credential_hasher = Arc::new(Argon2CredentialHasher::new());
    let token_service = Arc::new(JwtTokenService::new(
        &config.auth.jwt_secret,
        config.auth.session_ttl_secs,
        config.auth.reset_ttl_secs,
    ));
    let mailer = Arc::new(ResendMailer::new(
        config.email.resend_api_key.clone(),
        config.email.from_header(),
    ));
    let certificate_generator = Arc::new(StubCertificateGenerator::new());

    // --- Module states ---
    let user_state = UserAppState {
        user_repository: user_repository.clone(),
        entitlement_store: entitlement_store.clone(),
        credential_hasher: credential_hasher.clone(),
        token_service: token_service.clone(),
        mailer: mailer.clone(),
        revoked_tokens: revoked_tokens.clone(),
        reset_url: config.email.reset_url.clone(),
    };

    let course_state = CourseAppState {
        course_repository: course_repository.clone(),
        question_repository: question_repository.clone(),
    };

    let enrollment_state = EnrollmentAppState {
        user_repository: user_repository.clone(),
        course_repository: course_repository.clone(),
        entitlement_store: entitlement_store.clone(),
        payment_gateway,
        payment_events,
        checkout_urls: CheckoutUrls::from_client_url(&config.payment.client_url),
    };

    let certificate_state = CertificateAppState {
        generator: certificate_generator,
    };

    let auth_state = AuthState {
        token_service,
        revoked_tokens,
    };

    // --- Router ---
    let request_id_header = axum::http::HeaderName::from_static("x-request-id");

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/users", user_routes().with_state(user_state))
        .nest("/api/courses", course_routes().with_state(course_state.clone()))
        .nest("/api/questions", question_routes().with_state(course_state))
        .nest(
            "/api/enrollments",
            enrollment_routes().with_state(enrollment_state.clone()),
        )
        .nest("/api/webhooks", webhook_routes().with_state(enrollment_state))
        .nest(
            "/api/certificates",
            certificate_routes().with_state(certificate_state),
        )
        // -- Middleware stack (applied bottom-up) --
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(build_cors_layer(&config));

    // --- Start server ---
    let addr = config.server.socket_addr();
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Build the CORS layer from server configuration.
///
/// With no configured origins the layer stays permissive, which suits
/// local development; production deployments set CETMA__SERVER__CORS_ORIGINS.
fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();

    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<_> = origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
