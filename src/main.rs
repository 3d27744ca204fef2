use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use course_platform::adapters::http::{api_router, AuthState, CommentAppState, PurchaseAppState};
use course_platform::adapters::postgres;
use course_platform::adapters::{
    InMemoryStore, JwtSessionValidator, PostgresCommentRepository, PostgresCourseRepository,
    PostgresProgressRepository, PostgresPurchaseRepository, PostgresUserRepository, StripeConfig,
    StripePaymentAdapter,
};
use course_platform::application::handlers::purchase::CheckoutSettings;
use course_platform::config::{AppConfig, ServerConfig};
use course_platform::ports::{
    CommentRepository, CourseRepository, ProgressRepository, PurchaseRepository, UserRepository,
};

/// Store ports behind one backend.
struct Stores {
    comments: Arc<dyn CommentRepository>,
    courses: Arc<dyn CourseRepository>,
    users: Arc<dyn UserRepository>,
    progress: Arc<dyn ProgressRepository>,
    purchases: Arc<dyn PurchaseRepository>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let stores = open_stores(&config).await?;

    let payment_provider = Arc::new(StripePaymentAdapter::new(
        StripeConfig::from_secrets(config.payment.api_key(), config.payment.webhook_secret())
            .with_require_livemode(config.payment.require_livemode),
    ));
    let auth: AuthState = Arc::new(JwtSessionValidator::new(config.auth.secret()));

    let comments = CommentAppState::new(stores.comments.clone(), stores.users.clone());
    let purchases = PurchaseAppState {
        courses: stores.courses,
        users: stores.users,
        progress: stores.progress,
        purchases: stores.purchases,
        payment_provider,
        checkout_settings: CheckoutSettings::new(
            config.payment.currency.clone(),
            config.payment.client_url.clone(),
        ),
    };

    let app = with_layers(api_router(comments, purchases, auth), &config.server);

    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        stripe_test_mode = config.payment.is_test_mode(),
        "Course platform listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.clone()));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn open_stores(config: &AppConfig) -> anyhow::Result<Stores> {
    if !config.database.is_configured() {
        tracing::warn!("No database URL configured; using the in-memory store");
        let store = Arc::new(InMemoryStore::new());
        return Ok(Stores {
            comments: store.clone(),
            courses: store.clone(),
            users: store.clone(),
            progress: store.clone(),
            purchases: store,
        });
    }

    let pool = postgres::connect(&config.database).await?;
    tracing::info!("Database connected");

    if config.database.run_migrations {
        postgres::run_migrations(&pool).await?;
        tracing::info!("Migrations applied");
    }

    Ok(Stores {
        comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
        courses: Arc::new(PostgresCourseRepository::new(pool.clone())),
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        progress: Arc::new(PostgresProgressRepository::new(pool.clone())),
        purchases: Arc::new(PostgresPurchaseRepository::new(pool)),
    })
}

fn with_layers(app: Router, server: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Cookies need explicit origins; fall back to a permissive policy in development.
    let cors = if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
            ])
            .allow_headers([
                axum::http::header::AUTHORIZATION,
                axum::http::header::CONTENT_TYPE,
            ])
            .allow_credentials(true)
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(TimeoutLayer::new(server.request_timeout())),
    )
}
