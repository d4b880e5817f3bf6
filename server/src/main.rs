use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticketing_server::auth_admin::SupabaseAuthAdmin;
use ticketing_server::email::{ConsoleEmailSender, EmailSender, ResendEmailSender};
use ticketing_server::gateway::RazorpayGateway;
use ticketing_server::store::PgStore;
use ticketing_server::{create_routes, AppState, Config};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketing_server=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let http_client = reqwest::Client::new();

    let mailer: Arc<dyn EmailSender> = match &config.email.resend_api_key {
        Some(key) => Arc::new(ResendEmailSender::new(http_client.clone(), key.clone())),
        None => {
            tracing::warn!("RESEND_API_KEY not set, emails will be logged only");
            Arc::new(ConsoleEmailSender::new())
        }
    };

    let state = AppState::new(
        config.clone(),
        Arc::new(PgStore::new(pool)),
        Arc::new(RazorpayGateway::new(http_client.clone(), &config.razorpay)),
        Arc::new(SupabaseAuthAdmin::new(http_client, &config.supabase)),
        mailer,
    );

    let app: Router = create_routes(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
