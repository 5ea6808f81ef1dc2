mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;

// Import the services
use service::{
    deposit_service::DepositService,
    gift_code_service::GiftCodeService,
    investment_service::InvestmentService,
    notification_service::NotificationService,
    withdrawal_service::WithdrawalService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    // Services
    pub notification_service: Arc<NotificationService>,
    pub investment_service: Arc<InvestmentService>,
    pub withdrawal_service: Arc<WithdrawalService>,
    pub deposit_service: Arc<DepositService>,
    pub gift_code_service: Arc<GiftCodeService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client_arc = Arc::new(db_client);

        let notification_service = Arc::new(NotificationService::new(db_client_arc.clone()));

        let investment_service = Arc::new(InvestmentService::new(
            db_client_arc.clone(),
            notification_service.clone(),
            config.clone(),
        ));

        let withdrawal_service = Arc::new(WithdrawalService::new(
            db_client_arc.clone(),
            notification_service.clone(),
            config.clone(),
        ));

        let deposit_service = Arc::new(DepositService::new(
            db_client_arc.clone(),
            notification_service.clone(),
            config.clone(),
        ));

        let gift_code_service = Arc::new(GiftCodeService::new(
            db_client_arc.clone(),
            notification_service.clone(),
        ));

        Self {
            env: config,
            db_client: db_client_arc,
            notification_service,
            investment_service,
            withdrawal_service,
            deposit_service,
            gift_code_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    // Connect to PostgreSQL
    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            println!("✅ Connection to the database is successful!");
            pool
        }
        Err(err) => {
            println!("🔥 Failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);

    let allowed_origins = vec![
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        "http://localhost:8000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state.clone()).layer(cors);

    println!("🚀 Server is running on http://localhost:{}", config.port);

    // Start background jobs
    tokio::spawn(service::background_jobs::start_pending_payment_expiry_job(
        app_state.clone(),
    ));
    tokio::spawn(service::background_jobs::start_subscription_maturity_job(
        app_state.clone(),
    ));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
