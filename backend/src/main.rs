mod config;
mod data;
mod db;
mod entities;
mod error;
mod graphql;
mod services;

use actix_cors::Cors;
use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use async_graphql::{http::GraphiQLSource, EmptySubscription, Schema};
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::db::init_db;
use crate::graphql::{Mutation, Query};
use crate::services::acquisition::AcquisitionService;
use crate::services::depreciation::DepreciationService;
use crate::services::disposition::DispositionService;
use crate::services::processing::ProcessingService;
use crate::services::reconciliation::ReconciliationService;
use crate::services::scheduler;

pub type AppSchema = Schema<Query, Mutation, EmptySubscription>;

async fn graphql_handler(schema: web::Data<AppSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> actix_web::Result<actix_web::HttpResponse> {
    Ok(actix_web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(GraphiQLSource::build().endpoint("/graphql").finish()))
}

async fn health() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let db = Arc::new(init_db(&config.database_url).await?);

    let acquisition_service = Arc::new(AcquisitionService::new());
    let depreciation_service = Arc::new(DepreciationService::new());
    let disposition_service = Arc::new(DispositionService::new());
    let processing_service = Arc::new(ProcessingService::new());
    let reconciliation_service = Arc::new(ReconciliationService::new());

    let schema = Schema::build(Query::default(), Mutation::default(), EmptySubscription)
        .data(db.clone())
        .data(acquisition_service.clone())
        .data(depreciation_service.clone())
        .data(disposition_service.clone())
        .data(processing_service.clone())
        .data(reconciliation_service.clone())
        .finish();

    // Daily per-tenant monthly posting
    tokio::spawn(scheduler::run(db.as_ref().clone()));

    tracing::info!("Starting server at http://{}:{}", config.host, config.port);
    tracing::info!(
        "GraphiQL playground: http://{}:{}/graphiql",
        config.host,
        config.port
    );

    let db_for_app: Arc<DatabaseConnection> = db.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(schema.clone()))
            .app_data(web::Data::new(db_for_app.clone()))
            .wrap(actix_middleware::Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header(),
            )
            .route("/health", web::get().to(health))
            .route("/graphiql", web::get().to(graphiql))
            .service(
                web::resource("/graphql")
                    .route(web::post().to(graphql_handler))
                    .route(web::get().to(graphql_handler)),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
