use actix_web::{web, App, HttpServer};

use todo_api::config::Config;
use todo_api::service::TodoService;
use todo_api::{api, repository, telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    telemetry::init_tracing(&config.app_name)?;

    let store = repository::connect(&config).await?;
    let app_data = web::Data::new(TodoService::new(store));

    tracing::info!(host = %config.host, port = config.port, backend = ?config.backend, "starting todo api");
    HttpServer::new(move ||
        App::new()
            .app_data(app_data.clone())
            .configure(api::configure)
            .default_service(web::route().to(api::not_found))
            .wrap(actix_web::middleware::Logger::default())
    )
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;
    Ok(())
}
