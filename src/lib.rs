//! Submission and query service for cloud interoperability test runs.

#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod dto;
#[cfg(feature = "data")]
pub mod filters;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "data")]
pub mod services;
#[cfg(feature = "data")]
pub mod validation;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use std::sync::Arc;

    use actix_cors::Cors;
    use actix_web::{App, HttpServer, middleware, web};

    use crate::db::establish_connection_pool;
    use crate::models::config::{ResultsSettings, ServerConfig};
    use crate::repository::DieselRepository;
    use crate::routes;
    use crate::services::results::ResultsService;
    use crate::validation::SubmissionValidator;

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let settings = ResultsSettings::try_from(&server_config)
            .map_err(|e| std::io::Error::other(format!("Invalid results settings: {e}")))?;

        // Establish Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
            std::io::Error::other(format!("Failed to establish database connection: {e}"))
        })?;

        let repo = web::Data::new(DieselRepository::new(pool));
        let service = web::Data::new(ResultsService::new(
            settings,
            Arc::new(SubmissionValidator),
        ));

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Serving test results on {}:{}",
            server_config.address,
            server_config.port
        );

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .app_data(repo.clone())
                .app_data(service.clone())
                .configure(routes::configure)
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
