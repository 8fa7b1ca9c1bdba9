use actix_web::web;

pub mod assets;
pub mod cli;
pub mod error;
pub mod routes;

/// Registers every route plus the query extractor config, shared by `main` and the integration tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::query_config())
        .service(routes::index)
        .service(routes::list_activities)
        .service(routes::signup)
        .service(routes::unregister)
        .service(assets::index_html)
        .service(assets::static_file);
}
