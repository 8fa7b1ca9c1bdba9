use actix_cors::Cors;
use actix_web::{
    middleware::{self, Condition},
    web, App, HttpServer,
};
use activity_directory::{cli::Cli, configure};
use anyhow::Context;
use clap::Parser;
use directory::directory::directory::Directory;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let directory = Directory::new(args.directory_options())
        .context("Failed to seed the activity directory")?;

    let request_manager = directory.run();

    let shutdown_request_manager = request_manager.clone();

    log::info!("starting HTTP server on port {}.", args.port);

    log::info!(
        "Frontend: http://{}:{}/static/index.html",
        args.address,
        args.port
    );

    let log_http = args.log_http;

    // Start HTTP server, actix handles Ctrl-C and returns once in-flight requests finish
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(request_manager.clone()))
            .configure(configure)
            .wrap(Cors::permissive())
            .wrap(Condition::new(log_http, middleware::Logger::default()))
    })
    .workers(args.http_workers)
    .bind((args.address, args.port))?
    .run()
    .await?;

    let shutdown_response = shutdown_request_manager
        .send_shutdown_request()
        .context("Failed to shutdown the activity directory")?;

    log::info!("Shutting down server: {}", shutdown_response);

    Ok(())
}
