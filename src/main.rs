use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};

use discharge_explainer::{
    app_state::AppState,
    config::Config,
    handlers::{configure, json_config},
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    if let Err(err) = config.validate() {
        log::error!("Invalid configuration: {}", err);
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()));
    }

    let host = config.web_server_host.clone();
    let port = config.web_server_port;
    let max_request_bytes = config.max_request_bytes;
    let cors_origin = config.cors_allowed_origin.clone();

    let state = AppState::new(config).map_err(|err| {
        log::error!("Failed to initialize application state: {}", err);
        std::io::Error::other(err.to_string())
    })?;

    log::info!("Starting discharge explainer on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default()
                .allowed_origin(origin)
                .allowed_methods(vec!["GET", "POST"])
                .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
                .expose_headers(vec![header::CONTENT_DISPOSITION])
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(json_config(max_request_bytes))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
