pub mod routes;

#[cfg(test)]
mod tests;

use crate::{config::Config, handler::ImageHandler};
use actix_web::{middleware, web, App, HttpServer};
use std::io;

/// Builds the handler from `config` and serves until shutdown.
pub async fn run(config: Config) -> io::Result<()> {
    let handler = ImageHandler::from_config(config.together.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    let handler = web::Data::new(handler);
    let bind_address = config.bind_address();

    log::info!("🔄 Binding {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(handler.clone())
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(bind_address)?
    .run()
    .await
}
