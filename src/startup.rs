use crate::configuration::Settings;
use crate::connectors::AuthServiceConnector;
use crate::middleware;
use crate::routes;
use crate::services::AccessStore;
use actix_cors::Cors;
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    store: Arc<dyn AccessStore>,
    auth_connector: web::Data<Arc<dyn AuthServiceConnector>>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let store = web::Data::new(store);
    let oauth_cache = web::Data::new(middleware::authentication::OAuthCache::new(
        Duration::from_secs(settings.auth.cache_ttl_secs),
    ));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(store.clone())
            .app_data(auth_connector.clone())
            .app_data(oauth_cache.clone())
            .service(web::scope("/health_check").service(routes::health_check))
            .service(
                web::scope("/plans")
                    .service(routes::plans::list_handler)
                    .service(routes::plans::feature_handler),
            )
            .service(
                web::scope("/me")
                    .wrap(middleware::authentication::Manager::new())
                    .service(routes::me::subscription_handler)
                    .service(routes::me::access_handler)
                    .service(routes::me::feature_handler),
            )
            .service(
                web::scope("/course")
                    .wrap(middleware::authentication::Manager::new())
                    .service(routes::course::access_handler),
            )
            .service(
                web::scope("/quiz")
                    .wrap(middleware::authentication::Manager::new())
                    .service(routes::quiz::attempts_handler),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
