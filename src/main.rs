use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::{Context, Result, bail};
use log::info;

use kurs::config::{Config, StoreKind};
use kurs::feed::NbkFeed;
use kurs::routes::{self, AppState};
use kurs::store::{MemoryStore, PgStore, RateStore};

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load()?;

    let store: Arc<dyn RateStore> = match (config.store, &config.db) {
        (StoreKind::Postgres, Some(db)) => {
            let store = PgStore::connect(db)
                .await
                .context("Can't connect to the database")?;
            store
                .create_table()
                .await
                .context("Can't create the rates table")?;
            Arc::new(store)
        }
        (StoreKind::Postgres, None) => bail!("DBConfig is required for the Postgres store"),
        (StoreKind::Memory, _) => {
            info!("Keeping rates in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(Arc::new(NbkFeed::new(config.feed.base_url.clone())), store);

    let addr = (config.server.host.clone(), config.server.port);
    info!("Listening on {}:{}", addr.0, addr.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
