use poem::listener::TcpListener;
use sea_orm::Database;

use forum_backend::build_app;
use forum_backend::migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let db_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://forum.db?mode=rwc".into());
    let db = Database::connect(db_url.as_str()).await?;
    Migrator::up(&db, None).await?;
    tracing::info!(%db_url, "database ready");

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    tracing::info!(%addr, "forum api listening");
    poem::Server::new(TcpListener::bind(addr)).run(build_app(db)).await?;
    Ok(())
}
