use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        if let Ok(url) = migration::database_url_from_env() {
            std::env::set_var("DATABASE_URL", url);
        }
    }
    cli::run_cli(migration::Migrator).await;
}
