use migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:./splitbook.db?mode=rwc".to_string());
    let db = sea_orm::Database::connect(&url).await?;
    Migrator::up(&db, None).await?;
    println!("migrations applied to {url}");
    Ok(())
}
