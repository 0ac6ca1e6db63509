use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

pub async fn create_pool() -> Result<MySqlPool, sqlx::Error> {
  let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL environment variable must be set.");

  MySqlPoolOptions::new().max_connections(10).connect(&database_url).await
}
