use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::pool::PoolConnection;
use sqlx::postgres::Postgres;

use user_service::load_config;

/// Test database wrapper with a per-test data namespace.
///
/// Every row a test creates carries an id starting with `test_{name}_`,
/// so cleanup (and retries after a failed run) never touch other tests'
/// data even when the whole suite shares one database.
pub struct TestDb {
    pub pool: PgPool,
    prefix: String,
}

impl TestDb {
    /// Connects using the production config and prepares the namespace.
    ///
    /// `test_name` MUST match the test function name so leftover rows are
    /// attributable to the test that made them.
    pub async fn new(test_name: &str) -> Self {
        dotenvy::dotenv().ok();

        let config = load_config().expect("Failed to load config");
        let pool = PgPool::connect(config.database.connection_string().expose_secret())
            .await
            .expect("Failed to connect to database");

        create_users_table(&pool).await;

        let prefix = format!("test_{test_name}");
        cleanup(&pool, &prefix).await;

        Self { pool, prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// An id inside this test's namespace.
    pub fn id(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.prefix)
    }

    pub async fn get_connection(&self) -> PoolConnection<Postgres> {
        self.pool
            .acquire()
            .await
            .expect("Failed to acquire connection")
    }

    pub async fn cleanup(&self) {
        cleanup(&self.pool, &self.prefix).await;
    }
}

/// The schema under test; migrations are out of scope, so the table is
/// bootstrapped directly.
async fn create_users_table(pool: &PgPool) {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id VARCHAR(40) PRIMARY KEY,
            username VARCHAR(100) NOT NULL,
            email VARCHAR(254) NOT NULL,
            phone VARCHAR(20) NOT NULL,
            date_of_birth DATE
        )
        "#,
    )
    .execute(pool)
    .await
    .expect("Failed to create users table");
}

async fn cleanup(pool: &PgPool, prefix: &str) {
    sqlx::query("DELETE FROM users WHERE id LIKE $1")
        .bind(format!("{prefix}%"))
        .execute(pool)
        .await
        .expect("Failed to cleanup test data");
}
