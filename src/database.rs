/// Connection pool handed to the service layer.
pub type DbPool = sqlx::PgPool;

/// Connection type the repository operates on.
///
/// Both a pooled connection and an open transaction coerce to
/// `&mut DbConn`, so repository functions never care which one the
/// caller supplies.
pub type DbConn = sqlx::PgConnection;
