use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Result, models::Collection};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &mingle_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	/// Creates the collection tables that do not exist yet. A collection
	/// whose alternate physical name is already present is left alone so the
	/// name-fallback probe keeps finding the populated table.
	pub async fn ensure_schema(&self) -> Result<()> {
		let lock_id: i64 = 6_463_471;
		// Advisory locks are held per connection. Use a single transaction so
		// the lock is scoped to one connection and automatically released when
		// the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for collection in [Collection::Users, Collection::Events, Collection::Datings] {
			let candidates = collection.table_candidates();
			let mut exists = false;

			for table in candidates {
				let regclass: Option<String> =
					sqlx::query_scalar("SELECT to_regclass($1)::text")
						.bind(table)
						.fetch_one(&mut *tx)
						.await?;

				if regclass.is_some() {
					exists = true;

					break;
				}
			}
			if exists {
				continue;
			}

			let create = format!(
				"CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, doc JSONB NOT NULL)",
				candidates[0],
			);

			sqlx::query(create.as_str()).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}
