use std::sync::Arc;

use mingle_service::SearchService;
use mingle_storage::{db::Db, pg::PgStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<SearchService>,
}
impl AppState {
	pub async fn new(config: mingle_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let store = Arc::new(PgStore::new(db));
		let service = SearchService::new(config, store);

		Ok(Self { service: Arc::new(service) })
	}
}
