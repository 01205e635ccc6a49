use serde_json::Value;

/// Documents are schemaless JSON objects keyed by a string `_id`.
pub type Document = serde_json::Map<String, Value>;

pub const ID_FIELD: &str = "_id";
pub const NAME_FIELD: &str = "name";
pub const PARTICIPANTS_FIELD: &str = "participants";
pub const FIRST_PARTNER_FIELD: &str = "firstUserId";
pub const SECOND_PARTNER_FIELD: &str = "secondUserId";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
	Users,
	Events,
	Datings,
}
impl Collection {
	/// The hint handed to the translator for this collection.
	pub fn hint(self) -> &'static str {
		match self {
			Self::Users => "users",
			Self::Events => "events",
			Self::Datings => "dating",
		}
	}

	/// Physical names to probe, in order. Dating deployments disagree on the
	/// collection name, so both spellings are tried at the storage boundary.
	pub fn table_candidates(self) -> &'static [&'static str] {
		match self {
			Self::Users => &["users"],
			Self::Events => &["events"],
			Self::Datings => &["datings", "dating"],
		}
	}
}
