use mingle_storage::models::Document;

use crate::document;

pub fn users() -> Vec<Document> {
	vec![
		document(serde_json::json!({
			"_id": "u1",
			"name": "Asha Rao",
			"gender": "female",
			"location": "Bengaluru",
			"occupation": "engineer",
			"salary": 180_000,
			"email": "asha@example.com",
			"dateOfBirth": "1992-03-14T00:00:00Z",
		})),
		document(serde_json::json!({
			"_id": "u2",
			"name": "Dev Mehta",
			"gender": "male",
			"location": "Bengaluru",
			"occupation": "designer",
			"salary": 95_000,
			"email": "dev@example.com",
			"dateOfBirth": "1988-11-02T00:00:00Z",
		})),
		document(serde_json::json!({
			"_id": "u3",
			"name": "Priya Nair",
			"gender": "female",
			"location": "Mumbai",
			"occupation": "doctor",
			"salary": 210_000,
			"email": "priya@example.com",
			"dateOfBirth": "1995-07-21T00:00:00Z",
		})),
		document(serde_json::json!({
			"_id": "u4",
			"name": "Rahul Iyer",
			"gender": "male",
			"location": "Pune",
			"occupation": "teacher",
			"dateOfBirth": "1990-01-30T00:00:00Z",
		})),
	]
}

pub fn events() -> Vec<Document> {
	vec![
		document(serde_json::json!({
			"_id": "e1",
			"type": "meetup",
			"location": "Bengaluru",
			"date": "2024-05-18T18:30:00Z",
			"participants": ["u1", "u2"],
		})),
		document(serde_json::json!({
			"_id": "e2",
			"type": "concert",
			"location": "Mumbai",
			"date": "2024-06-02T20:00:00Z",
			// "ghost" references a deleted user on purpose.
			"participants": ["u3", "ghost"],
		})),
		document(serde_json::json!({
			"_id": "e3",
			"type": "meetup",
			"location": "Pune",
			"date": "2024-07-09T17:00:00Z",
			"participants": [],
		})),
	]
}

pub fn datings() -> Vec<Document> {
	vec![
		document(serde_json::json!({
			"_id": "d1",
			"location": "Goa",
			"date": "2024-05-25T19:00:00Z",
			"firstUserId": "u1",
			"secondUserId": "u3",
		})),
		document(serde_json::json!({
			"_id": "d2",
			"location": "Bengaluru",
			"date": "2024-06-15T19:30:00Z",
			"firstUserId": "u2",
		})),
	]
}
