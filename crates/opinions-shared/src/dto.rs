//! Data Transfer Objects - request/response bodies of the opinions API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `POST /opinions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpinionRequest {
    pub title: String,
    pub body: String,
    pub user_name: String,
}

/// Identifier assigned by the service, sent as either a JSON string or a
/// number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(u64),
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Text(id) => f.write_str(id),
            WireId::Number(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for WireId {
    fn from(id: &str) -> Self {
        WireId::Text(id.to_string())
    }
}

impl From<u64> for WireId {
    fn from(id: u64) -> Self {
        WireId::Number(id)
    }
}

/// An opinion as the service returns it.
///
/// `id` is absent until persisted and `votes` defaults to zero when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpinionDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<WireId>,
    pub title: String,
    pub body: String,
    pub user_name: String,
    #[serde(default)]
    pub votes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_uses_camel_case() {
        let request = CreateOpinionRequest {
            title: "Title".to_string(),
            body: "Some body text".to_string(),
            user_name: "Ada".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"title": "Title", "body": "Some body text", "userName": "Ada"})
        );
    }

    #[test]
    fn test_opinion_votes_default_to_zero() {
        let dto: OpinionDto = serde_json::from_value(json!({
            "id": "7",
            "title": "Title",
            "body": "Some body text",
            "userName": "Ada"
        }))
        .unwrap();

        assert_eq!(dto.id, Some(WireId::from("7")));
        assert_eq!(dto.votes, 0);
    }

    #[test]
    fn test_opinion_accepts_negative_votes() {
        let dto: OpinionDto = serde_json::from_str(
            r#"{"id":"x","title":"T","body":"B","userName":"U","votes":-4}"#,
        )
        .unwrap();
        assert_eq!(dto.votes, -4);
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let dtos: Vec<OpinionDto> = serde_json::from_str(
            r#"[{"id":1718000000000,"title":"T","body":"B","userName":"U","votes":0}]"#,
        )
        .unwrap();

        assert_eq!(dtos[0].id, Some(WireId::Number(1718000000000)));
        assert_eq!(dtos[0].id.as_ref().unwrap().to_string(), "1718000000000");
    }

    #[test]
    fn test_numeric_id_serializes_as_number() {
        let dto = OpinionDto {
            id: Some(WireId::Number(3)),
            title: "T".to_string(),
            body: "B".to_string(),
            user_name: "U".to_string(),
            votes: 1,
        };
        assert_eq!(serde_json::to_value(&dto).unwrap()["id"], json!(3));
    }
}
