use crate::models::{Client, ClientDetails};
use crate::utils::not_blank;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClientRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub phone_number: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub address: String,
}

impl From<ClientRequest> for ClientDetails {
    fn from(request: ClientRequest) -> Self {
        Self {
            name: request.name.trim().to_string(),
            phone_number: request.phone_number.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            address: request.address.trim().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub id: String,
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            phone_number: client.phone_number,
            email: client.email,
            address: client.address,
            created_at: client.created_at.to_rfc3339(),
            updated_at: client.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_validation() {
        let request: ClientRequest = serde_json::from_value(json!({
            "name": "Ayesha Khan",
            "phoneNumber": "03001234567",
            "email": "Ayesha@Example.com",
            "address": "12 Canal Road, Lahore"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let details = ClientDetails::from(request);
        assert_eq!(details.email, "ayesha@example.com");
    }

    #[test]
    fn test_request_rejects_blank_and_bad_email() {
        let request: ClientRequest = serde_json::from_value(json!({
            "name": "  ",
            "phoneNumber": "03001234567",
            "email": "not-an-email",
            "address": "12 Canal Road"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("address"));
    }
}
