use crate::envelope::unwrap_data;
use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::models::{Profile, ProfileInput};
use crate::multipart::{MultipartForm, UploadFile};
use tracing::instrument;

pub const PROFILE_PATH: &str = "profile";
pub const AVATAR_FIELD: &str = "avatar";

#[derive(Clone)]
pub struct ProfileService {
    http: HttpClient,
}

impl ProfileService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[instrument(skip(self))]
    pub async fn get(&self) -> ApiResult<Profile> {
        let body = self.http.get(PROFILE_PATH, Vec::new()).await?;
        unwrap_data(body, "Profile not found")
    }

    #[instrument(skip(self, input, avatar))]
    pub async fn update(&self, input: &ProfileInput, avatar: Option<UploadFile>) -> ApiResult<Profile> {
        let body = match avatar {
            None => self.http.put(PROFILE_PATH, input).await?,
            Some(file) => {
                let form = MultipartForm::from_payload(input, &[])?
                    .file(AVATAR_FIELD, file)
                    .with_method_override("PUT");
                self.http.post_multipart(PROFILE_PATH, form).await?
            }
        };
        unwrap_data(body, "Failed to update profile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::mock_transport::MockTransport;
    use crate::multipart::METHOD_OVERRIDE_FIELD;
    use serde_json::json;
    use std::sync::Arc;

    fn profile_body() -> serde_json::Value {
        json!({"success": true, "data": {
            "id": 1,
            "name": "Fatou Sall",
            "email": "fatou@example.com",
            "wallet": {"id": 3, "user_id": 1, "balance": 25000.0, "currency": "XOF"}
        }})
    }

    #[tokio::test]
    async fn test_get_profile_with_wallet() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(HttpMethod::Get, "/profile", 200, profile_body());

        let profile = ProfileService::new(mock.client()).get().await.unwrap();
        assert_eq!(profile.name, "Fatou Sall");
        assert_eq!(profile.wallet.map(|w| w.balance), Some(25000.0));
    }

    #[tokio::test]
    async fn test_update_with_avatar_is_multipart() {
        let mock = Arc::new(MockTransport::new());
        mock.respond(HttpMethod::Post, "/profile", 200, profile_body());

        let input = ProfileInput {
            name: "Fatou Sall".to_string(),
            phone: Some("+221770000000".to_string()),
        };
        let avatar = UploadFile::new("me.png", "image/png", vec![1]);
        ProfileService::new(mock.client())
            .update(&input, Some(avatar))
            .await
            .unwrap();

        let request = mock.last_request().unwrap();
        let form = request.body.as_multipart().unwrap();
        assert_eq!(form.files(AVATAR_FIELD).len(), 1);
        assert_eq!(form.text_values("phone"), vec!["+221770000000"]);
        assert_eq!(form.text_values(METHOD_OVERRIDE_FIELD), vec!["PUT"]);
    }
}
