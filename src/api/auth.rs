//! Admin login endpoint

use serde::{Deserialize, Serialize};

use super::{ApiClient, Method};
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::models::User;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields are required; nothing else is checked client-side
    pub fn validate(&self) -> ApiResult<()> {
        let mut errors = FieldErrors::new();
        if self.email.trim().is_empty() {
            errors.insert("email".to_string(), "Email is required".to_string());
        }
        if self.password.is_empty() {
            errors.insert("password".to_string(), "Password is required".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: User,
    /// Seconds until the token expires
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// `POST auth/login`, bounded by the login timeout
pub async fn login(client: &ApiClient, credentials: &Credentials) -> ApiResult<LoginResponse> {
    credentials.validate()?;

    let body = serde_json::to_value(Credentials {
        email: credentials.email.trim().to_string(),
        password: credentials.password.clone(),
    })?;
    let request = client
        .request(Method::Post, "auth/login")
        .json(body)
        .timeout(client.config().login_timeout());

    let response: LoginResponse = client.fetch(request).await?;
    if response.token.is_empty() {
        return Err(ApiError::Decode("login response carried no token".to_string()));
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::api::RequestBody;
    use crate::config::AppConfig;

    fn client(transport: &ScriptedTransport) -> ApiClient {
        ApiClient::new(Rc::new(transport.clone()), AppConfig::default())
    }

    #[tokio::test]
    async fn test_login_posts_credentials_with_timeout() {
        let transport = ScriptedTransport::new();
        transport.reply(
            200,
            r#"{"data":{"token":"abc","user":{"_id":"u1","name":"Asha","email":"asha@lab.in"},"expiresIn":3600}}"#,
        );

        let response = login(&client(&transport), &Credentials::new(" asha@lab.in ", "pw")).await.unwrap();
        assert_eq!(response.token, "abc");
        assert_eq!(response.user.name, "Asha");
        assert_eq!(response.expires_in, Some(3600));

        let sent = &transport.requests()[0];
        assert!(sent.url.ends_with("/auth/login"));
        assert_eq!(sent.timeout, Some(Duration::from_secs(10)));
        assert_eq!(
            sent.body,
            RequestBody::Json(serde_json::json!({ "email": "asha@lab.in", "password": "pw" }))
        );
    }

    #[tokio::test]
    async fn test_empty_fields_send_nothing() {
        let transport = ScriptedTransport::new();
        let err = login(&client(&transport), &Credentials::new("", "")).await.unwrap_err();

        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_login_is_server_error() {
        let transport = ScriptedTransport::new();
        transport.reply(401, r#"{"message":"Invalid credentials"}"#);

        let err = login(&client(&transport), &Credentials::new("a@b.c", "nope")).await.unwrap_err();
        assert_eq!(err, ApiError::Server { status: 401, message: "Invalid credentials".into() });
    }
}
