use api_types::auth::{Login, LoginResponse, User};
use reqwest::Method;

use crate::{Client, Result};

impl Client {
    /// Exchanges credentials for a token and keeps it for later requests.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse> {
        let payload = Login {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.send_json(Method::POST, "auth/login", &payload).await?;
        self.set_token(Some(response.token.clone()));
        tracing::info!("logged in as {email}");
        Ok(response)
    }

    pub async fn me(&self) -> Result<User> {
        self.get("auth/me").await
    }
}
