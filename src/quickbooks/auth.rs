// 🔑 QuickBooks OAuth2 - Authorization URL, code exchange, token file
// Interactive flow: the operator opens the authorization URL, approves the
// app, and pastes the code back. The bearer token lives in one JSON file.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AuthError;
use crate::quickbooks::http::QbOnlineClient;

/// Intuit OAuth2 endpoints
const AUTHORIZATION_ENDPOINT: &str = "https://appcenter.intuit.com/connect/oauth2";
const TOKEN_ENDPOINT: &str = "https://oauth.platform.intuit.com/oauth2/v1/tokens/bearer";
const ACCOUNTING_SCOPE: &str = "com.intuit.quickbooks.accounting";

/// Default location of the stored token
pub const DEFAULT_TOKEN_FILE: &str = ".qb_token.json";

// ============================================================================
// AUTH CONFIG
// ============================================================================

/// QuickBooks company environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QbEnvironment {
    Sandbox,
    Production,
}

impl QbEnvironment {
    /// Base URL for the accounting API in this environment
    pub fn api_base_url(&self) -> &'static str {
        match self {
            QbEnvironment::Sandbox => "https://sandbox-quickbooks.api.intuit.com",
            QbEnvironment::Production => "https://quickbooks.api.intuit.com",
        }
    }
}

/// OAuth2 app credentials plus the company (realm) to post into
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub realm_id: String,
    pub environment: QbEnvironment,
}

impl AuthConfig {
    /// Read the config from environment variables.
    ///
    /// `QB_CLIENT_ID`, `QB_CLIENT_SECRET`, `QB_REDIRECT_URI`, `QB_REALM_ID`
    /// are required; `QB_ENVIRONMENT` defaults to `sandbox`.
    pub fn from_env() -> Result<AuthConfig, AuthError> {
        let required = |var: &str| {
            env::var(var).map_err(|_| AuthError::MissingConfig {
                var: var.to_string(),
            })
        };

        let environment = match env::var("QB_ENVIRONMENT").as_deref() {
            Ok("production") => QbEnvironment::Production,
            _ => QbEnvironment::Sandbox,
        };

        Ok(AuthConfig {
            client_id: required("QB_CLIENT_ID")?,
            client_secret: required("QB_CLIENT_SECRET")?,
            redirect_uri: required("QB_REDIRECT_URI")?,
            realm_id: required("QB_REALM_ID")?,
            environment,
        })
    }
}

// ============================================================================
// OAUTH TOKEN
// ============================================================================

/// Bearer token as returned by Intuit's token endpoint and persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: u64,
}

// ============================================================================
// AUTH PROVIDER
// ============================================================================

/// The Auth Provider collaborator: builds the authorization URL, exchanges
/// the pasted code for a token, and hands out API client handles.
pub struct QbAuthProvider {
    config: AuthConfig,
    token_path: PathBuf,
}

impl QbAuthProvider {
    /// Provider storing the token at the default path
    pub fn new(config: AuthConfig) -> Self {
        Self::with_token_path(config, Path::new(DEFAULT_TOKEN_FILE))
    }

    /// Provider with an explicit token file location
    pub fn with_token_path(config: AuthConfig, token_path: &Path) -> Self {
        QbAuthProvider {
            config,
            token_path: token_path.to_path_buf(),
        }
    }

    /// URL the operator opens in a browser to approve the app
    pub fn authorization_url(&self) -> String {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("response_type", "code"),
            ("scope", ACCOUNTING_SCOPE),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("state", "servquick-import"),
        ];

        let query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();

        format!("{}?{}", AUTHORIZATION_ENDPOINT, query.join("&"))
    }

    /// Exchange an authorization code for a bearer token and persist it
    pub fn exchange_code(&self, code: &str) -> Result<OAuthToken, AuthError> {
        let client = reqwest::blocking::Client::new();

        let response = client
            .post(TOKEN_ENDPOINT)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_else(|_| String::new());
            return Err(AuthError::TokenExchange {
                status: status.as_u16(),
                message,
            });
        }

        let token: OAuthToken = response.json()?;
        self.save_token(&token)?;
        Ok(token)
    }

    /// True when a stored token with an access token exists
    pub fn is_authenticated(&self) -> bool {
        matches!(self.load_token(), Ok(token) if !token.access_token.is_empty())
    }

    /// Build an API client from the stored token.
    ///
    /// Fails with `NotAuthenticated` if no valid token is on disk.
    pub fn client(&self) -> Result<QbOnlineClient, AuthError> {
        let token = self.load_token()?;
        if token.access_token.is_empty() {
            return Err(AuthError::NotAuthenticated);
        }

        Ok(QbOnlineClient::new(
            token.access_token,
            self.config.realm_id.clone(),
            self.config.environment.api_base_url().to_string(),
        ))
    }

    /// Write the token file (pretty JSON, single file)
    pub fn save_token(&self, token: &OAuthToken) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(token)?;
        fs::write(&self.token_path, json)?;
        Ok(())
    }

    /// Read the token file; a missing file means "not authenticated"
    pub fn load_token(&self) -> Result<OAuthToken, AuthError> {
        if !self.token_path.exists() {
            return Err(AuthError::NotAuthenticated);
        }

        let json = fs::read_to_string(&self.token_path)?;
        let token: OAuthToken = serde_json::from_str(&json)?;
        Ok(token)
    }
}

// ============================================================================
// TESTS
// ============================================================================
