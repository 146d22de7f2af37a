use crate::core::api::ApiClient;
use crate::core::routing::{guard, landing_route, Access, Route};
use crate::core::services::{AuthService, UserService};
use crate::domain::dto::LoginRequest;
use crate::domain::model::{Role, UserProfile};
use crate::domain::ports::KeyValueStore;
use crate::utils::error::{Result, RoadReadyError};
use crate::utils::validation::require_filled;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Result of a successful sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub token: String,
    pub profile: Option<UserProfile>,
    pub landing: Route,
}

/// Signed-in state: the bearer token and the cached `Users/me` profile.
///
/// `persistent` plays the part of localStorage (kept between runs), `ephemeral`
/// that of sessionStorage. Tokens are looked up in that order.
pub struct AuthSession {
    api: ApiClient,
    auth: AuthService,
    users: UserService,
    persistent: Box<dyn KeyValueStore>,
    ephemeral: Box<dyn KeyValueStore>,
}

impl AuthSession {
    pub fn new(
        api: ApiClient,
        persistent: Box<dyn KeyValueStore>,
        ephemeral: Box<dyn KeyValueStore>,
    ) -> Self {
        let session = Self {
            auth: AuthService::new(api.clone()),
            users: UserService::new(api.clone()),
            api,
            persistent,
            ephemeral,
        };
        match session.token() {
            Ok(token) => session.api.set_token(token),
            Err(e) => tracing::warn!("⚠️ Could not read stored token: {}", e),
        }
        session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn login(&self, email: &str, password: &str, remember: bool) -> Result<LoginOutcome> {
        require_filled(&[email, password], "Email and password are required.")?;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        tracing::info!("🔐 Signing in {}", email);

        let data = self.auth.login(&request).await.map_err(|e| match e {
            RoadReadyError::ApiError { status: 404, .. } => RoadReadyError::ApiError {
                status: 404,
                message: "Login endpoint not found (404). Check baseUrl & route.".to_string(),
            },
            other => other,
        })?;

        let token = extract_token(&data)
            .ok_or_else(|| RoadReadyError::auth("Token missing in response"))?;

        let store = self.store_for(remember);
        store.set(TOKEN_KEY, &token)?;
        self.api.set_token(Some(token.clone()));

        // The profile is optional; a failed lookup still leaves the user signed in.
        let profile = match self.users.me().await {
            Ok(me) => {
                let profile = UserProfile::new(if me.is_null() {
                    Value::Object(Default::default())
                } else {
                    me
                });
                store.set(USER_KEY, &serde_json::to_string(&profile)?)?;
                Some(profile)
            }
            Err(e) => {
                tracing::warn!("⚠️ Profile load failed (continuing): {}", e);
                None
            }
        };

        let landing = landing_route(profile.as_ref());

        tracing::info!("✅ Signed in, landing on {}", landing);
        Ok(LoginOutcome {
            token,
            profile,
            landing,
        })
    }

    fn store_for(&self, remember: bool) -> &dyn KeyValueStore {
        if remember {
            self.persistent.as_ref()
        } else {
            self.ephemeral.as_ref()
        }
    }

    pub fn logout(&self) -> Result<()> {
        for store in [self.persistent.as_ref(), self.ephemeral.as_ref()] {
            store.remove(TOKEN_KEY)?;
            store.remove(USER_KEY)?;
        }
        self.api.set_token(None);
        tracing::info!("👋 Signed out");
        Ok(())
    }

    pub fn token(&self) -> Result<Option<String>> {
        if let Some(token) = self.persistent.get(TOKEN_KEY)?.filter(|t| !t.is_empty()) {
            return Ok(Some(token));
        }
        Ok(self.ephemeral.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    /// The cached profile. Unreadable JSON is treated as an empty profile.
    pub fn user(&self) -> Option<UserProfile> {
        let raw = [self.ephemeral.as_ref(), self.persistent.as_ref()]
            .into_iter()
            .find_map(|store| store.get(USER_KEY).ok().flatten())?;
        Some(serde_json::from_str(&raw).unwrap_or_default())
    }

    pub fn role(&self) -> Option<Role> {
        self.user().as_ref().and_then(UserProfile::role)
    }

    /// Profile id, or failing that the id claim inside the JWT.
    pub fn user_id(&self) -> Option<String> {
        if let Some(id) = self.user().as_ref().and_then(UserProfile::user_id) {
            return Some(id);
        }
        let token = self.token().ok().flatten()?;
        let claims = decode_jwt_payload(&token)?;
        ["uid", "nameid", "nameId", "sub"]
            .iter()
            .find_map(|k| match claims.get(*k) {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
    }

    pub fn greeting(&self, fallback: &str) -> String {
        let name = self
            .user()
            .and_then(|u| u.display_name())
            .unwrap_or_else(|| fallback.to_string());
        format!("Welcome, {}", name)
    }

    pub fn guard(&self, route: Route) -> Access {
        guard(route, self.is_authenticated(), self.role().as_ref())
    }

    /// Fails with an auth error unless the current user may open `route`.
    pub fn require(&self, route: Route) -> Result<()> {
        match self.guard(route) {
            Access::Allow => Ok(()),
            Access::Redirect(Route::Login) => Err(RoadReadyError::auth(format!(
                "Sign in to open {}",
                route
            ))),
            Access::Redirect(_) => Err(RoadReadyError::auth(format!(
                "Your role cannot open {}",
                route
            ))),
        }
    }
}

/// Token under any of the names the login endpoint has been seen to use.
pub fn extract_token(data: &Value) -> Option<String> {
    ["token", "Token", "accessToken", "jwt"]
        .iter()
        .find_map(|k| data.get(*k).and_then(Value::as_str))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Claims segment of a JWT, without any signature check.
pub fn decode_jwt_payload(token: &str) -> Option<Value> {
    let segment = token.split('.').nth(1)?;
    let normalized = segment
        .trim_end_matches('=')
        .replace('+', "-")
        .replace('/', "_");
    let bytes = URL_SAFE_NO_PAD.decode(normalized).ok()?;
    serde_json::from_slice(&bytes).ok()
}
