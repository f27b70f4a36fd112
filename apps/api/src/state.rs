use camgate_application::{ClientConfigService, LoginService, RoleService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub role_service: RoleService,
    pub client_config_service: ClientConfigService,
    pub login_service: LoginService,
    pub admin_token: String,
    pub trust_forwarded_for: bool,
}
