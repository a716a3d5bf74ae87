use std::sync::Arc;

use service::{auth::AuthService, records::FormService};

#[derive(Clone)]
pub struct ServerState {
    pub forms: Arc<FormService>,
    pub auth: Arc<AuthService>,
    /// Whether `POST /api/formulario` requires a bearer token.
    pub auth_required: bool,
}
