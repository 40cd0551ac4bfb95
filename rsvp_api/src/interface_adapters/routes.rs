use crate::interface_adapters::handlers::{
    admin_guests, admin_login, admin_logout, choose_meal, current_confirmation, leave_comment,
    lookup_guest, request_tickets, submit_confirmation,
};
use crate::interface_adapters::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/invitados/{token}", get(lookup_guest))
        .route("/api/invitados/{token}/boletos", post(request_tickets))
        .route("/api/invitados/{token}/comida", post(choose_meal))
        .route(
            "/api/invitados/{token}/confirmacion",
            get(current_confirmation).post(submit_confirmation),
        )
        .route("/api/comentarios", post(leave_comment))
        .route("/api/admin/login", post(admin_login))
        .route("/api/admin/logout", post(admin_logout))
        .route("/api/admin/invitados", get(admin_guests))
        .with_state(state)
}
