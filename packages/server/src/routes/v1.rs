use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/hackathons", hackathon_routes())
        .nest("/registeredhackathon", registration_routes(config))
        .nest("/proposals", proposal_routes())
        .nest("/admin", admin_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register_student))
        .routes(routes!(handlers::auth::register_organizer))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::admin_login))
        .routes(routes!(handlers::auth::me))
}

fn hackathon_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::hackathon::list_hackathons,
            handlers::hackathon::create_hackathon
        ))
        .routes(routes!(handlers::hackathon::get_hackathon))
        .routes(routes!(handlers::hackathon::hackathon_report))
        .routes(routes!(handlers::hackathon::list_organizer_hackathons))
}

fn registration_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::registration::register))
        .layer(handlers::registration::register_body_limit(
            config.storage.max_upload_size,
        ));

    OpenApiRouter::new()
        .routes(routes!(handlers::registration::list_by_hackathon))
        .routes(routes!(handlers::registration::list_by_student))
        .routes(routes!(handlers::registration::check_registration))
        .merge(upload)
}

fn proposal_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::proposal::list_proposals))
        .routes(routes!(handlers::proposal::approve_proposal))
        .routes(routes!(handlers::proposal::reject_proposal))
}

fn admin_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::admin::user_counts))
        .routes(routes!(handlers::admin::event_counts))
        .routes(routes!(handlers::admin::list_hackathons))
        .routes(routes!(handlers::admin::list_students))
        .routes(routes!(handlers::admin::list_organizers))
}
