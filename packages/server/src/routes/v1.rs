use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes(config))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn user_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::users::list_users))
        .routes(routes!(
            handlers::users::get_user,
            handlers::users::update_user
        ))
        .routes(routes!(handlers::users::like_user))
        .nest("/{id}/photos", photo_routes(config))
}

fn photo_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let manage = OpenApiRouter::new()
        .routes(routes!(handlers::photos::get_main_photo))
        .routes(routes!(
            handlers::photos::get_photo,
            handlers::photos::delete_photo
        ))
        .routes(routes!(handlers::photos::set_main_photo));

    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::photos::add_photo))
        .layer(handlers::photos::photo_upload_body_limit(
            config.storage.max_upload_size,
        ));

    manage.merge(upload)
}
