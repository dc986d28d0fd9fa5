//! HTTP handlers and route configuration.

mod accounts;
mod auth;
mod health;
mod location;
mod posts;
mod profile;
mod profile_edit;
mod uploads;


use actix_web::web;

use crate::middleware::error::extractor_error;

/// Configure all application routes.
///
/// The unmatched-route fallback is installed on the `App` itself with
/// `default_service(web::to(route_not_found))`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| extractor_error(err, req)))
        .app_data(web::QueryConfig::default().error_handler(|err, req| extractor_error(err, req)))
        .app_data(web::PathConfig::default().error_handler(|err, req| extractor_error(err, req)))
        // Duplicate checks, reachable with and without the /api prefix
        .configure(duplicate_checks)
        .service(
            web::scope("/api")
                .configure(duplicate_checks)
                .route("/health", web::get().to(health::health_check))
                .route("/location", web::get().to(location::current_location))
                // Accounts
                .route("/users/register", web::post().to(accounts::register_user))
                .route("/author/create", web::post().to(accounts::create_author))
                .route("/users/login", web::post().to(auth::login_user))
                .route("/authors/login", web::post().to(auth::login_author))
                .route("/author/login", web::post().to(auth::login_author))
                // Profiles
                .route("/user/profile/current", web::get().to(profile::profile_by_query))
                .route("/users/profile/current", web::get().to(profile::current_profile))
                .route(
                    "/users/profile/upload",
                    web::post().to(uploads::upload_profile_image),
                )
                .route(
                    "/users/profile/{user_id}/nickname",
                    web::put().to(profile_edit::change_nickname),
                )
                .route(
                    "/users/profile/{user_id}/id",
                    web::put().to(profile_edit::change_user_id),
                )
                .route(
                    "/users/profile/{user_id}/phone",
                    web::put().to(profile_edit::change_phone),
                )
                .route(
                    "/users/profile/{user_id}/password",
                    web::put().to(profile_edit::change_password),
                )
                .route(
                    "/user/change-password",
                    web::post().to(profile_edit::change_password_by_body),
                )
                .route(
                    "/user/profile/delete-image",
                    web::post().to(profile_edit::delete_profile_image),
                )
                // Board
                .service(
                    web::resource("/posts")
                        .route(web::get().to(posts::list_posts))
                        .route(web::post().to(posts::create_post)),
                )
                .route("/posts/search", web::get().to(posts::search_posts))
                .route("/posts/{id}", web::get().to(posts::get_post))
                .route("/upload", web::post().to(uploads::upload_file)),
        );
}

fn duplicate_checks(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/check-duplicate", web::post().to(accounts::check_user_id))
        .route("/users/check-name-duplicate", web::post().to(accounts::check_user_name))
        .route("/authors/check-duplicate", web::post().to(accounts::check_author_id))
        .route("/authors/check-name-duplicate", web::post().to(accounts::check_author_name));
}
