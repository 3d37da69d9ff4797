//! API routes configuration
//!
//! This module configures all HTTP routes for the Projeta API.

use crate::handlers;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// Configure API routes for Projeta
///
/// All endpoints use the /v1/api prefix. Login, register, and healthcheck
/// are public; everything else requires a Bearer session.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1").service(
            web::scope("/api")
                .route("/healthcheck", web::get().to(healthcheck_handler))
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(handlers::auth::login_handler))
                        .route("/register", web::post().to(handlers::auth::register_handler))
                        .route("/me", web::get().to(handlers::auth::me_handler)),
                )
                .service(
                    web::scope("/users")
                        .route("", web::get().to(handlers::users::list_users_handler))
                        .route("", web::post().to(handlers::users::create_user_handler))
                        .route("/{id}", web::get().to(handlers::users::get_user_handler))
                        .route("/{id}", web::patch().to(handlers::users::update_user_handler))
                        .route(
                            "/{id}",
                            web::delete().to(handlers::users::delete_user_handler),
                        ),
                )
                .service(
                    web::scope("/projects")
                        .route("", web::get().to(handlers::projects::list_projects_handler))
                        .route(
                            "",
                            web::post().to(handlers::projects::create_project_handler),
                        )
                        .route(
                            "/{id}",
                            web::get().to(handlers::projects::get_project_handler),
                        )
                        .route(
                            "/{id}",
                            web::patch().to(handlers::projects::update_project_handler),
                        )
                        .route(
                            "/{id}",
                            web::delete().to(handlers::projects::delete_project_handler),
                        )
                        .route(
                            "/{id}/members",
                            web::get().to(handlers::members::list_members_handler),
                        )
                        .route(
                            "/{id}/members",
                            web::post().to(handlers::members::add_member_handler),
                        )
                        .route(
                            "/{id}/members/{userId}",
                            web::patch().to(handlers::members::update_member_role_handler),
                        )
                        .route(
                            "/{id}/members/{userId}",
                            web::delete().to(handlers::members::remove_member_handler),
                        ),
                )
                .service(
                    web::scope("/tasks")
                        .route("", web::get().to(handlers::tasks::list_tasks_handler))
                        .route("", web::post().to(handlers::tasks::create_task_handler))
                        .route("/{id}", web::get().to(handlers::tasks::get_task_handler))
                        .route("/{id}", web::patch().to(handlers::tasks::update_task_handler))
                        .route(
                            "/{id}",
                            web::delete().to(handlers::tasks::delete_task_handler),
                        ),
                ),
        ),
    );
}

/// Health check endpoint handler
async fn healthcheck_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn test_healthcheck_is_public() {
        let app = test::init_service(App::new().configure(configure_routes)).await;

        let req = test::TestRequest::get()
            .uri("/v1/api/healthcheck")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["api_version"], "v1");
    }
}
