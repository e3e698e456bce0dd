//! HTTP handlers and route configuration.

mod convert;
mod health;
mod posts;
mod views;
mod workflow;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/approvals", web::get().to(views::approval_queue))
            .route("/calendar/{year}/{month}", web::get().to(views::calendar))
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    // Before /{id}, which would swallow it.
                    .route("/counts", web::get().to(posts::counts))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::patch().to(posts::update))
                    .route("/{id}/comments", web::post().to(posts::add_comment))
                    // Approval workflow
                    .route("/{id}/submit", web::post().to(workflow::submit))
                    .route("/{id}/approve", web::post().to(workflow::approve))
                    .route("/{id}/reject", web::post().to(workflow::reject))
                    .route("/{id}/schedule", web::post().to(workflow::schedule))
                    .route("/{id}/publish", web::post().to(workflow::publish))
                    // Publisher callbacks
                    .route("/{id}/published", web::post().to(workflow::mark_published))
                    .route(
                        "/{id}/publish-failed",
                        web::post().to(workflow::mark_publish_failed),
                    ),
            ),
    );
}
