use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use ideabay::attachments::AttachmentResolver;
use ideabay::auth::rate_limit::RateLimiter;
use ideabay::config::AppConfig;
use ideabay::content_filter::ContentFilter;
use ideabay::{auth, db, handlers, sweep};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env();

    // File-backed SQLite lives under data/ by default
    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let pool = db::init_pool(&config.database_url).await;
    db::run_migrations(&pool).await;

    let admin_hash = auth::password::hash_password(&config.admin_password)
        .expect("Failed to hash admin password");
    db::seed_admin(&pool, &admin_hash).await;

    // Session encryption key; configure one so sessions survive restarts
    let secret_key = match &config.session_key {
        Some(val) => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        None => {
            log::warn!("No usable SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let limiter = web::Data::new(RateLimiter::new());
    let filter = web::Data::new(ContentFilter::from_config(
        config.content_filter_words.as_deref(),
    ));
    let resolver = web::Data::new(AttachmentResolver::from_config(
        config.attachment_base_url.as_deref(),
    ));

    if let Some(every) = config.sweep_interval {
        log::info!("Deadline sweep scheduled every {}s", every.as_secs());
        sweep::spawn_sweep_scheduler(pool.clone(), every);
    }

    log::info!("Starting server at http://{}", config.bind_addr);
    let bind_addr = config.bind_addr.clone();

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(limiter.clone())
            .app_data(filter.clone())
            .app_data(resolver.clone())
            .service(
                web::scope("/api/v1")
                    .wrap(actix_web::middleware::from_fn(
                        auth::middleware::require_json_content_type,
                    ))
                    // Public: accounts and sessions
                    .route("/auth/register", web::post().to(handlers::auth_handlers::register))
                    .route("/auth/login", web::post().to(handlers::auth_handlers::login))
                    .route("/auth/logout", web::post().to(handlers::auth_handlers::logout))
                    .route("/auth/me", web::get().to(handlers::auth_handlers::me))
                    // Public: catalogue and reads. /ideas/mine BEFORE /ideas/{id}
                    .route("/ideas", web::get().to(handlers::idea_handlers::list))
                    .route("/ideas/mine", web::get().to(handlers::idea_handlers::list_mine))
                    .route("/ideas/{id}", web::get().to(handlers::idea_handlers::read))
                    .route("/ideas/{id}/comments", web::get().to(handlers::comment_handlers::list))
                    .route("/pricing/options", web::get().to(handlers::idea_handlers::pricing_options))
                    // Public: maintenance sweep
                    .route("/overdue/update", web::post().to(handlers::sweep_handlers::update_overdue))
                    // Authenticated: idea lifecycle
                    .route("/ideas", web::post().to(handlers::idea_handlers::create))
                    .route("/ideas/{id}", web::patch().to(handlers::idea_handlers::update))
                    .route("/ideas/{id}", web::delete().to(handlers::idea_handlers::delete))
                    .route("/ideas/{id}/finalize", web::post().to(handlers::idea_handlers::finalize))
                    .route("/ideas/{id}/comments", web::post().to(handlers::comment_handlers::create))
                    // Admin; authn at the scope, role check in the handlers
                    .service(
                        web::scope("/admin")
                            .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                            .route("/ideas/{id}", web::patch().to(handlers::admin_handlers::update_idea))
                            .route(
                                "/ideas/{id}/exclusive-contract",
                                web::post().to(handlers::admin_handlers::grant_exclusive),
                            )
                            .route("/audit", web::get().to(handlers::admin_handlers::recent_audit)),
                    ),
            )
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(serde_json::json!({
                    "error": "not_found",
                    "message": "No such endpoint",
                }))
            }))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
