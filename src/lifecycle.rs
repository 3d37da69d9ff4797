//! Server lifecycle management helpers.
//!
//! This module encapsulates the heavy lifting previously handled directly
//! in `main.rs`: bootstrapping storage and the application context, wiring
//! the HTTP server, and coordinating graceful shutdown.

use crate::config::{ServerConfig, DEV_JWT_SECRET};
use crate::middleware;
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use log::{debug, info, warn};
use projeta_commons::models::{
    CallerContext, GlobalRole, MemberRole, Project, ProjectStatus, Task, TaskPriority, TaskStatus,
    User,
};
use projeta_core::app_context::AppContext;
use projeta_store::{RocksDBBackend, RocksDbInit, StorageBackend};
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

const ADMIN_NAME: &str = "Admin User";
const ADMIN_EMAIL: &str = "admin@projeta.com";
const DEFAULT_ADMIN_PASSWORD: &str = "password123";

/// Initialize RocksDB, the application context, and the initial admin user.
pub async fn bootstrap(config: &ServerConfig) -> Result<Arc<AppContext>> {
    // Initialize RocksDB
    let phase_start = std::time::Instant::now();
    let db_path = &config.storage.rocksdb_path;
    std::fs::create_dir_all(db_path)?;

    let db_init = RocksDbInit::new(db_path.as_str(), config.storage.rocksdb.clone());
    let db = db_init.open()?;
    info!(
        "RocksDB initialized at {} ({:.2}ms)",
        db_path,
        phase_start.elapsed().as_secs_f64() * 1000.0
    );

    let backend: Arc<dyn StorageBackend> = Arc::new(RocksDBBackend::new(db));

    // Wire providers, lock registry, and the membership engine
    let phase_start = std::time::Instant::now();
    if config.auth.jwt_secret == DEV_JWT_SECRET {
        warn!("auth.jwt_secret is the built-in development value");
        warn!("Set PROJETA_JWT_SECRET (or auth.jwt_secret in config.toml) before exposing this server");
    }

    let auth = projeta_core::AuthSettings {
        jwt_secret: config.auth.jwt_secret.clone(),
        trusted_issuers: config.auth.trusted_issuers.clone(),
        token_ttl_minutes: config.auth.token_ttl_minutes,
    };
    let app_context = Arc::new(AppContext::new(
        backend,
        auth,
        Duration::from_millis(config.storage.lock_wait_millis),
        config.server.worker_id,
    ));
    debug!(
        "AppContext initialized with providers, lock registry, and membership engine ({:.2}ms)",
        phase_start.elapsed().as_secs_f64() * 1000.0
    );

    // First-start data
    let phase_start = std::time::Instant::now();
    let admin = ensure_admin_user(&app_context).await?;
    if config.seed.demo {
        seed_demo_data(&app_context, &admin).await?;
    }
    debug!(
        "User initialization completed ({:.2}ms)",
        phase_start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(app_context)
}

/// Start the HTTP server and manage graceful shutdown.
pub async fn run(
    config: &ServerConfig,
    app_context: Arc<AppContext>,
    main_start: std::time::Instant,
) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server on {}", bind_addr);

    let workers = if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    };
    info!(
        "Server config: workers={}, token_ttl={}min, lock_wait={}ms",
        workers, config.auth.token_ttl_minutes, config.storage.lock_wait_millis
    );

    let cors_config = config.cors.clone();
    let ctx_for_handlers = app_context.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::build_cors_from_config(&cors_config))
            .app_data(web::Data::new(ctx_for_handlers.clone()))
            .configure(projeta_api::configure_routes)
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run();

    info!(
        "Server started in {:.2}ms",
        main_start.elapsed().as_secs_f64() * 1000.0
    );

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            if let Err(e) = result {
                log::error!("Server task failed: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown...");

            // Stop accepting new HTTP connections and wait for in-flight requests
            server_handle.stop(true).await;

            drop(app_context);
            debug!("Graceful shutdown complete");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// A running HTTP server instance intended for integration tests.
///
/// This starts the same Actix app wiring as the production server (middleware
/// stack, route registration, app_data wiring) but binds to an ephemeral port
/// and provides an explicit shutdown handle.
pub struct RunningTestServer {
    pub base_url: String,
    pub bind_addr: SocketAddr,
    pub app_context: Arc<AppContext>,
    server_handle: actix_web::dev::ServerHandle,
    server_task: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl RunningTestServer {
    pub async fn shutdown(self) {
        self.server_handle.stop(false).await;
        let _ = self.server_task.await;
    }
}

/// Start the HTTP server for integration tests on a random available port.
///
/// Notes:
/// - Does not install Ctrl+C handling.
/// - Caller must invoke `shutdown()` to stop the server.
pub async fn run_for_tests(
    config: &ServerConfig,
    app_context: Arc<AppContext>,
) -> Result<RunningTestServer> {
    let bind_ip = if config.server.host.is_empty() {
        "127.0.0.1"
    } else {
        config.server.host.as_str()
    };

    let listener = TcpListener::bind((bind_ip, 0))?;
    let bind_addr = listener.local_addr()?;

    let workers = if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    };

    let cors_config = config.cors.clone();
    let ctx_for_handlers = app_context.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::build_cors_from_config(&cors_config))
            .app_data(web::Data::new(ctx_for_handlers.clone()))
            .configure(projeta_api::configure_routes)
    })
    .listen(listener)?
    .workers(workers)
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);
    let base_url = format!("http://{}", bind_addr);

    Ok(RunningTestServer {
        base_url,
        bind_addr,
        app_context,
        server_handle,
        server_task,
    })
}

/// Create the initial admin account on first startup.
///
/// The password comes from PROJETA_ADMIN_PASSWORD; without it a development
/// default is used and logged loudly. Subsequent startups find the existing
/// account and return it untouched.
async fn ensure_admin_user(ctx: &AppContext) -> Result<User> {
    if let Some(existing) = ctx.users().get_user_by_email(ADMIN_EMAIL)? {
        debug!("Admin user '{}' already exists, skipping initialization", ADMIN_EMAIL);
        return Ok(existing);
    }

    let (password, from_env) = match std::env::var("PROJETA_ADMIN_PASSWORD") {
        Ok(p) if !p.is_empty() => (p, true),
        _ => (DEFAULT_ADMIN_PASSWORD.to_string(), false),
    };

    let password_hash = projeta_auth::password::hash_password(&password, None)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;

    let now = chrono::Utc::now().timestamp_millis();
    let admin = User {
        id: ctx.next_user_id()?,
        name: ADMIN_NAME.to_string(),
        email: ADMIN_EMAIL.to_string(),
        password_hash,
        role: GlobalRole::Admin,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    ctx.users().create_user(admin.clone())?;

    if from_env {
        info!("Created admin user '{}' (password from PROJETA_ADMIN_PASSWORD)", ADMIN_EMAIL);
    } else {
        warn!(
            "Created admin user '{}' with the DEFAULT password '{}'",
            ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD
        );
        warn!("Set PROJETA_ADMIN_PASSWORD before first startup, or change the password now");
    }

    Ok(admin)
}

/// Seed a demo manager, project, membership, and tasks for development.
///
/// Runs only while the projects partition is empty, so restarting an already
/// seeded server changes nothing. The maintainer membership goes through the
/// engine under the admin's identity, the same path the HTTP API uses.
async fn seed_demo_data(ctx: &AppContext, admin: &User) -> Result<()> {
    if !ctx.projects().list_projects(None, None)?.is_empty() {
        debug!("Projects already present, skipping demo seed");
        return Ok(());
    }

    let now = chrono::Utc::now().timestamp_millis();

    let manager = match ctx.users().get_user_by_email("manager@projeta.com")? {
        Some(existing) => existing,
        None => {
            let password_hash =
                projeta_auth::password::hash_password(DEFAULT_ADMIN_PASSWORD, None)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to hash demo password: {}", e))?;
            let manager = User {
                id: ctx.next_user_id()?,
                name: "Manager User".to_string(),
                email: "manager@projeta.com".to_string(),
                password_hash,
                role: GlobalRole::Manager,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            ctx.users().create_user(manager.clone())?;
            manager
        }
    };

    let project = Project {
        id: ctx.next_project_id()?,
        name: "Projeto Alpha".to_string(),
        description: "Descrição do Projeto Alpha.".to_string(),
        status: ProjectStatus::Active,
        manager_id: manager.id,
        start_date: None,
        end_date: None,
        created_at: now,
        updated_at: now,
    };
    ctx.projects().create_project(project.clone())?;

    let caller = CallerContext::authenticated(admin.id, admin.role);
    ctx.membership()
        .add_member(&caller, project.id, manager.id, MemberRole::Maintainer)?;

    let demo_tasks = [
        (
            "Análise de Requisitos",
            "Levantar todos os requisitos com o cliente.",
            TaskStatus::Done,
            TaskPriority::High,
        ),
        (
            "Desenvolvimento do Módulo de Auth",
            "Criar toda a estrutura de autenticação.",
            TaskStatus::InProgress,
            TaskPriority::High,
        ),
        (
            "Testes Unitários",
            "Escrever testes para os serviços.",
            TaskStatus::Todo,
            TaskPriority::Medium,
        ),
    ];
    for (title, description, status, priority) in demo_tasks {
        let task = Task {
            id: ctx.next_task_id()?,
            title: title.to_string(),
            description: Some(description.to_string()),
            status,
            priority,
            due_date: None,
            project_id: project.id,
            assignee_id: manager.id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        ctx.tasks().create_task(task)?;
    }

    info!(
        "Demo data seeded: project '{}' with manager '{}' and {} tasks",
        project.name,
        manager.email,
        demo_tasks.len()
    );

    Ok(())
}
