//! 预知请求演示
//!
//! ```text
//! # 只验证 name 字段
//! curl -i -X POST localhost:8080/users \
//!   -H 'Precognitive: true' -H 'Precognition-Validate-Only: name' \
//!   -d '{"name":"Al","email":"alice@example.com","age":30}'
//! ```

use anyhow::Context;
use axum::{http::StatusCode, Json};
use precognition_web::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use validator::Validate;

// ==================== 数据模型 ====================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
struct CreateUserRequest {
    #[validate(length(min = 3, message = "Name must contain at least 3 characters"))]
    name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    email: String,
    #[validate(range(min = 21, message = "Age must be at least 21"))]
    age: u32,
}

#[derive(Debug, Serialize)]
struct User {
    id: u32,
    name: String,
    email: String,
}

// ==================== 中间件 ====================

/// 手写校验，失败时抛出 FieldErrors
fn reserved_names(request: &Request) -> MiddlewareResult {
    let user: CreateUserRequest = request.json()?;
    let mut errors = FieldErrors::new();
    if user.name.eq_ignore_ascii_case("admin") {
        errors.add("name", "Name is reserved");
    }
    errors.into_result()?;
    Ok(())
}

fn validate_user(request: &Request) -> MiddlewareResult {
    let user: CreateUserRequest = request.json()?;
    user.validate()?;
    Ok(())
}

fn user_handler(config: &PrecognitionConfig) -> PrecognitiveHandler<(StatusCode, Json<User>)> {
    let before: Vec<Arc<dyn Middleware>> = vec![
        Arc::new(from_fn(validate_user).named("validate_user")),
        Arc::new(from_fn(reserved_names).named("reserved_names")),
    ];

    let main = main_fn(|request| {
        Box::pin(async move {
            let user: CreateUserRequest = request.json()?;
            tracing::info!(name = %user.name, "Creating user");
            Ok::<_, BoxError>((
                StatusCode::CREATED,
                Json(User {
                    id: 100,
                    name: user.name,
                    email: user.email,
                }),
            ))
        })
    });

    let after = from_fn(|_| {
        tracing::debug!("User created, audit recorded");
        Ok(())
    })
    .named("audit");

    PrecognitiveHandler::new(
        HandlerBundle::new(main).before(before).after(after),
        config.error_parsers(),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PrecognitionConfig::load("demos/web-demo/precognition.toml")
        .context("Failed to load precognition config")?;
    config.logging.init().context("Failed to initialize logging")?;

    tracing::info!(parsers = ?config.error_parsers, "Starting precognition demo");

    let app = Router::new()
        .route("/users", post(precognitive(user_handler(&config))))
        .layer(axum::middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind("0.0.0.0:8080")
        .await
        .context("Failed to bind 0.0.0.0:8080")?;
    tracing::info!("Listening on http://0.0.0.0:8080");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
