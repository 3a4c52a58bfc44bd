use actix_web::{get, web, HttpResponse, Responder, Result};
use serde::Serialize;
use serde_json::json;

use crate::errors::{ErrorResponse, TodoError};

pub mod todos;

#[derive(Serialize)]
pub struct Response {
    pub message: String,
}

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Welcome to Todo API",
        "endpoints": {
            "getAllTodos": "GET /api/todos",
            "getTodoById": "GET /api/todos/:id",
            "createTodo": "POST /api/todos",
            "updateTodo": "PUT /api/todos/:id",
            "deleteTodo": "DELETE /api/todos/:id",
            "toggleComplete": "PATCH /api/todos/:id/toggle",
            "filterByStatus": "GET /api/todos/filter/:status"
        }
    }))
}

#[get("/health")]
pub async fn healthcheck() -> impl Responder {
    let response = Response {
        message: "Everything is working fine".to_string(),
    };
    HttpResponse::Ok().json(response)
}

pub async fn not_found() -> Result<HttpResponse> {
    Ok(HttpResponse::NotFound().json(ErrorResponse::new("Resource not found")))
}

/// Rejects unreadable JSON bodies with the same envelope as validation failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| TodoError::InvalidBody(err.to_string()).into())
}

/// Everything except the default service, which has to be set on the `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(index)
        .service(healthcheck)
        .configure(todos::config);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use actix_web::App;
    use serde_json::Value;

    #[actix_web::test]
    async fn test_index() {
        let app = test::init_service(App::new().service(index)).await;
        let req = TestRequest::default().to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(StatusCode::OK, resp.status());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["endpoints"].as_object().unwrap().len(), 7);
    }

    #[actix_web::test]
    async fn test_healthcheck() {
        let app = test::init_service(App::new().service(healthcheck)).await;
        let req = TestRequest::default().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(StatusCode::OK, resp.status());
    }

    #[actix_web::test]
    async fn test_unknown_route() {
        let app = test::init_service(
            App::new()
                .service(healthcheck)
                .default_service(web::route().to(not_found)),
        )
        .await;
        let req = TestRequest::default().uri("/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(StatusCode::NOT_FOUND, resp.status());
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Resource not found");
    }
}
