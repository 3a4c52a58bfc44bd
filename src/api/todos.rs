use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use crate::dto::{ApiResponse, Empty};
use crate::errors::TodoError;
use crate::models::input::TodoInput;
use crate::service::TodoService;

#[get("/todos")]
pub async fn get_todos(service: web::Data<TodoService>) -> Result<HttpResponse, TodoError> {
    let todos = service.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(&todos)))
}

#[post("/todos")]
pub async fn create_todo(service: web::Data<TodoService>, new_todo: web::Json<TodoInput>) -> Result<HttpResponse, TodoError> {
    let todo = service.create(new_todo.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::todo(Some("Todo created successfully".to_string()), &todo)))
}

#[get("/todos/filter/{status}")]
pub async fn get_todos_by_status(service: web::Data<TodoService>, status: web::Path<String>) -> Result<HttpResponse, TodoError> {
    let todos = service.filter_by_status(&status).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::list(&todos)))
}

#[get("/todos/{id}")]
pub async fn get_todo_by_id(service: web::Data<TodoService>, id: web::Path<String>) -> Result<HttpResponse, TodoError> {
    let todo = service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::todo(None, &todo)))
}

#[put("/todos/{id}")]
pub async fn update_todo_by_id(service: web::Data<TodoService>, id: web::Path<String>, updated_todo: web::Json<TodoInput>) -> Result<HttpResponse, TodoError> {
    let todo = service.update(&id, updated_todo.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::todo(Some("Todo updated successfully".to_string()), &todo)))
}

#[delete("/todos/{id}")]
pub async fn delete_todo_by_id(service: web::Data<TodoService>, id: web::Path<String>) -> Result<HttpResponse, TodoError> {
    service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message("Todo deleted successfully", Empty {})))
}

#[patch("/todos/{id}/toggle")]
pub async fn toggle_todo_by_id(service: web::Data<TodoService>, id: web::Path<String>) -> Result<HttpResponse, TodoError> {
    let todo = service.toggle(&id).await?;
    let state = if todo.completed { "completed" } else { "incomplete" };
    Ok(HttpResponse::Ok().json(ApiResponse::todo(Some(format!("Todo marked as {}", state)), &todo)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(get_todos)
            .service(create_todo)
            .service(get_todos_by_status)
            .service(get_todo_by_id)
            .service(update_todo_by_id)
            .service(delete_todo_by_id)
            .service(toggle_todo_by_id),
    );
}
