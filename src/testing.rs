//! In-memory stores and request helpers for router-level tests.

use std::sync::Mutex;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use time::OffsetDateTime;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    app::build_app,
    auth::{repo::UserStore, repo_types::User},
    db::StoreError,
    state::AppState,
    students::{dto::NewStudent, repo::StudentStore, repo_types::Student},
    todos::{repo::TodoStore, repo_types::Todo},
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::Conflict);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryTodoStore {
    todos: Mutex<Vec<Todo>>,
    next_id: Mutex<i64>,
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn create(&self, owner: Uuid, title: &str, completed: bool) -> Result<Todo, StoreError> {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let now = OffsetDateTime::now_utc();
        let todo = Todo {
            id,
            title: title.to_string(),
            completed,
            created_at: now,
            updated_at: now,
            user_id: owner,
        };
        self.todos.lock().unwrap().push(todo.clone());
        Ok(todo)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Todo>, StoreError> {
        let mut owned: Vec<Todo> = self
            .todos
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(owned)
    }

    async fn get(&self, id: i64, owner: Uuid) -> Result<Todo, StoreError> {
        self.todos
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id && t.user_id == owner)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(
        &self,
        id: i64,
        owner: Uuid,
        title: &str,
        completed: bool,
    ) -> Result<Todo, StoreError> {
        let mut todos = self.todos.lock().unwrap();
        let todo = todos
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner)
            .ok_or(StoreError::NotFound)?;
        todo.title = title.to_string();
        todo.completed = completed;
        todo.updated_at = OffsetDateTime::now_utc();
        Ok(todo.clone())
    }

    async fn delete(&self, id: i64, owner: Uuid) -> Result<(), StoreError> {
        let mut todos = self.todos.lock().unwrap();
        let before = todos.len();
        todos.retain(|t| !(t.id == id && t.user_id == owner));
        if todos.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStudentStore {
    students: Mutex<Vec<Student>>,
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn create(&self, student: &NewStudent) -> Result<i64, StoreError> {
        let mut students = self.students.lock().unwrap();
        let id = students.len() as i64 + 1;
        students.push(Student {
            id,
            name: student.name.clone(),
            email: student.email.clone(),
            age: student.age,
            created_at: OffsetDateTime::now_utc(),
        });
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Student, StoreError> {
        self.students
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.students.lock().unwrap().clone())
    }
}

pub fn test_app() -> Router {
    build_app(AppState::fake())
}

/// Sends one request and returns the status with the body parsed as JSON
/// (a JSON string for non-JSON bodies, `Null` for empty ones).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let auth = token.map(|t| format!("Bearer {t}"));
    send_with_auth_header(app, method, uri, auth.as_deref(), body).await
}

pub async fn send_with_auth_header(
    app: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

/// Registers a user and logs in, returning the user id and bearer token.
pub async fn register_and_login(app: &Router, email: &str, password: &str) -> (Uuid, String) {
    let creds = json!({ "email": email, "password": password });

    let (status, user) = send(app, Method::POST, "/auth/register", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {user}");

    let (status, login) = send(app, Method::POST, "/auth/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK, "login failed: {login}");

    let id = Uuid::parse_str(user["id"].as_str().unwrap()).unwrap();
    let token = login["token"].as_str().unwrap().to_string();
    (id, token)
}
