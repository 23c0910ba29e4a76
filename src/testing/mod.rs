//! In-memory store and router harness for handler tests

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

use crate::auth::hash_password;
use crate::config::AppConfig;
use crate::database::models::{
    Car, Customer, NewCar, NewCustomer, NewUser, User, UserCredentials,
};
use crate::database::{DatabaseError, RecordStore};
use crate::state::AppState;

#[derive(Default)]
struct Tables {
    last_id: i32,
    cars: BTreeMap<i32, Car>,
    customers: BTreeMap<i32, Customer>,
    users: BTreeMap<i32, UserCredentials>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// [`RecordStore`] kept in memory. `set_available(false)` makes every ping fail.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryStore {
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub async fn car_count(&self) -> usize {
        self.tables.read().await.cars.len()
    }

    pub async fn password_hash(&self, id: i32) -> Option<String> {
        self.tables
            .read()
            .await
            .users
            .get(&id)
            .map(|row| row.password.clone())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
        }
    }

    async fn insert_car(&self, car: &NewCar) -> Result<i32, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.cars.insert(id, car.clone().with_id(id));
        Ok(id)
    }

    async fn list_cars(&self) -> Result<Vec<Car>, DatabaseError> {
        let mut cars: Vec<Car> = self.tables.read().await.cars.values().cloned().collect();
        cars.sort_by(|a, b| a.brand.cmp(&b.brand).then(a.id.cmp(&b.id)));
        Ok(cars)
    }

    async fn find_car(&self, id: i32) -> Result<Option<Car>, DatabaseError> {
        Ok(self.tables.read().await.cars.get(&id).cloned())
    }

    async fn update_car(&self, id: i32, car: &NewCar) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.cars.get_mut(&id) {
            Some(row) => {
                *row = car.clone().with_id(id);
                Ok(())
            }
            None => Err(DatabaseError::not_found("car", id)),
        }
    }

    async fn delete_car(&self, id: i32) -> Result<(), DatabaseError> {
        match self.tables.write().await.cars.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DatabaseError::not_found("car", id)),
        }
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> Result<i32, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.customers.insert(id, customer.clone().with_id(id));
        Ok(id)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, DatabaseError> {
        let mut customers: Vec<Customer> =
            self.tables.read().await.customers.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(customers)
    }

    async fn find_customer(&self, id: i32) -> Result<Option<Customer>, DatabaseError> {
        Ok(self.tables.read().await.customers.get(&id).cloned())
    }

    async fn update_customer(&self, id: i32, customer: &NewCustomer) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.customers.get_mut(&id) {
            Some(row) => {
                *row = customer.clone().with_id(id);
                Ok(())
            }
            None => Err(DatabaseError::not_found("customer", id)),
        }
    }

    async fn delete_customer(&self, id: i32) -> Result<(), DatabaseError> {
        match self.tables.write().await.customers.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DatabaseError::not_found("customer", id)),
        }
    }

    async fn insert_user(&self, user: &NewUser, password_hash: &str) -> Result<i32, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.users.insert(
            id,
            UserCredentials {
                user: user.clone().with_id(id),
                password: password_hash.to_string(),
            },
        );
        Ok(id)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let mut users: Vec<User> = self
            .tables
            .read()
            .await
            .users
            .values()
            .map(|row| row.user.clone())
            .collect();
        users.sort_by(|a, b| a.fullname.cmp(&b.fullname).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(&id).map(|row| row.user.clone()))
    }

    async fn update_user(
        &self,
        id: i32,
        user: &NewUser,
        password_hash: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        let Some(row) = tables.users.get_mut(&id) else {
            return Err(DatabaseError::not_found("user", id));
        };

        row.user = user.clone().with_id(id);
        if let Some(hash) = password_hash {
            row.password = hash.to_string();
        }
        Ok(())
    }

    async fn delete_user(&self, id: i32) -> Result<(), DatabaseError> {
        match self.tables.write().await.users.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DatabaseError::not_found("user", id)),
        }
    }

    async fn find_credentials(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserCredentials>, DatabaseError> {
        let tables = self.tables.read().await;
        let found = tables.users.values().find(|row| {
            username == Some(row.user.username.as_str()) || email == Some(row.user.email.as_str())
        });
        Ok(found.cloned())
    }
}

/// Application router over a [`MemoryStore`], with cheap bcrypt
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        config.security.token_secret = "router-test-secret".to_string();
        config.security.bcrypt_cost = 4;
        config.api.enable_request_logging = false;

        let store = Arc::new(MemoryStore::default());
        let state = AppState::new(config, store.clone());
        let router = crate::app(state.clone());

        Self {
            state,
            store,
            router,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.state.config.security.auth_cookie_name
    }

    /// Inserts a user directly and returns it
    pub async fn seed_user(&self, username: &str, password: &str) -> User {
        let new_user = NewUser {
            fullname: format!("{} Tester", username),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            is_admin: false,
        };
        let hashed = hash_password(password.to_string(), 4).await.unwrap();
        let id = self.store.insert_user(&new_user, &hashed).await.unwrap();
        new_user.with_id(id)
    }

    /// Valid session token for a freshly seeded user
    pub async fn token(&self) -> String {
        let user = self.seed_user("session", "session-password").await;
        self.state.keys().issue(&user).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Request carrying `token` in the session cookie
    pub async fn send_with_cookie(
        &self,
        method: &str,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, format!("{}={}", self.cookie_name(), token));
        self.send(with_json(builder, body)).await
    }

    pub async fn send_anonymous(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        self.send(with_json(builder, body)).await
    }
}

fn with_json(builder: axum::http::request::Builder, body: Option<Value>) -> Request<Body> {
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}
