use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{Car, Customer, NewCar, NewCustomer, NewUser, User, UserCredentials};

/// Persistence seam used by every handler.
///
/// Updates and deletes against an id that does not exist return
/// [`DatabaseError::NotFound`]; single reads return `Ok(None)` instead.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    async fn ping(&self) -> Result<(), DatabaseError>;

    // Cars

    async fn insert_car(&self, car: &NewCar) -> Result<i32, DatabaseError>;

    /// All cars ordered by brand
    async fn list_cars(&self) -> Result<Vec<Car>, DatabaseError>;

    async fn find_car(&self, id: i32) -> Result<Option<Car>, DatabaseError>;

    async fn update_car(&self, id: i32, car: &NewCar) -> Result<(), DatabaseError>;

    async fn delete_car(&self, id: i32) -> Result<(), DatabaseError>;

    // Customers

    async fn insert_customer(&self, customer: &NewCustomer) -> Result<i32, DatabaseError>;

    /// All customers ordered by name
    async fn list_customers(&self) -> Result<Vec<Customer>, DatabaseError>;

    async fn find_customer(&self, id: i32) -> Result<Option<Customer>, DatabaseError>;

    async fn update_customer(&self, id: i32, customer: &NewCustomer) -> Result<(), DatabaseError>;

    async fn delete_customer(&self, id: i32) -> Result<(), DatabaseError>;

    // Users

    async fn insert_user(&self, user: &NewUser, password_hash: &str) -> Result<i32, DatabaseError>;

    /// All users ordered by full name, without password hashes
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;

    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError>;

    /// `password_hash` of `None` keeps the stored password
    async fn update_user(
        &self,
        id: i32,
        user: &NewUser,
        password_hash: Option<&str>,
    ) -> Result<(), DatabaseError>;

    async fn delete_user(&self, id: i32) -> Result<(), DatabaseError>;

    /// First user whose username equals `username` or whose email equals `email`
    async fn find_credentials(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserCredentials>, DatabaseError>;
}
