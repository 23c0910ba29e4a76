use async_trait::async_trait;
use sqlx::PgPool;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{Car, Customer, NewCar, NewCustomer, NewUser, User, UserCredentials};
use super::store::RecordStore;

const CAR_COLUMNS: &str =
    "id, brand, model, color, year_manufacture, imported, plates, selling_date, selling_price";

const CUSTOMER_COLUMNS: &str = "id, name, ident_document, birth_date, street_name, house_number, \
     complements, district, municipality, state, phone, email";

const USER_COLUMNS: &str = "id, fullname, username, email, is_admin";

/// [`RecordStore`] backed by Postgres through sqlx
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs a keyed DELETE and reports a missing row as not found
    async fn delete_by_id(&self, table: &str, kind: &str, id: i32) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", table);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found(kind, id));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn insert_car(&self, car: &NewCar) -> Result<i32, DatabaseError> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO cars (brand, model, color, year_manufacture, imported, plates, selling_date, selling_price)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&car.brand)
        .bind(&car.model)
        .bind(&car.color)
        .bind(car.year_manufacture)
        .bind(car.imported)
        .bind(&car.plates)
        .bind(car.selling_date)
        .bind(car.selling_price)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_cars(&self) -> Result<Vec<Car>, DatabaseError> {
        let sql = format!("SELECT {} FROM cars ORDER BY brand ASC, id ASC", CAR_COLUMNS);
        let cars = sqlx::query_as::<_, Car>(&sql).fetch_all(&self.pool).await?;
        Ok(cars)
    }

    async fn find_car(&self, id: i32) -> Result<Option<Car>, DatabaseError> {
        let sql = format!("SELECT {} FROM cars WHERE id = $1", CAR_COLUMNS);
        let car = sqlx::query_as::<_, Car>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(car)
    }

    async fn update_car(&self, id: i32, car: &NewCar) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE cars
             SET brand = $1, model = $2, color = $3, year_manufacture = $4, imported = $5,
                 plates = $6, selling_date = $7, selling_price = $8
             WHERE id = $9",
        )
        .bind(&car.brand)
        .bind(&car.model)
        .bind(&car.color)
        .bind(car.year_manufacture)
        .bind(car.imported)
        .bind(&car.plates)
        .bind(car.selling_date)
        .bind(car.selling_price)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("car", id));
        }
        Ok(())
    }

    async fn delete_car(&self, id: i32) -> Result<(), DatabaseError> {
        self.delete_by_id("cars", "car", id).await
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> Result<i32, DatabaseError> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO customers (name, ident_document, birth_date, street_name, house_number,
                                    complements, district, municipality, state, phone, email)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id",
        )
        .bind(&customer.name)
        .bind(&customer.ident_document)
        .bind(customer.birth_date)
        .bind(&customer.street_name)
        .bind(&customer.house_number)
        .bind(&customer.complements)
        .bind(&customer.district)
        .bind(&customer.municipality)
        .bind(&customer.state)
        .bind(&customer.phone)
        .bind(&customer.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, DatabaseError> {
        let sql = format!("SELECT {} FROM customers ORDER BY name ASC, id ASC", CUSTOMER_COLUMNS);
        let customers = sqlx::query_as::<_, Customer>(&sql).fetch_all(&self.pool).await?;
        Ok(customers)
    }

    async fn find_customer(&self, id: i32) -> Result<Option<Customer>, DatabaseError> {
        let sql = format!("SELECT {} FROM customers WHERE id = $1", CUSTOMER_COLUMNS);
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(customer)
    }

    async fn update_customer(&self, id: i32, customer: &NewCustomer) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE customers
             SET name = $1, ident_document = $2, birth_date = $3, street_name = $4,
                 house_number = $5, complements = $6, district = $7, municipality = $8,
                 state = $9, phone = $10, email = $11
             WHERE id = $12",
        )
        .bind(&customer.name)
        .bind(&customer.ident_document)
        .bind(customer.birth_date)
        .bind(&customer.street_name)
        .bind(&customer.house_number)
        .bind(&customer.complements)
        .bind(&customer.district)
        .bind(&customer.municipality)
        .bind(&customer.state)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("customer", id));
        }
        Ok(())
    }

    async fn delete_customer(&self, id: i32) -> Result<(), DatabaseError> {
        self.delete_by_id("customers", "customer", id).await
    }

    async fn insert_user(&self, user: &NewUser, password_hash: &str) -> Result<i32, DatabaseError> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO users (fullname, username, email, is_admin, password)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&user.fullname)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.is_admin)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY fullname ASC, id ASC", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(users)
    }

    async fn find_user(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user(
        &self,
        id: i32,
        user: &NewUser,
        password_hash: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE users
             SET fullname = $1, username = $2, email = $3, is_admin = $4,
                 password = COALESCE($5, password)
             WHERE id = $6",
        )
        .bind(&user.fullname)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.is_admin)
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("user", id));
        }
        Ok(())
    }

    async fn delete_user(&self, id: i32) -> Result<(), DatabaseError> {
        self.delete_by_id("users", "user", id).await
    }

    async fn find_credentials(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserCredentials>, DatabaseError> {
        // A NULL parameter never matches, so an absent username or email is simply ignored
        let sql = format!(
            "SELECT {}, password FROM users WHERE username = $1 OR email = $2 ORDER BY id ASC LIMIT 1",
            USER_COLUMNS
        );
        let credentials = sqlx::query_as::<_, UserCredentials>(&sql)
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(credentials)
    }
}
