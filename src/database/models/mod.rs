pub mod car;
pub mod customer;
pub mod user;

pub use car::{Car, NewCar};
pub use customer::{Customer, NewCustomer};
pub use user::{NewUser, User, UserCredentials};
