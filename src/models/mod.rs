mod aggregate;
mod category;
mod transaction;
mod user;

pub use aggregate::{MonthlyAggregate, TransactionListing};
pub use category::{Category, CategoryIcon, CategoryPayload};
pub use transaction::{Transaction, TransactionPayload};
pub use user::{Credentials, LoginResponse, Registration, User};
