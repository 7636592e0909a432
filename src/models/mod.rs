pub mod amount;
pub mod record;
pub mod transaction;
