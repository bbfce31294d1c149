pub mod contacts;
pub mod order;
pub mod response;
pub mod user;

pub use contacts::*;
pub use order::*;
pub use response::*;
pub use user::*;
