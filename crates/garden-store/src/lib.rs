pub mod error;
pub mod model;
pub mod schema;
pub mod store;

pub use error::{Result, StoreError};
pub use model::{Contact, Interaction, NewContact, NewInteraction};
pub use store::Store;
