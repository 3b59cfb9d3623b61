//! CrudService: generic CRUD using the safe SQL builder and a storage gateway.

mod crud;
mod validation;
pub use crud::CrudService;
pub use validation::{Fields, RequestValidator};
