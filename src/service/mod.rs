//! PizzeriaService: the API operations over an injected store.

mod crud;
mod validation;
pub use crud::PizzeriaService;
pub use validation::RequestValidator;
