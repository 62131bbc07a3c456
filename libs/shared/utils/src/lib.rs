pub mod form;
pub mod test_utils;

pub use form::{FormError, FormErrorReason, FormTree};
