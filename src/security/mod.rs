pub mod input_validation;

pub use input_validation::{AddressError, AddressValidator, ADDRESS_LENGTH};
