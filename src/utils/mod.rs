pub mod rating;
pub mod token;
