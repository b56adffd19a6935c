pub mod jobmodel;
pub mod reviewmodel;
pub mod usermodel;
