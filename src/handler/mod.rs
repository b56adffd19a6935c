pub mod jobs;
pub mod providers;
pub mod reviews;
pub mod users;

#[cfg(test)]
mod tests;
