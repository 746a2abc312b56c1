pub mod errors;
pub mod db;
pub mod listing;

#[cfg(test)]
mod tests;
