pub mod language;
pub mod notebook;
pub mod preprocess;
pub mod session;
pub mod storage;
pub mod types;

#[cfg(test)]
mod tests;
