pub mod ai;
pub mod calculators;
pub mod conditions;
pub mod engine;
pub mod state;

#[cfg(test)]
pub(crate) mod tests;
