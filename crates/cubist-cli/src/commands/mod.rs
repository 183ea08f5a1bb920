pub mod check;
pub mod program_loader;
pub mod rules;

#[cfg(test)]
mod program_loader_tests;
