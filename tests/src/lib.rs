pub mod stub_server;

#[cfg(test)]
mod comparison_tests;
