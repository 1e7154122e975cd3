//! Queue behaviour tests, grouped by concern

mod core_functionality;
