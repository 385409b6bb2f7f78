//! HTML views and template glue.

pub mod views;
