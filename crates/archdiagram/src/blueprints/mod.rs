//! Hard-coded diagram descriptions shipped with the library

pub mod ecommerce;
