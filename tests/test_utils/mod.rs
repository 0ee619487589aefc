#![allow(unused_imports)]

pub mod builders;

pub use builders::*;
