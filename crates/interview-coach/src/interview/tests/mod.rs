mod common;

mod questions;
