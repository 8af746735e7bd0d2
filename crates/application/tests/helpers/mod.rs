#![allow(dead_code)]

mod mock_dispatcher;

pub use mock_dispatcher::*;
