pub mod controller;
pub mod model;
pub mod pipeline;
pub mod service;
pub mod store;
