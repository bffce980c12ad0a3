pub mod export;
pub mod repository;
pub mod service;
pub mod stock;
