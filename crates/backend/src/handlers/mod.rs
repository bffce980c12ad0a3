pub mod a001_client;
pub mod a002_supplier;
pub mod a003_employee;
pub mod a004_product;
pub mod a005_warehouse;
pub mod a006_invoice;
pub mod activity_log;
pub mod d400_summary;
pub mod notifications;
