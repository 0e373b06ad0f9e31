// Payment processing behind the `PaymentGateway` seam

pub mod processor;

pub use processor::*;
