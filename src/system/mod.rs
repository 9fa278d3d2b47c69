pub mod collector;
pub mod network;
