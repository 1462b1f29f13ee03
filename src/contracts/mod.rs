//! Contract bindings for the CyberCar NFT

pub mod car;

pub use car::*;
