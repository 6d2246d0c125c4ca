//! Remote data acquisition (ECB Data Portal, SDMX-JSON).

pub mod ecb;
pub mod sdmx;

pub use ecb::EcbClient;
