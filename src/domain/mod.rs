// Domain layer: product models and the ports the sync pipeline talks through.

pub mod model;
pub mod ports;
