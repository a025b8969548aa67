// Domain layer: service/intent types, upstream shapes and the ports the core depends on.

pub mod model;
pub mod ports;
