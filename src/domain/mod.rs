// Domain layer: models, their rules and the ports the core depends on.

pub mod model;
pub mod ports;
pub mod validation;
