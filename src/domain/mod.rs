// Domain layer: sync models and the ports the phases run against.

pub mod model;
pub mod ports;
