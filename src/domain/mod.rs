// Domain layer: value records and ports (interfaces) shared by every stage.

pub mod model;
pub mod ports;
