// Application layer: concrete pipelines wiring the core stages to adapters.

pub mod pipelines;
