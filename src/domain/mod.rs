// Domain layer: view models, request payloads and ports. No HTTP or filesystem code here.

pub mod dto;
pub mod model;
pub mod ports;
