// Domain layer: product models and the ports the scraper is written against.

pub mod model;
pub mod ports;
