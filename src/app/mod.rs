// Application surfaces built on top of the batch runner.

pub mod server;
