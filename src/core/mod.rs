pub mod assets;
pub mod logging;

// Scaling engine + allocation optimizer
pub mod build_optimizer;
