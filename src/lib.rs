pub mod color;
pub mod config;
pub mod data;
pub mod hypervolume;
pub mod pareto;
pub mod pipeline;
pub mod render;
