pub mod outlet;
pub mod pipeline;
pub mod request;
pub mod templates;
pub mod workflow;
