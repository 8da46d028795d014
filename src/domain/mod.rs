// Domain layer - Pure layout data types and rules
pub mod breakpoint;
pub mod dashboard;
pub mod widget;
