// GUI components
pub mod chart;
pub mod controls;
pub mod fundamentals;
