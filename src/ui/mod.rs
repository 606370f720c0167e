// src/ui/mod.rs
pub mod bar;
pub mod choropleth;
pub mod dashboard;
pub mod donut;
pub mod explorer;
pub mod line;
pub mod radar;
pub mod scatter;
pub mod table;
