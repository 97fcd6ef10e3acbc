pub mod chart;
pub mod chord;
pub mod gameplay;
pub mod input;
pub mod scoring;
pub mod track;
