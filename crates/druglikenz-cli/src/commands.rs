pub mod cite;
pub mod rules;
pub mod screen;
