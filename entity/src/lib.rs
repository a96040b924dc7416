pub mod prelude;
pub mod track;
