pub mod campaign;
pub mod insight;
pub mod lead;
