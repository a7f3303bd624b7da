pub mod bar;
pub mod history;
