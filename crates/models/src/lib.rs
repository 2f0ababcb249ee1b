pub mod db;
pub mod item;
