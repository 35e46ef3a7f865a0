pub mod db;
pub mod dto;
pub mod pagination;
pub mod repository;
