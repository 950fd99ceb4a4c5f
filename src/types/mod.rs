// Types layer - database entities and domain values
pub mod db;
pub mod internal;
