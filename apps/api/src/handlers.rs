pub mod health;
pub mod me;
pub mod menus;
pub mod security;
