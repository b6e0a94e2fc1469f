pub mod ciods;
pub mod extract;
pub mod inventory;
pub mod modules;
pub mod normalize;
