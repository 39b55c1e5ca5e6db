pub mod blueprints;
pub mod run;
pub mod testing;
pub mod vault;
