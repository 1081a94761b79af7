pub mod config_constraint;
