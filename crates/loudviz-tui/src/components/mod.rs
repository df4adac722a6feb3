pub mod help_overlay;
pub mod stage;
pub mod toolbar;
