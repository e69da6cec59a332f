mod config_cmd;
mod item;

pub use config_cmd::ConfigCommand;
pub use item::ItemSubcommand;
