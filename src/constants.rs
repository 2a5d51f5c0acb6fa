/// Package name, used as the config directory name.
pub(crate) const PKG_NAME: &str = env!("CARGO_PKG_NAME");
/// Settings file name.
pub(crate) const CONFIG_NAME: &str = "config.toml";
