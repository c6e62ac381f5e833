use camino::Utf8PathBuf;

pub(crate) const DEFAULT_API_URL: &str = "http://127.0.0.1:10000";

pub fn default_config_path() -> Option<Utf8PathBuf> {
    let config_dir = dirs::config_dir()?;
    let config_dir = Utf8PathBuf::from_path_buf(config_dir).ok()?;

    Some(config_dir.join("devsimctl/config.toml"))
}
