use crate::cli::Args;
use crate::config;

/// Load config (file from `--config` or the default locations, then env) and
/// apply the command-line overrides on top.
pub fn load_settings(args: &Args) -> config::Settings {
    let path = args.config.clone().or_else(config::resolve_config_path);

    let mut settings = match config::Settings::load_from(path) {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("folio: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("folio: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    };

    if let Some(root) = &args.root {
        settings.catalog.root_url = root.clone();
    }
    if let Some(album) = &args.album {
        settings.catalog.default_album = Some(album.clone());
    }
    settings
}
