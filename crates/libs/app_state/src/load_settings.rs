use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::path::Path;

/// Load the app settings from YAML + environment variables.
///
/// `.env` is read first so a local `APP__SECRETS__DATABASE_URL` can overwrite
/// the checked-in default.
pub fn load_app_settings() -> Result<AppSettings> {
    dotenv::from_path(".env").ok();
    let config_path = Path::new("config/settings.yaml").canonicalize()?;

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    Ok(raw_settings.into())
}
