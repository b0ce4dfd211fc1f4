use crate::error::{Result, TurnoverError};
use crate::settings::{load_settings, save_settings, Settings};

pub fn show() -> Result<()> {
    let json = serde_json::to_string_pretty(&load_settings())?;
    println!("{json}");
    Ok(())
}

pub fn set(
    endpoint: Option<String>,
    export_dir: Option<String>,
    log_level: Option<String>,
) -> Result<()> {
    if endpoint.is_none() && export_dir.is_none() && log_level.is_none() {
        return Err(TurnoverError::Settings(
            "nothing to change: pass --endpoint, --export-dir or --log-level".into(),
        ));
    }
    let settings = apply(load_settings(), endpoint, export_dir, log_level);
    let path = save_settings(&settings)?;
    println!("Saved {}", path.display());
    Ok(())
}

fn apply(
    mut settings: Settings,
    endpoint: Option<String>,
    export_dir: Option<String>,
    log_level: Option<String>,
) -> Settings {
    if let Some(e) = endpoint {
        settings.endpoint = e;
    }
    if let Some(d) = export_dir {
        settings.export_dir = d;
    }
    if let Some(l) = log_level {
        settings.log_level = l;
    }
    settings
}
