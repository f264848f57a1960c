use anyhow::Result;
use cpt_app::{
    AppConfig,
    settings::{FileStore, PreferenceSession, Preferences},
};

use crate::{OutputFormat, PrefsCommand, render};

pub fn run(config: &AppConfig, command: PrefsCommand, format: OutputFormat) -> Result<()> {
    let mut session = PreferenceSession::load(FileStore::open(config.settings_path()));

    match command {
        PrefsCommand::Show => {}
        PrefsCommand::SetHeading { heading } => session.set_heading(heading),
        PrefsCommand::SetAccent { accent } => session.set_accent(accent),
        PrefsCommand::Animations { enabled } => session.set_animations_enabled(enabled),
        PrefsCommand::User { name } => session.set_current_user(name),
    }
    show(session.preferences(), format)
}

fn show(preferences: &Preferences, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => render::print_json(preferences),
        OutputFormat::Plain => {
            println!("heading:    {}", preferences.heading);
            println!("accent:     {}", preferences.accent);
            println!("animations: {}", preferences.animations_enabled);
            println!(
                "user:       {}",
                preferences.current_user.as_deref().unwrap_or("(none)")
            );
            if preferences.background_image.is_some() {
                println!("background: custom image");
            }
            Ok(())
        }
    }
}
