//! `*command` lines
//!
//! Global commands update a [`PlaybackConfiguration`]. `line`, `rest` and the
//! argument-less `on`/`off` forms are parsed here too, but only the file
//! driver gives them their per-song meaning.

use crate::config::PlaybackConfiguration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("Command '{0}' needs a value")]
    MissingValue(String),

    #[error("Invalid value '{value}' for command '{name}'")]
    InvalidValue { name: String, value: String },
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Skip(bool),
    Speed(f32),
    Volume(f32),
    Shift(i32),
    LocalShift(i32),
    /// `on`/`off` with an argument: alias of `skip`
    SetSkip(bool),
    /// Bare `*on`
    Resume,
    /// Bare `*off`
    Suppress,
    Attrib(String),
    Line(i32),
    Rest(i32),
}

/// Split `*name value...` into a lowercase name and the remaining text
pub fn split_command(line: &str) -> (String, &str) {
    let body = line.trim().trim_start_matches('*').trim_start();
    let mut parts = body.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").to_ascii_lowercase();
    let value = parts.next().unwrap_or("").trim();
    (name, value)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_value<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, CommandError> {
    let word = value.split_whitespace().next();
    let Some(word) = word else {
        return Err(CommandError::MissingValue(name.to_string()));
    };
    word.parse().map_err(|_| CommandError::InvalidValue {
        name: name.to_string(),
        value: word.to_string(),
    })
}

fn parse_float(name: &str, value: &str) -> Result<f32, CommandError> {
    let v: f32 = parse_value(name, value)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CommandError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

impl Command {
    /// Parse a command line (with or without the leading `*`)
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let (name, value) = split_command(line);

        let command = match name.as_str() {
            "" => return Err(CommandError::Empty),
            "skip" => {
                let word = value.split_whitespace().next().unwrap_or("");
                if word.is_empty() {
                    return Err(CommandError::MissingValue(name.clone()));
                }
                let skip = parse_bool(word).ok_or_else(|| CommandError::InvalidValue {
                    name: name.clone(),
                    value: word.to_string(),
                })?;
                Self::Skip(skip)
            }
            "speed" => Self::Speed(parse_float(&name, value)?),
            "volume" => Self::Volume(parse_float(&name, value)?),
            "shift" => Self::Shift(parse_value(&name, value)?),
            "localshift" => Self::LocalShift(parse_value(&name, value)?),
            "on" if value.is_empty() => Self::Resume,
            "off" if value.is_empty() => Self::Suppress,
            "on" => Self::SetSkip(false),
            "off" => Self::SetSkip(true),
            "attrib" => Self::Attrib(value.to_string()),
            "line" => Self::Line(parse_value(&name, value)?),
            "rest" => Self::Rest(parse_value(&name, value)?),
            _ => return Err(CommandError::Unknown(name.clone())),
        };

        Ok(command)
    }

    /// Apply the command's effect on the configuration.
    ///
    /// Outside of a song, bare `on`/`off` act on `skip` like their
    /// argument forms, `line` selects the track and `rest` does nothing.
    pub fn apply(&self, config: &mut PlaybackConfiguration) {
        match self {
            Self::Skip(skip) => config.skip = *skip,
            Self::SetSkip(skip) => config.skip = *skip,
            Self::Resume => config.skip = false,
            Self::Suppress => config.skip = true,
            Self::Speed(speed) => config.set_speed(*speed),
            Self::Volume(volume) => config.set_volume(*volume),
            Self::Shift(shift) => config.global_shift = *shift,
            Self::LocalShift(shift) => config.local_shift = *shift,
            Self::Line(line) => config.select_line(*line),
            Self::Attrib(text) => log::info!("attrib: {}", text),
            Self::Rest(_) => {}
        }
    }
}

/// Parse and apply a single command line to the configuration
pub fn apply_command(line: &str, config: &mut PlaybackConfiguration) -> Result<Command, CommandError> {
    let command = Command::parse(line)?;
    command.apply(config);
    Ok(command)
}
