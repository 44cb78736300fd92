use std::{
    fs,
    path::{Path, PathBuf},
    error::Error,
};
use fern::colors::{Color, ColoredLevelConfig};

/// Global logger setup for tools running adjustment queries.
///
/// Console records are prefixed with a colored level tag, except at
/// the `Info` level.  If a log file is requested, records of the same
/// level are also written there, tagged with their target.
pub struct Logger {
    level:    log::LevelFilter,
    colors:   ColoredLevelConfig,
    log_file: Option<PathBuf>,
}

impl Logger {
    pub fn new(level: log::LevelFilter) -> Self {
        let colors = ColoredLevelConfig::new()
            .trace(Color::Blue)
            .debug(Color::Yellow)
            .info(Color::Green)
            .warn(Color::Magenta)
            .error(Color::Red);

        Logger { level, colors, log_file: None }
    }

    /// Requests a log file named `filename` in `directory`, creating
    /// the directory if it is missing.
    pub fn with_log_file<P, S>(mut self, directory: P, filename: S) -> Result<Self, Box<dyn Error>>
    where
        P: AsRef<Path>,
        S: AsRef<str>,
    {
        let directory = directory.as_ref();

        if directory.exists() && !directory.is_dir() {
            let msg = format!("Can't log to \"{}\", which isn't a directory", directory.display());

            return Err(msg.into())
        }

        fs::create_dir_all(directory)?;
        self.log_file = Some(directory.join(filename.as_ref()));

        Ok(self)
    }

    pub fn get_log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    fn console_output(&self) -> fern::Dispatch {
        let colors = self.colors;

        fern::Dispatch::new()
            .format(move |out, message, record| match record.level() {
                log::Level::Info => out.finish(format_args!("{}.", message)),
                level => out.finish(format_args!("[{}]\t{}.", colors.color(level), message)),
            })
            .chain(std::io::stdout())
    }

    fn file_output(path: &Path) -> Result<fern::Dispatch, Box<dyn Error>> {
        let log_file = fern::log_file(path)?;

        Ok(fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!("[{}][{}] {}.", record.target(), record.level(), message))
            })
            .chain(log_file))
    }

    /// Installs the logger.  Fails if the log file can't be opened, or
    /// if a global logger is already in place.
    pub fn apply(self) -> Result<(), Box<dyn Error>> {
        let mut dispatcher = fern::Dispatch::new().level(self.level).chain(self.console_output());

        if let Some(ref path) = self.log_file {
            dispatcher = dispatcher.chain(Self::file_output(path)?);
        }

        dispatcher.apply()?;

        Ok(())
    }
}
