//! parse a task file: a TOML document with integration defaults, logging options and a list of
//! integration tasks
//!
//! ```toml
//! [settings]
//! n = 100
//! eps = 1e-6
//! max_depth = 20
//!
//! [logging]
//! level = "info"
//! log_to_file = false
//! directory = "logs"
//!
//! [[task]]
//! name = "area under parabola"
//! function = "x**2"
//! a = 0.0
//! b = 1.0
//! method = "simpson"
//! n = 50
//! ```
//! Every table except `[[task]]` may be omitted; missing keys take their default values.
//! A task without `n`, `eps` or `max_depth` uses the value from `[settings]`.
use crate::Utils::logger::parse_level;
use crate::error::{ConfigError, InputError};
use crate::numerical::integrate_api::{
    IntegrationSettings, Method, QuadratureOptions, validate_parameters,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// path reported for documents that did not come from a file
const INLINE_SOURCE: &str = "<inline>";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// "off" | "none" | "error" | "warn" | "info" | "debug"
    pub level: String,
    /// also write the log to `log_<date>_<time>.txt`
    pub log_to_file: bool,
    /// directory of the log file; the working directory when unset
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            log_to_file: false,
            directory: None,
        }
    }
}

fn default_method() -> String {
    "adaptive".to_string()
}

/// one `[[task]]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub function: String,
    pub a: f64,
    pub b: f64,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub n: Option<usize>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub max_depth: Option<u32>,
}

impl TaskSpec {
    pub fn new(function: &str, a: f64, b: f64, method: &str) -> Self {
        TaskSpec {
            name: None,
            function: function.to_string(),
            a,
            b,
            method: method.to_string(),
            n: None,
            eps: None,
            max_depth: None,
        }
    }

    /// the task name, or the formula if the task has none
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.function)
    }

    pub fn options(&self) -> QuadratureOptions {
        QuadratureOptions {
            n: self.n,
            eps: self.eps,
            max_depth: self.max_depth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskFile {
    #[serde(default)]
    pub settings: IntegrationSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskSpec>,
}

/// task key an input error is about
fn input_field(err: &InputError) -> &'static str {
    match err {
        InputError::TrapezoidSubdivisions(_)
        | InputError::SimpsonSubdivisions(_)
        | InputError::RiemannSubdivisions(_) => "n",
        InputError::UnknownMethod(_) => "method",
        InputError::Tolerance(_) => "eps",
        InputError::MaxDepth(_) => "max_depth",
        InputError::Bounds(_, _) => "a",
    }
}

fn invalid(field: String, err: InputError) -> ConfigError {
    ConfigError::ValidationFailed {
        field,
        message: err.to_string(),
    }
}

impl TaskFile {
    /// Loads, parses and validates a task file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            },
        })?;
        let file = Self::parse(&content, &path.display().to_string())?;
        Self::validate(&file)?;
        Ok(file)
    }

    /// Parses a task document held in memory. The result is not validated.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Self::parse(toml_str, INLINE_SOURCE)
    }

    fn parse(toml_str: &str, path: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Checks the settings, the log level and every task. Formulas are only checked for
    /// being non-empty here: compiling them is the session's job.
    pub fn validate(file: &TaskFile) -> Result<(), ConfigError> {
        let settings = &file.settings;
        if settings.n < 1 {
            return Err(invalid(
                "settings.n".to_string(),
                InputError::TrapezoidSubdivisions(settings.n),
            ));
        }
        if let Err(err) = settings.validate() {
            return Err(invalid(format!("settings.{}", input_field(&err)), err));
        }
        if parse_level(&file.logging.level).is_none() {
            return Err(ConfigError::ValidationFailed {
                field: "logging.level".to_string(),
                message: format!(
                    "unknown level '{}'; use off, none, error, warn, info or debug",
                    file.logging.level
                ),
            });
        }
        if file.tasks.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "task".to_string(),
                message: "no [[task]] tables defined".to_string(),
            });
        }
        for (i, task) in file.tasks.iter().enumerate() {
            Self::validate_task(i, task, settings)?;
        }
        Ok(())
    }

    fn validate_task(
        i: usize,
        task: &TaskSpec,
        settings: &IntegrationSettings,
    ) -> Result<(), ConfigError> {
        if task.function.trim().is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: format!("task[{}].function", i),
                message: "empty function expression".to_string(),
            });
        }
        task.method
            .parse::<Method>()
            .and_then(|method| {
                validate_parameters(task.a, task.b, method, &task.options(), settings)
            })
            .map_err(|err| invalid(format!("task[{}].{}", i, input_field(&err)), err))
    }

    /// built-in demonstration set run by the binary when no task file is given
    pub fn demo() -> Self {
        let mut parabola = TaskSpec::new("x**2", 0.0, 1.0, "simpson");
        parabola.n = Some(100);
        let mut coarse = TaskSpec::new("x**2", 0.0, 1.0, "trapezoid");
        coarse.n = Some(2);
        let mut arctan = TaskSpec::new("1/(1+x**2)", 0.0, 1.0, "adaptive");
        arctan.name = Some("pi / 4".to_string());
        let tasks = vec![
            parabola,
            coarse,
            TaskSpec::new("sin(x)", 0.0, 3.14159265, "adaptive"),
            arctan,
            TaskSpec::new("exp(-x^2)", -3.0, 3.0, "adaptive_simpson"),
            TaskSpec::new("sqrt(x)", 1.0, 1.0, "simpson"),
            TaskSpec::new("1/x", 1.0, 2.0, "adaptive"),
        ];
        TaskFile {
            settings: IntegrationSettings::default(),
            logging: LoggingConfig::default(),
            tasks,
        }
    }
}
