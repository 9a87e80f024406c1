// src/types.rs

//! Request / result types shared by every stage of the pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which family of process-creation semantics to emulate.
///
/// - `Posix`: the OS exec call takes an argument vector directly; no shell
///   re-expression is ever needed.
/// - `Windows`: scripts must go through the command interpreter, so the
///   invocation may be rewritten into a single escaped command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Posix,
    Windows,
}

impl Platform {
    /// Platform of the running host.
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }

    pub fn is_windows(self) -> bool {
        self == Platform::Windows
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::current()
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "posix" | "unix" | "linux" | "darwin" => Ok(Platform::Posix),
            "windows" | "win32" => Ok(Platform::Windows),
            other => Err(format!(
                "invalid platform: {other} (expected \"posix\" or \"windows\")"
            )),
        }
    }
}

/// The `shell` option: either a flag or the path of a shell program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Shell {
    Enabled(bool),
    Program(String),
}

impl Shell {
    /// Truthiness of the option: `true` or a non-empty program path.
    pub fn is_requested(&self) -> bool {
        match self {
            Shell::Enabled(enabled) => *enabled,
            Shell::Program(program) => !program.is_empty(),
        }
    }

    /// Explicit shell program, if one was given.
    pub fn program(&self) -> Option<&str> {
        match self {
            Shell::Program(program) if !program.is_empty() => Some(program),
            _ => None,
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::Enabled(false)
    }
}

/// Spawn options recognised by the launch shim.
///
/// Maps directly onto a TOML table:
///
/// ```toml
/// shell = "bash"
/// cwd = "packages/app"
///
/// [env]
/// PATH = "/usr/local/bin:/usr/bin"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnOptions {
    /// Run the command through a shell instead of exec'ing it directly.
    pub shell: Shell,

    /// Working directory used both for resolution and for the child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,

    /// Always rewrite into a command-interpreter invocation on Windows,
    /// even for native executables. Used by tests.
    pub force_shell: bool,

    /// Set by the rewrite to tell the OS layer the arguments are already
    /// quoted and must be passed through untouched.
    pub windows_verbatim_arguments: bool,

    /// Full replacement environment for resolution and for the child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<BTreeMap<String, String>>,
}

impl SpawnOptions {
    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn with_env<K, V, I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn with_force_shell(mut self, force: bool) -> Self {
        self.force_shell = force;
        self
    }
}

/// A launch request: what the caller wants to run.
///
/// `args: None` and `options: None` are distinct from empty values only in
/// what gets reported back through [`Original`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub command: String,
    pub args: Option<Vec<String>>,
    pub options: Option<SpawnOptions>,
}

impl SpawnRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: None,
            options: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    pub fn options(mut self, options: SpawnOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// Snapshot of the caller's command and arguments, before any rewriting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Original {
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

/// The final `(command, args, options)` triple handed to process creation,
/// plus the resolved file and the original request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedInvocation {
    pub command: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub options: SpawnOptions,
    pub original: Original,
}

impl ParsedInvocation {
    /// Build the initial work object from a request. Everything is cloned;
    /// the request is never touched again.
    pub fn from_request(request: &SpawnRequest, options: SpawnOptions) -> Self {
        Self {
            command: request.command.clone(),
            args: request.args.clone().unwrap_or_default(),
            file: None,
            options,
            original: Original {
                command: request.command.clone(),
                args: request.args.clone(),
            },
        }
    }
}
