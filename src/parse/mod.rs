// src/parse/mod.rs

//! Turning a launch request into the exact `(command, args, options)`
//! triple process creation should receive.
//!
//! - [`windows`] holds the `cmd.exe` rewrite and path normalisation.
//!
//! Flow for one request:
//!
//! ```text
//! request ─┬─ POSIX, no shell ──► parse cache ──► hit: rebuild from cache
//!          │                                  └─► miss: build + cache
//!          ├─ shell requested ───► passed through untouched
//!          └─ Windows ───────────► resolve + shebang ──► native .exe/.com?
//!                                                        ├─ yes: as is
//!                                                        └─ no: cmd.exe rewrite
//! ```

pub mod windows;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, trace};

use crate::cache::BoundedCache;
use crate::env::Environment;
use crate::escape::Escaper;
use crate::fs::{FileSystem, RealFileSystem};
use crate::resolve::{PathSearch, Resolver, WhichSearch};
use crate::shebang::detect_shebang;
use crate::types::{ParsedInvocation, Platform, SpawnOptions, SpawnRequest};

pub use windows::{is_cmd_shim, is_native_executable, normalize_windows_path};

/// Capacity of the POSIX fast-path cache.
pub const PARSE_CACHE_CAPACITY: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ParseKey {
    command: String,
    args: Option<Vec<String>>,
    options: Option<SpawnOptions>,
}

/// What the fast path remembers. Containers are never cached; every hit
/// gets fresh copies of the caller's args and options.
#[derive(Debug, Clone)]
struct CachedParse {
    command: String,
    file: Option<PathBuf>,
}

/// Parser context: owns the resolver, the escaper and all three caches.
///
/// One instance per process is the intended use (see [`default_parser`]);
/// tests build their own with [`ParserBuilder`] to pin the platform and
/// swap the collaborators.
#[derive(Debug)]
pub struct Parser {
    platform: Platform,
    resolver: Resolver,
    escaper: Escaper,
    fs: Arc<dyn FileSystem>,
    cache: Mutex<BoundedCache<ParseKey, CachedParse>>,
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    /// Number of entries currently held by the fast-path cache.
    pub fn cached_parses(&self) -> usize {
        self.lock_cache().len()
    }

    /// Produce the invocation for `request`.
    ///
    /// Never fails: an unresolvable command comes back with `file: None`
    /// so process creation can report its own "not found".
    pub fn parse(&self, request: &SpawnRequest) -> ParsedInvocation {
        let shell_requested = request
            .options
            .as_ref()
            .is_some_and(|o| o.shell.is_requested());

        if !self.platform.is_windows() && !shell_requested {
            return self.parse_fast(request);
        }

        let options = request.options.clone().unwrap_or_default();
        let mut parsed = ParsedInvocation::from_request(request, options);

        if shell_requested {
            debug!(command = %parsed.command, "shell requested; passing through");
            return parsed;
        }

        self.parse_non_shell(&mut parsed);
        parsed
    }

    /// POSIX exec takes argv as is, so only the cached `{command, file}`
    /// pair is reused and everything else is rebuilt from the request.
    fn parse_fast(&self, request: &SpawnRequest) -> ParsedInvocation {
        let key = ParseKey {
            command: request.command.clone(),
            args: request.args.clone(),
            options: request.options.clone(),
        };
        let options = request.options.clone().unwrap_or_default();

        let mut cache = self.lock_cache();
        if let Some(cached) = cache.get(&key) {
            trace!(command = %request.command, "parse cache hit");
            let mut parsed = ParsedInvocation::from_request(request, options);
            parsed.command = cached.command.clone();
            parsed.file = cached.file.clone();
            return parsed;
        }

        let parsed = ParsedInvocation::from_request(request, options);
        cache.insert(
            key,
            CachedParse {
                command: parsed.command.clone(),
                file: parsed.file.clone(),
            },
        );
        trace!(command = %request.command, size = cache.len(), "parse cache miss");
        parsed
    }

    fn parse_non_shell(&self, parsed: &mut ParsedInvocation) {
        if !self.platform.is_windows() {
            return;
        }

        let env = Environment::effective(&parsed.options);
        let command_file = detect_shebang(parsed, &self.resolver, self.fs.as_ref(), &env);

        let needs_shell = !command_file.as_deref().is_some_and(is_native_executable);
        if parsed.options.force_shell || needs_shell {
            windows::rewrite_for_cmd(parsed, command_file.as_deref(), &self.escaper, &env);
            debug!(
                command = %parsed.command,
                file = ?parsed.file,
                force_shell = parsed.options.force_shell,
                "rewrote invocation for cmd.exe"
            );
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, BoundedCache<ParseKey, CachedParse>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builder for [`Parser`]; unset parts default to the host platform, the
/// `which`-backed search (using the builder's platform) and the real
/// filesystem.
#[derive(Debug, Default)]
pub struct ParserBuilder {
    platform: Option<Platform>,
    search: Option<Arc<dyn PathSearch>>,
    fs: Option<Arc<dyn FileSystem>>,
    parse_capacity: Option<usize>,
}

impl ParserBuilder {
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn path_search(mut self, search: Arc<dyn PathSearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    pub fn parse_cache_capacity(mut self, capacity: usize) -> Self {
        self.parse_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Parser {
        let platform = self.platform.unwrap_or_else(Platform::current);
        let fs = self
            .fs
            .unwrap_or_else(|| Arc::new(RealFileSystem) as Arc<dyn FileSystem>);
        let search = self.search.unwrap_or_else(|| {
            Arc::new(WhichSearch::new(platform, Arc::clone(&fs))) as Arc<dyn PathSearch>
        });

        Parser {
            platform,
            resolver: Resolver::new(platform, search),
            escaper: Escaper::new(),
            fs,
            cache: Mutex::new(BoundedCache::new(
                self.parse_capacity.unwrap_or(PARSE_CACHE_CAPACITY),
            )),
        }
    }
}

/// Process-wide parser for the host platform, built on first use.
pub fn default_parser() -> &'static Parser {
    static PARSER: OnceLock<Parser> = OnceLock::new();
    PARSER.get_or_init(|| Parser::builder().build())
}
