use paths::PathContext;
use std::marker::PhantomData;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application infrastructure context.
///
/// Contains path management, version info, and logging infrastructure.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    /// The log guard must be kept alive for the duration of the application
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }
}

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
/// This is a pure marker trait - no logic, just constants.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "upshift";
    const PROJECT_ID: &'static str = "email_signature";
}

/// Level used when no filter directive is configured.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// Build the filter from `RUST_LOG`-style directives, falling back to
/// [`default_level`].
pub fn log_filter(directives: Option<&str>) -> Result<EnvFilter, BoxError> {
    let builder = EnvFilter::builder().with_default_directive(default_level().into());
    match directives {
        Some(directives) => Ok(builder.parse(directives)?),
        None => Ok(builder.parse("")?),
    }
}

/// Builder for creating applications with proper initialization.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Create a new application builder with platform-specific paths.
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        let path_context = PathContext::new(A::STUDIO, A::PROJECT_ID, A::APP_ID);
        Self::with_path_context(path_context, version, None)
    }

    /// Create a builder on top of an existing path context.
    ///
    /// This performs all the common initialization:
    /// - Ensures all directories exist
    /// - Initializes logging (file + console on stderr)
    pub fn with_path_context(
        path_context: PathContext,
        version: &'static str,
        log_directives: Option<&str>,
    ) -> Result<Self, BoxError> {
        path_context.ensure_directories()?;

        // Get log file path and split into directory + filename
        let log_file_path = path_context.log_file_now();
        let log_dir = log_file_path
            .parent()
            .ok_or("log file path should have parent directory")?;
        let log_filename = log_file_path
            .file_name()
            .ok_or("log file path should have filename")?;

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // Separate layer: file (non-blocking) + console (stderr, stdout carries output)
        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(log_filter(log_directives)?);

        let console_layer = fmt::Layer::default()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(log_filter(log_directives)?);

        tracing_subscriber::registry()
            .with(tracing_error::ErrorLayer::default())
            .with(file_layer)
            .with(console_layer)
            .try_init()?;

        tracing::info!("{} {} started", A::APP_ID, version);

        Ok(Self {
            context: AppContext {
                path_context,
                version,
                _log_guard: guard,
            },
            _marker: PhantomData,
        })
    }

    /// Build the application context.
    pub fn build(self) -> AppContext {
        self.context
    }
}
