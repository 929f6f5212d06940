//! Path context for runtime environment detection and per-user data paths.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies the runtime environment where the application is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Running via `cargo run` or in development mode
    Development,
    /// Running as an installed binary in production
    Production,
}

/// Context for managing application paths based on a studio/project/app structure.
#[derive(Debug, Clone)]
pub struct PathContext {
    /// The runtime environment (development or production)
    environment: RuntimeEnvironment,
    /// Base path for all application data
    base_path: Arc<Path>,
    /// Studio identifier (e.g., "upshift")
    studio: String,
    /// Project identifier (e.g., "email_signature")
    project_id: String,
    /// Application identifier (e.g., "signature")
    app_id: &'static str,
}

impl PathContext {
    /// Creates a new PathContext with automatic environment detection.
    pub fn new(
        studio: impl Into<String>,
        project_id: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        let environment = Self::detect_environment();
        let base_path = Self::determine_base_path(environment);

        Self {
            environment,
            base_path: base_path.into(),
            studio: studio.into(),
            project_id: project_id.into(),
            app_id,
        }
    }

    /// Creates a PathContext with an explicit base path (useful for testing).
    pub fn with_base_path(
        base_path: PathBuf,
        studio: impl Into<String>,
        project_id: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        Self {
            environment: Self::detect_environment(),
            base_path: base_path.into(),
            studio: studio.into(),
            project_id: project_id.into(),
            app_id,
        }
    }

    /// Detects the runtime environment based on executable location.
    fn detect_environment() -> RuntimeEnvironment {
        // Binaries under a cargo "target" directory are development builds
        if let Ok(exe_path) = std::env::current_exe() {
            if exe_path.components().any(|c| c.as_os_str() == "target") {
                return RuntimeEnvironment::Development;
            }
        }

        if std::env::var("CARGO").is_ok() || std::env::var("CARGO_MANIFEST_DIR").is_ok() {
            return RuntimeEnvironment::Development;
        }

        RuntimeEnvironment::Production
    }

    /// Determines the base path based on the runtime environment.
    fn determine_base_path(environment: RuntimeEnvironment) -> PathBuf {
        match environment {
            RuntimeEnvironment::Development => std::env::current_dir()
                .map(|dir| dir.join(".out"))
                .unwrap_or_else(|_| PathBuf::from(".out")),
            // Application Support (macOS), LocalAppData (Windows), XDG_DATA_HOME (Linux)
            RuntimeEnvironment::Production => dirs::data_local_dir()
                .map(|dir| dir.join("Email_Signature"))
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }

    /// Returns the runtime environment.
    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    /// Returns the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn studio(&self) -> &str {
        &self.studio
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn app_id(&self) -> &str {
        self.app_id
    }

    /// Returns the project root path: `<base>/<studio>/<project_id>`
    pub fn project_root(&self) -> PathBuf {
        self.base_path.join(&self.studio).join(&self.project_id)
    }

    /// Returns the config file path: `<studio>/<project_id>/<app_id>.toml`
    pub fn config_file(&self) -> PathBuf {
        self.project_root().join(format!("{}.toml", self.app_id))
    }

    /// Returns the data directory path: `<studio>/<project_id>/data/`
    pub fn data_dir(&self) -> PathBuf {
        self.project_root().join("data")
    }

    /// Returns the snapshot store directory: `<studio>/<project_id>/data/store/`
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir().join("store")
    }

    /// Returns the logs directory path: `<studio>/<project_id>/logs/`
    pub fn logs_dir(&self) -> PathBuf {
        self.project_root().join("logs")
    }

    /// Returns a log file path with timestamp: `<studio>/<project_id>/logs/<app_id>.<timestamp>.log`
    pub fn log_file(&self, timestamp: &str) -> PathBuf {
        self.logs_dir()
            .join(format!("{}.{}.log", self.app_id, timestamp))
    }

    /// Returns a log file path with current timestamp.
    pub fn log_file_now(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        self.log_file(&timestamp)
    }

    /// Ensures all necessary directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [self.project_root(), self.store_dir(), self.logs_dir()] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_context_structure() {
        let ctx = PathContext::with_base_path(
            PathBuf::from("/test/base"),
            "upshift",
            "email_signature",
            "signature",
        );

        assert_eq!(ctx.studio(), "upshift");
        assert_eq!(ctx.project_id(), "email_signature");
        assert_eq!(ctx.app_id(), "signature");
        assert_eq!(
            ctx.project_root(),
            PathBuf::from("/test/base/upshift/email_signature")
        );
    }

    #[test]
    fn test_config_and_store_paths() {
        let ctx = PathContext::with_base_path(PathBuf::from("/base"), "studio", "project", "app");

        assert_eq!(
            ctx.config_file(),
            PathBuf::from("/base/studio/project/app.toml")
        );
        assert_eq!(
            ctx.store_dir(),
            PathBuf::from("/base/studio/project/data/store")
        );
    }

    #[test]
    fn test_log_file_path() {
        let ctx = PathContext::with_base_path(PathBuf::from("/base"), "studio", "project", "app");

        let log_path = ctx.log_file("20240315-120000");
        assert_eq!(
            log_path,
            PathBuf::from("/base/studio/project/logs/app.20240315-120000.log")
        );
    }

    #[test]
    fn test_ensure_directories_creates_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = PathContext::with_base_path(tmp.path().to_path_buf(), "studio", "project", "app");

        ctx.ensure_directories().unwrap();
        assert!(ctx.store_dir().is_dir());
        assert!(ctx.logs_dir().is_dir());

        // idempotent
        ctx.ensure_directories().unwrap();
    }
}
