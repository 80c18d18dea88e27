//! Application state shared by all handlers.

use std::sync::Arc;
use tokio::sync::Semaphore;
use toolforge_core::Config;
use toolforge_processing::pdf::render::PdfRenderer;
use toolforge_storage::WorkspaceProvider;

pub struct AppState {
    pub config: Config,
    /// Creates one scoped workspace per file conversion
    pub workspaces: Arc<dyn WorkspaceProvider>,
    /// Bounds the number of conversions running on the blocking pool
    pub conversion_slots: Arc<Semaphore>,
    pub renderer: PdfRenderer,
}

impl AppState {
    pub fn new(config: Config, workspaces: Arc<dyn WorkspaceProvider>) -> Self {
        let conversion_slots = Arc::new(Semaphore::new(config.max_concurrent_conversions()));
        let renderer = PdfRenderer::new(
            config.pdfium_library_path().map(|p| p.to_path_buf()),
            config.render_dpi(),
        );

        Self {
            config,
            workspaces,
            conversion_slots,
            renderer,
        }
    }
}
