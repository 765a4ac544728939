//! LED render task

use embassy_sync::blocking_mutex::raw::RawMutex;

use sleigh_core::render::RenderCoordinator;
use sleigh_core::traits::LedStrip;

/// Render task: drive the strip forever, logging failed updates
pub async fn render_loop<M: RawMutex, S: LedStrip, const N: usize>(
    coordinator: &mut RenderCoordinator<'_, M, S, N>,
) -> ! {
    info!("Render task started");
    coordinator
        .run(|e| warn!("Couldn't update strip: {:?}", e))
        .await
}
