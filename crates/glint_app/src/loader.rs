//! Background resource loading
//!
//! Workers read bytes through a shared [`ContentSource`], build the font
//! face off-thread, and post an install continuation to the owning thread.
//! The worker never touches the render context itself.
//!
//! A load that completes after the frame loop has shut down posts into a
//! dead queue; the continuation is dropped, which is the documented
//! shutdown behavior.

use std::io::Read;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use glint_core::CommandSender;
use glint_platform::ContentSource;
use glint_text::SwashFace;

use crate::context::RenderContext;

/// Spawn a worker that loads a font resource and installs it under `name`.
///
/// Absent resources and unparsable data are logged and dropped; loading is
/// best-effort and the renderer treats a missing face as "not yet loaded".
/// The handle is returned so callers that need determinism (tests,
/// preloading) can join.
pub fn spawn_font_load(
    source: Arc<dyn ContentSource>,
    name: impl Into<String>,
    sender: CommandSender<RenderContext>,
) -> JoinHandle<()> {
    let name = name.into();
    thread::spawn(move || {
        let mut stream = match source.open(&name) {
            Ok(Some(stream)) => stream,
            Ok(None) => {
                tracing::warn!(name = %name, "font resource not found");
                return;
            }
            Err(err) => {
                tracing::warn!(name = %name, %err, "font resource failed to open");
                return;
            }
        };

        let mut bytes = Vec::new();
        if let Err(err) = stream.read_to_end(&mut bytes) {
            tracing::warn!(name = %name, %err, "font resource failed to read");
            return;
        }

        let face = match SwashFace::from_data(bytes) {
            Ok(face) => face,
            Err(err) => {
                tracing::warn!(name = %name, %err, "font data failed to parse");
                return;
            }
        };

        sender.post(move |ctx| {
            ctx.install_face(name, Box::new(face));
        });
    })
}
