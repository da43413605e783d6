use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::ai::{AiReply, AiRequest, QuestionService, RequestId, execute};
use crate::event::AppEvent;

/// Run `request` on its own thread and post the reply into the event
/// channel. A closed channel means the app is shutting down; the reply is
/// dropped.
pub fn spawn(
    service: Arc<dyn QuestionService>,
    id: RequestId,
    request: AiRequest,
    tx: Sender<AppEvent>,
) {
    thread::spawn(move || {
        let result = execute(service.as_ref(), &request);
        if let Err(e) = &result {
            tracing::warn!(id = id.0, "AI request failed: {e}");
        }
        if tx.send(AppEvent::Ai(AiReply { id, result })).is_err() {
            tracing::debug!(id = id.0, "event channel closed, dropping AI reply");
        }
    });
}
