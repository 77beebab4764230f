use futures_util::future::LocalBoxFuture;

use crate::{error::SoundError, telemetry::Telemetry};

pub const AVATAR_SELECTOR: &str = ".img__github";

pub trait SoundClip {
    fn rewind(&self);
    fn play(&self) -> LocalBoxFuture<'_, Result<(), SoundError>>;
}

/// Restarts the clip from zero; a rejected play never reaches the visitor.
pub async fn play_from_start(clip: &dyn SoundClip, telemetry: &Telemetry) {
    clip.rewind();

    if let Err(err) = clip.play().await {
        telemetry.debug(
            "sound_playback_failed",
            serde_json::json!({ "error": err.to_string() }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_telemetry, ScriptedClip};

    #[tokio::test]
    async fn click_rewinds_before_playing() {
        let (telemetry, sink) = test_telemetry();
        let clip = ScriptedClip::new(Ok(()));

        play_from_start(&clip, &telemetry).await;
        play_from_start(&clip, &telemetry).await;

        assert_eq!(clip.calls(), vec!["rewind", "play", "rewind", "play"]);
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn rejected_playback_is_swallowed_and_reported() {
        let (telemetry, sink) = test_telemetry();
        let clip = ScriptedClip::new(Err(SoundError::Playback("NotAllowedError".to_string())));

        play_from_start(&clip, &telemetry).await;

        assert_eq!(sink.event_names(), vec!["sound_playback_failed"]);
        assert_eq!(
            sink.events()[0]["error"],
            "playback rejected: NotAllowedError"
        );
    }
}
