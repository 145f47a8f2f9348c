use std::time::Duration;

use prompter_core::{
    Error, PrompterCommand, PrompterContent, PrompterSession, Script, SpanStyle, StyleKind,
    StyleRange, TeleprompterSettings, encode_formatting,
};

#[tokio::test(start_paused = true)]
async fn playing_session_scrolls_until_paused() {
    let session = PrompterSession::new(&TeleprompterSettings::default());
    session.set_max_scroll_offset(5000).await.unwrap();

    let state = session.handle(PrompterCommand::Play).await.unwrap();
    assert!(state.is_playing);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let moved = session.state().await.scroll_offset;
    // 30 px/s, but every 16ms tick moves at least one pixel.
    assert!(moved >= 30, "offset {moved}");
    assert!(moved <= 70, "offset {moved}");

    let paused = session.handle(PrompterCommand::Pause).await.unwrap();
    assert!(!paused.is_playing);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(session.state().await.scroll_offset, paused.scroll_offset);
}

#[tokio::test(start_paused = true)]
async fn session_stops_itself_at_the_end() {
    let session = PrompterSession::new(&TeleprompterSettings::default());
    session.set_max_scroll_offset(20).await.unwrap();
    let mut updates = session.subscribe();

    session.handle(PrompterCommand::Play).await.unwrap();
    let done = updates
        .wait_for(|s| !s.is_playing)
        .await
        .map(|s| *s)
        .unwrap();
    assert_eq!(done.scroll_offset, 20);

    // Playing again restarts from the top with a fresh tick task.
    let restarted = session.handle(PrompterCommand::Play).await.unwrap();
    assert!(restarted.is_playing);
    assert_eq!(restarted.scroll_offset, 0);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(session.state().await.scroll_offset > 0);
}

#[tokio::test(start_paused = true)]
async fn toggle_play_and_seek_while_playing() {
    let session = PrompterSession::new(&TeleprompterSettings::default());
    session.set_max_scroll_offset(2000).await.unwrap();

    assert!(session.handle(PrompterCommand::TogglePlay).await.unwrap().is_playing);
    let forwarded = session.handle(PrompterCommand::Forward).await.unwrap();
    assert!(forwarded.is_playing);
    assert!(forwarded.scroll_offset >= 500);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(session.state().await.scroll_offset > forwarded.scroll_offset);

    let reset = session.handle(PrompterCommand::Reset).await.unwrap();
    assert!(!reset.is_playing);
    assert_eq!(reset.scroll_offset, 0);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(session.state().await.scroll_offset, 0);
}

#[tokio::test(start_paused = true)]
async fn speed_changes_apply_without_interrupting() {
    let session = PrompterSession::new(&TeleprompterSettings::default());
    session.set_max_scroll_offset(10_000).await.unwrap();
    session.handle(PrompterCommand::Play).await.unwrap();

    let faster = session.handle(PrompterCommand::SpeedUp).await.unwrap();
    assert!(faster.is_playing);
    assert!(faster.scroll_speed > 30.0);
    let slower = session.handle(PrompterCommand::SlowDown).await.unwrap();
    assert!(slower.scroll_speed < faster.scroll_speed);
}

#[tokio::test(start_paused = true)]
async fn closing_cancels_ticks_and_rejects_commands() {
    let session = PrompterSession::new(&TeleprompterSettings::default());
    session.set_max_scroll_offset(5000).await.unwrap();
    session.handle(PrompterCommand::Play).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    session.close().await;
    assert!(session.is_closed());
    let frozen = session.state().await;
    assert!(!frozen.is_playing);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(session.state().await.scroll_offset, frozen.scroll_offset);
    assert!(matches!(
        session.handle(PrompterCommand::Play).await,
        Err(Error::SessionClosed)
    ));

    // Closing twice is harmless.
    session.close().await;
}

#[tokio::test(start_paused = true)]
async fn a_new_session_starts_fresh() {
    let settings = TeleprompterSettings::default();
    let first = PrompterSession::new(&settings);
    first.set_max_scroll_offset(1000).await.unwrap();
    first.handle(PrompterCommand::Play).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    first.close().await;

    let second = PrompterSession::new(&settings);
    let state = second.state().await;
    assert_eq!(state.scroll_offset, 0);
    assert!(!state.is_playing);
}

#[tokio::test(start_paused = true)]
async fn mirrored_session_opens_at_the_first_line() {
    let settings = TeleprompterSettings {
        is_vertical_mirror_mode: true,
        ..Default::default()
    };
    let session = PrompterSession::new(&settings);
    let opened = session.set_max_scroll_offset(1000).await.unwrap();
    assert_eq!(opened.scroll_offset, 1000);
    assert!(!opened.is_playing);

    let reset = session.handle(PrompterCommand::Reset).await.unwrap();
    assert_eq!(reset.scroll_offset, opened.scroll_offset);

    // A later layout pass before playing still starts from the new extent.
    let relaid = session.set_max_scroll_offset(1200).await.unwrap();
    assert_eq!(relaid.scroll_offset, 1200);

    session.handle(PrompterCommand::Play).await.unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    let paused = session.handle(PrompterCommand::Pause).await.unwrap();
    assert!(paused.scroll_offset < 1200, "offset {}", paused.scroll_offset);

    // Paused mid-script, a layout change only clamps.
    let clamped = session.set_max_scroll_offset(1500).await.unwrap();
    assert_eq!(clamped.scroll_offset, paused.scroll_offset);
    session.close().await;
}

#[test]
fn mirrored_content_reverses_lines_and_moves_the_title() {
    let mut script = Script::new("Title", "first\nsecond\nthird");
    script.formatting_data = encode_formatting(&[StyleRange::new(0, 5, StyleKind::Bold)]);
    let settings = TeleprompterSettings {
        is_vertical_mirror_mode: true,
        ..Default::default()
    };

    let content = PrompterContent::from_script(&script, &settings);
    assert!(content.title_after_text);
    assert_eq!(content.styled.text(), "third\nsecond\nfirst");
    assert_eq!(content.styled.style_at(14), Some(SpanStyle::BOLD));

    let plain = PrompterContent::from_script(&script, &TeleprompterSettings::default());
    assert!(!plain.title_after_text);
    assert_eq!(plain.styled.text(), "first\nsecond\nthird");
}
