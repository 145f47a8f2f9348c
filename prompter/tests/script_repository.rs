use prompter_core::{
    EditorEvent, EditorState, Error, Script, ScriptRepository, Selection, StyleKind,
};

mod support;
use support::memory_repo::MemoryRepo;

#[tokio::test]
async fn save_replaces_the_whole_record() {
    let repo = MemoryRepo::new();
    let mut script = Script::new("Opening", "Good evening");
    repo.save_script(script.clone()).await.unwrap();

    script.content = "Good morning".into();
    repo.save_script(script.clone()).await.unwrap();

    let all = repo.list_scripts().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].content, "Good morning");
    assert_eq!(repo.get_script(script.id).await.unwrap(), Some(script.clone()));

    repo.delete_script(script.id).await.unwrap();
    assert_eq!(repo.get_script(script.id).await.unwrap(), None);
}

#[tokio::test]
async fn import_creates_a_new_script() {
    let repo = MemoryRepo::new();
    let imported = repo.import_script("notes.txt", "line one").await.unwrap();
    assert_eq!(imported.title, "notes.txt");
    assert!(imported.formatting_data.is_empty());
    assert_eq!(repo.list_scripts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_save_keeps_the_editing_session() {
    let repo = MemoryRepo::new();
    let mut editor = EditorState::builder().title("Talk").text("Hello world").build();
    editor.handle_event(EditorEvent::SelectionChanged {
        selection: Selection::new(0, 5),
    });
    editor.handle_event(EditorEvent::ToggleStyle {
        kind: StyleKind::Bold,
    });

    repo.fail_writes(true);
    let err = repo.save_script(editor.to_script(None)).await.unwrap_err();
    assert!(matches!(err, Error::Storage(_)));
    assert_eq!(editor.ranges().len(), 1);

    repo.fail_writes(false);
    let script = editor.to_script(None);
    repo.save_script(script.clone()).await.unwrap();
    editor.mark_saved(&script);
    assert_eq!(
        repo.get_script(script.id).await.unwrap().map(|s| s.formatting_data),
        Some(r#"[{"start":0,"end":5,"formatType":"BOLD"}]"#.to_string())
    );
}

#[test]
fn list_filter_matches_title_or_content() {
    let script = Script::new("Quarterly Review", "Revenue grew in Q3");
    assert!(script.matches_query("quarterly"));
    assert!(script.matches_query("REVENUE"));
    assert!(script.matches_query(""));
    assert!(!script.matches_query("forecast"));
}
