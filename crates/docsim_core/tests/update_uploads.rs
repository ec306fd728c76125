use docsim_core::{update, AppState, Effect, FileId, FileRef, FileStatus, Msg, MEDIA_PDF};

fn with_files(names: &[&str]) -> (AppState, Vec<FileId>) {
    let files = names
        .iter()
        .map(|name| FileRef::new(*name, MEDIA_PDF, 1024))
        .collect();
    let (state, effects) = update(AppState::new(), Msg::FilesSelected(files));
    let ids = effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::StartUpload { file_id, .. } => Some(*file_id),
            _ => None,
        })
        .collect();
    (state, ids)
}

fn progress(state: AppState, file_id: FileId, value: u8) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::UploadProgress {
            file_id,
            progress: value,
        },
    )
}

#[test]
fn progress_advances_until_completed() {
    let (state, ids) = with_files(&["a.pdf"]);
    let id = ids[0];

    let (mut state, effects) = progress(state, id, 35);
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let row = state.view().files[0].clone();
    assert_eq!((row.progress, row.status), (35, FileStatus::Uploading));

    // Regressions and duplicates are not applied.
    let (mut state, _) = progress(state, id, 20);
    assert_eq!(state.view().files[0].progress, 35);
    assert!(!state.consume_dirty());

    let (state, effects) = progress(state, id, 117);
    let row = state.view().files[0].clone();
    assert_eq!((row.progress, row.status), (100, FileStatus::Completed));
    assert!(matches!(effects.as_slice(), [Effect::Notify(notice)] if notice.title == "Upload complete"));
}

#[test]
fn progress_never_observed_above_hundred() {
    let (mut state, ids) = with_files(&["a.pdf"]);
    for value in [10u8, 60, 95, 140, 255] {
        state = progress(state, ids[0], value).0;
        let view = state.view();
        let row = &view.files[0];
        assert!(row.progress <= 100);
        assert_eq!(row.progress == 100, row.status == FileStatus::Completed);
    }
}

#[test]
fn remove_mid_upload_cancels_and_ignores_late_ticks() {
    let (state, ids) = with_files(&["a.pdf", "b.pdf"]);
    let (state, _) = progress(state, ids[0], 40);

    let (state, effects) = update(state, Msg::RemoveClicked { file_id: ids[0] });
    assert_eq!(effects, vec![Effect::CancelUpload { file_id: ids[0] }]);
    assert!(state.registry().get(ids[0]).is_none());

    // A tick that was already in flight when the removal happened.
    let (mut state, effects) = progress(state, ids[0], 80);
    assert!(effects.is_empty());
    assert!(state.registry().get(ids[0]).is_none());
    let visible: Vec<_> = state.view().files.iter().map(|row| row.file_id).collect();
    assert_eq!(visible, vec![ids[1]]);
    state.consume_dirty();

    let (mut state, effects) = update(
        state,
        Msg::UploadFailed {
            file_id: ids[0],
            reason: "late".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn removing_completed_or_unknown_entry_needs_no_cancel() {
    let (state, ids) = with_files(&["a.pdf"]);
    let (state, _) = progress(state, ids[0], 100);

    let (state, effects) = update(state, Msg::RemoveClicked { file_id: ids[0] });
    assert!(effects.is_empty());
    assert!(state.registry().is_empty());

    let before = state.clone();
    let (after, effects) = update(state, Msg::RemoveClicked { file_id: ids[0] });
    assert!(effects.is_empty());
    assert_eq!(before, after);
}

#[test]
fn upload_failure_is_terminal() {
    let (state, ids) = with_files(&["broken.pdf"]);
    let (state, _) = progress(state, ids[0], 30);
    let (state, effects) = update(
        state,
        Msg::UploadFailed {
            file_id: ids[0],
            reason: "injected fault".to_string(),
        },
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notify(notice)] if notice.text == "broken.pdf: injected fault"
    ));

    let (state, _) = progress(state, ids[0], 100);
    let view = state.view();
    let row = &view.files[0];
    assert_eq!(row.status, FileStatus::Error);
    assert_eq!(row.progress, 30);
}
