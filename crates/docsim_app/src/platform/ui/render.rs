use docsim_core::{AppViewModel, FileRowView, FileStatus, GateState, Notice, NoticeLevel};

const BAR_WIDTH: usize = 20;

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut status_text = format!(
        "Files: {} | Completed: {} | Method: {} | Analysis: {} | Analyze: {}",
        view.file_count,
        view.completed_count,
        view.method,
        analysis_label(&view.analysis),
        if view.can_analyze && view.analysis == GateState::Idle {
            "enabled"
        } else {
            "disabled"
        }
    );
    if let Some(stats) = &view.last_intake {
        status_text.push_str(&format!(
            " | Last intake: added {}, skipped {}",
            stats.accepted, stats.skipped
        ));
    }

    let mut lines = Vec::with_capacity(view.files.len() + 1);
    lines.push(status_text);
    lines.extend(view.files.iter().map(format_file_row));
    lines
}

pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Warning => "warn",
    };
    format!("[{tag}] {}: {}", notice.title, notice.text)
}

fn format_file_row(row: &FileRowView) -> String {
    format!(
        "  [{id}] {bar} {progress:>3}% {status:<9} {name} ({size})",
        id = row.file_id,
        bar = progress_bar(row.progress),
        progress = row.progress,
        status = status_label(row.status),
        name = row.name,
        size = format_megabytes(row.size_bytes),
    )
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn status_label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Uploading => "Uploading",
        FileStatus::Completed => "OK",
        FileStatus::Error => "ERR",
    }
}

fn analysis_label(state: &GateState) -> String {
    match state {
        GateState::Idle => "Idle".to_string(),
        GateState::Running { method, .. } => format!("Running ({method})"),
        GateState::Done { method, .. } => format!("Done ({method})"),
        GateState::Failed { method, reason, .. } => format!("Failed ({method}: {reason})"),
    }
}

fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}
