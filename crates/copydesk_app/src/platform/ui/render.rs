use copydesk_core::{
    AppViewModel, Author, Intent, JobRowView, JobStatus, Quadrant, QuadrantTitles,
    ResultViewModel, Stage, ToastId, ToastKind, ToastView,
};

/// Turns successive view models into terminal lines, printing only what changed.
#[derive(Debug, Default)]
pub struct Renderer {
    last_location: String,
    last_toast: ToastId,
    last_quadrants: QuadrantTitles,
    last_progress: Option<ProgressKey>,
    printed_result: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
struct ProgressKey {
    job_id: String,
    status: JobStatus,
    stage: Stage,
    progress: u8,
    polling: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if view.location != self.last_location {
            lines.push(format!("[{}]", view.location));
            self.last_location = view.location.clone();
        }

        if view.titles.quadrants != self.last_quadrants {
            if !view.titles.quadrants.is_empty() {
                lines.extend(format_quadrants(&view.titles.quadrants));
            }
            self.last_quadrants = view.titles.quadrants.clone();
        }

        if let Some(result) = &view.result {
            self.render_result(result, &mut lines);
        } else {
            self.last_progress = None;
        }

        for toast in view.toasts.iter().filter(|t| t.id > self.last_toast) {
            lines.push(format_toast(toast));
        }
        if let Some(newest) = view.toasts.iter().map(|t| t.id).max() {
            self.last_toast = self.last_toast.max(newest);
        }

        lines
    }

    fn render_result(&mut self, result: &ResultViewModel, lines: &mut Vec<String>) {
        let key = ProgressKey {
            job_id: result.job_id.clone(),
            status: result.status,
            stage: result.stage,
            progress: result.progress,
            polling: result.polling,
        };
        if self.last_progress.as_ref() != Some(&key) {
            lines.push(format_progress(result));
            self.last_progress = Some(key);
        }

        let printed = self.printed_result.as_deref() == Some(result.job_id.as_str());
        if let (Some(a), Some(b), false) = (&result.final_a, &result.final_b, printed) {
            lines.push(format!("===== {} : variant A =====", result.title));
            lines.push(a.clone());
            lines.push(format!("===== {} : variant B =====", result.title));
            lines.push(b.clone());
            self.printed_result = Some(result.job_id.clone());
        }
    }
}

pub fn format_progress(result: &ResultViewModel) -> String {
    let mut line = format!(
        "job {} | {} | {} | {:>3}% {}",
        result.job_id,
        result.status.label(),
        result.stage.label(),
        result.progress,
        progress_bar(result.progress)
    );
    if !result.polling && !result.status.is_terminal() {
        line.push_str(" (paused)");
    }
    if let Some(message) = result.message.as_deref().filter(|m| !m.is_empty()) {
        line.push_str(" - ");
        line.push_str(message);
    }
    line
}

fn progress_bar(progress: u8) -> String {
    const WIDTH: usize = 20;
    let filled = usize::from(progress.min(100)) * WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(WIDTH - filled))
}

/// Candidates numbered `quadrant.index`, both starting at 1.
pub fn format_quadrants(quadrants: &QuadrantTitles) -> Vec<String> {
    let mut lines = Vec::new();
    for (q, quadrant) in Quadrant::ALL.iter().enumerate() {
        let titles = quadrants.get(*quadrant);
        if titles.is_empty() {
            continue;
        }
        lines.push(format!("{}. {}", q + 1, quadrant.label()));
        for (i, title) in titles.iter().enumerate() {
            lines.push(format!("  {}.{} {}", q + 1, i + 1, title));
        }
    }
    lines
}

pub fn format_authors(authors: &[Author]) -> Vec<String> {
    if authors.is_empty() {
        return vec!["(no authors yet)".to_string()];
    }
    authors
        .iter()
        .enumerate()
        .map(|(i, author)| match author.description.as_deref() {
            Some(description) => format!("  {}. {} - {}", i + 1, author.name, description),
            None => format!("  {}. {}", i + 1, author.name),
        })
        .collect()
}

pub fn format_voices(voices: &[String], selected: Option<&str>) -> Vec<String> {
    voices
        .iter()
        .enumerate()
        .map(|(i, voice)| {
            let marker = if Some(voice.as_str()) == selected { "*" } else { " " };
            format!(" {}{}. {}", marker, i + 1, voice)
        })
        .collect()
}

pub fn format_intents() -> Vec<String> {
    Intent::ALL
        .iter()
        .enumerate()
        .map(|(i, intent)| format!("  {}. {:<16} {}", i + 1, intent.key(), intent.label()))
        .collect()
}

pub fn format_jobs(jobs: &[JobRowView]) -> Vec<String> {
    if jobs.is_empty() {
        return vec!["(no jobs in this session)".to_string()];
    }
    jobs.iter()
        .enumerate()
        .map(|(i, job)| {
            format!(
                "  {}. {} [{} / {}] {}",
                i + 1,
                job.job_id,
                job.status.label(),
                job.stage.label(),
                job.title
            )
        })
        .collect()
}

fn format_toast(toast: &ToastView) -> String {
    let tag = match toast.kind {
        ToastKind::Info => "info",
        ToastKind::Success => "ok",
        ToastKind::Error => "error",
    };
    format!("{tag}: {}", toast.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use copydesk_core::Route;
    use pretty_assertions::assert_eq;

    fn result_view(status: JobStatus, stage: Stage, progress: u8) -> ResultViewModel {
        ResultViewModel {
            job_id: "job-1".to_string(),
            title: "焦虑与睡眠".to_string(),
            stage,
            status,
            progress,
            message: None,
            polling: true,
            loading_result: false,
            final_a: None,
            final_b: None,
            variants: None,
        }
    }

    fn toast(id: ToastId, kind: ToastKind, message: &str) -> ToastView {
        ToastView {
            id,
            kind,
            message: message.to_string(),
        }
    }

    #[test]
    fn prints_each_toast_once() {
        let mut renderer = Renderer::new();
        let mut view = AppViewModel {
            location: "/".to_string(),
            toasts: vec![toast(1, ToastKind::Info, "enter at least one keyword")],
            ..AppViewModel::default()
        };

        assert_eq!(
            renderer.render(&view),
            vec!["[/]".to_string(), "info: enter at least one keyword".to_string()]
        );

        view.toasts.push(toast(2, ToastKind::Error, "boom"));
        assert_eq!(renderer.render(&view), vec!["error: boom".to_string()]);

        view.toasts.clear();
        assert!(renderer.render(&view).is_empty());
    }

    #[test]
    fn progress_line_only_on_change() {
        let mut renderer = Renderer::new();
        let mut view = AppViewModel {
            route: Route::result("job-1"),
            location: "/result/job-1".to_string(),
            result: Some(result_view(JobStatus::Running, Stage::P2, 60)),
            ..AppViewModel::default()
        };

        let lines = renderer.render(&view);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "job job-1 | running | template injection (P2) |  60% [############........]"
        );
        assert!(renderer.render(&view).is_empty());

        if let Some(result) = view.result.as_mut() {
            result.polling = false;
        }
        assert_eq!(
            renderer.render(&view),
            vec![
                "job job-1 | running | template injection (P2) |  60% [############........] (paused)"
                    .to_string()
            ]
        );
    }

    #[test]
    fn finals_print_once_per_job() {
        let mut renderer = Renderer::new();
        let mut result = result_view(JobStatus::Done, Stage::Done, 100);
        result.final_a = Some("A body".to_string());
        result.final_b = Some("B body".to_string());
        let view = AppViewModel {
            location: "/result/job-1".to_string(),
            result: Some(result),
            ..AppViewModel::default()
        };

        let lines = renderer.render(&view);
        assert!(lines.contains(&"A body".to_string()));
        assert!(lines.contains(&"B body".to_string()));
        assert!(renderer.render(&view).is_empty());
    }

    #[test]
    fn quadrants_are_numbered_for_selection() {
        let quadrants = QuadrantTitles {
            behavior: vec!["b1".to_string(), "b2".to_string()],
            emotion: Vec::new(),
            mechanism: vec!["m1".to_string()],
            philosophy: Vec::new(),
        };
        let lines = format_quadrants(&quadrants);
        assert_eq!(lines[1], "  1.1 b1");
        assert_eq!(lines[2], "  1.2 b2");
        assert_eq!(lines[4], "  3.1 m1");
    }

    #[test]
    fn selected_voice_is_marked() {
        let voices = vec!["温和".to_string(), "犀利".to_string()];
        assert_eq!(
            format_voices(&voices, Some("犀利")),
            vec!["  1. 温和".to_string(), " *2. 犀利".to_string()]
        );
    }
}
