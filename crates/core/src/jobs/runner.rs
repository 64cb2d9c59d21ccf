//! End-to-end execution of one job against an event sink.

use super::event::{translate_line, EventSink, JobEvent};
use super::kind::JobKind;
use super::launcher::{LaunchError, LaunchPlan};
use super::multiplexer::Multiplexer;
use super::outcome::{self, JobPhase, Lifecycle};

/// Summary returned to the caller for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub pid: Option<u32>,
    pub progress_lines: usize,
    /// The terminal event that was emitted.
    pub terminal: JobEvent,
}

/// Launch `plan`, stream its progress into `sink`, and emit exactly one
/// terminal event.
///
/// Event order on the sink: one `start` (only if the process spawned), any
/// number of `progress`, then one `error` or `complete`. A launch failure
/// emits a lone `error`.
pub async fn run_job<S>(
    kind: &JobKind,
    plan: &LaunchPlan,
    multiplexer: &Multiplexer,
    sink: &mut S,
) -> JobReport
where
    S: EventSink + ?Sized,
{
    let mut lifecycle = Lifecycle::new();

    let process = match plan.launch().await {
        Ok(process) => process,
        Err(err) => {
            let message = match &err {
                LaunchError::ScriptNotFound(path) => {
                    tracing::error!(job = kind.name(), path = %path.display(), "Job script not found");
                    kind.missing_script_message(&plan.script_file_name())
                }
                LaunchError::Spawn { .. } | LaunchError::MissingPipe(_) => {
                    tracing::error!(job = kind.name(), error = %err, "Failed to launch job");
                    kind.spawn_failure_message()
                }
            };
            let terminal = JobEvent::error(message);
            sink.emit(terminal.clone());
            transition(&mut lifecycle, JobPhase::Closed);
            return JobReport {
                pid: None,
                progress_lines: 0,
                terminal,
            };
        }
    };
    let pid = process.pid;
    transition(&mut lifecycle, JobPhase::Launched);
    tracing::info!(job = %kind, ?pid, "Job process started");

    sink.emit(JobEvent::start(kind.start_message()));
    transition(&mut lifecycle, JobPhase::Running);

    let (terminal, progress_lines) = match multiplexer
        .run(process, |line| {
            if let Some(event) = translate_line(&line) {
                sink.emit(event);
            }
        })
        .await
    {
        Ok(result) => {
            tracing::info!(
                job = %kind,
                ?pid,
                exit = ?result.exit,
                lines = result.progress_lines,
                stderr_lines = result.stderr.len(),
                "Job process finished"
            );
            let event = outcome::resolve(kind, &result);
            (event, result.progress_lines)
        }
        Err(err) => {
            tracing::error!(job = %kind, ?pid, error = %err, "Lost track of job process");
            (JobEvent::error(kind.failure_message(&err.to_string())), 0)
        }
    };
    transition(&mut lifecycle, JobPhase::Resolved);

    sink.emit(terminal.clone());
    transition(&mut lifecycle, JobPhase::Closed);

    JobReport {
        pid,
        progress_lines,
        terminal,
    }
}

fn transition(lifecycle: &mut Lifecycle, next: JobPhase) {
    if let Err(err) = lifecycle.advance(next) {
        tracing::error!(error = %err, "Job lifecycle violated");
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::jobs::event::JobEventKind;
    use crate::jobs::test_helpers::{sh_plan, write_script, GRACE};

    fn technology() -> JobKind {
        JobKind::Recategorize {
            category_id: 7,
            category_name: "Technology".into(),
        }
    }

    async fn run(body: Option<&str>) -> Vec<JobEvent> {
        let dir = tempfile::tempdir().unwrap();
        if let Some(body) = body {
            write_script(dir.path(), "recategorize_articles.sh", body);
        }
        let plan = sh_plan(dir.path(), "recategorize_articles.sh", technology().args());
        let mut events = Vec::new();
        run_job(&technology(), &plan, &Multiplexer::new(GRACE), &mut events).await;
        events
    }

    fn kinds(events: &[JobEvent]) -> Vec<JobEventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[tokio::test]
    async fn silent_success_is_start_then_complete() {
        let events = run(Some("exit 0")).await;
        assert_eq!(
            events,
            vec![
                JobEvent::start("Starting recategorization for \"Technology\"..."),
                JobEvent::complete("Recategorization complete for \"Technology\"."),
            ]
        );
    }

    #[tokio::test]
    async fn progress_lines_arrive_between_start_and_complete() {
        let events = run(Some("echo \"category $1\"; echo 'Processed 10/20'; echo 'Processed 20/20'")).await;

        assert_eq!(
            kinds(&events),
            vec![
                JobEventKind::Start,
                JobEventKind::Progress,
                JobEventKind::Progress,
                JobEventKind::Progress,
                JobEventKind::Complete,
            ]
        );
        assert_eq!(events[1].message, "category 7");
        assert_eq!(events[3].message, "Processed 20/20");
    }

    #[tokio::test]
    async fn failure_carries_stderr() {
        let events = run(Some("echo 'bad input' >&2; exit 2")).await;
        assert_eq!(
            events.last().unwrap(),
            &JobEvent::error("Recategorization failed: bad input")
        );
        assert_eq!(events.len(), 2);
    }

    #[tokio::test]
    async fn missing_script_is_the_only_event() {
        let events = run(None).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, JobEventKind::Error);
        assert!(events[0].message.contains("script not found"));
        assert!(events[0].message.contains("recategorize_articles.sh"));
    }

    #[tokio::test]
    async fn spawn_failure_is_the_only_event() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "job.sh", "exit 0");
        let plan = LaunchPlan {
            runtime: crate::jobs::launcher::Runtime::Interpreter {
                local: "venv/bin/none".into(),
                system: "no-such-interpreter-for-tests".into(),
            },
            ..sh_plan(dir.path(), "job.sh", vec![])
        };
        let mut events = Vec::new();

        let report = run_job(&JobKind::Scrape, &plan, &Multiplexer::new(GRACE), &mut events).await;

        assert_eq!(events, vec![JobEvent::error("Failed to start scraper")]);
        assert_eq!(report.pid, None);
    }

    #[tokio::test]
    async fn exactly_one_start_and_one_terminal() {
        let events = run(Some("echo a; echo b >&2; echo c; exit 1")).await;

        let starts = events.iter().filter(|e| e.kind == JobEventKind::Start).count();
        let terminals = events.iter().filter(|e| e.is_terminal()).count();
        assert_eq!(starts, 1);
        assert_eq!(terminals, 1);
        assert_eq!(events.first().unwrap().kind, JobEventKind::Start);
        assert!(events.last().unwrap().is_terminal());
        assert_eq!(events.last().unwrap().message, "Recategorization failed: b");
    }

    #[tokio::test]
    async fn report_counts_progress_lines() {
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "run_scrape.sh", "echo one; echo two; printf three");
        let plan = sh_plan(dir.path(), "run_scrape.sh", vec![]);
        let mut events = Vec::new();

        let report = run_job(&JobKind::Scrape, &plan, &Multiplexer::new(GRACE), &mut events).await;

        assert_eq!(report.progress_lines, 3);
        assert_eq!(report.terminal, JobEvent::complete("Scraping completed successfully!"));
        assert!(report.pid.is_some());
    }
}
