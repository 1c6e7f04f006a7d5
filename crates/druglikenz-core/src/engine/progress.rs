use std::fmt;

/// The sequential stages of one screening run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Deduplicating,
    ComputingDescriptors,
    EvaluatingRules,
}

impl Stage {
    pub const fn label(self) -> &'static str {
        match self {
            Stage::Deduplicating => "Deduplicating",
            Stage::ComputingDescriptors => "Computing Descriptors",
            Stage::EvaluatingRules => "Evaluating Rules",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Events emitted while a library is screened.
///
/// Every `StageStart` is matched by a `StageFinish`. Stages that walk the structures
/// wrap their per-row `StructureDone` events in `RowsStart`/`RowsFinish`. Under the
/// `parallel` feature `StructureDone` arrives from worker threads in completion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    StageStart { stage: Stage },
    StageFinish { stage: Stage },

    RowsStart { total: u64 },
    StructureDone,
    RowsFinish,

    /// A structure string failed to parse and was left out of the table.
    StructureSkipped { key: String },
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards screening events to an optional callback; silent without one.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(callback) = &self.callback {
            callback(event);
        }
    }

    /// Runs `body` between the start and finish events of `stage`.
    ///
    /// The finish event is only sent when `body` returns, so an early `?` inside it
    /// leaves the stage open.
    pub fn stage<T>(&self, stage: Stage, body: impl FnOnce() -> T) -> T {
        self.report(Progress::StageStart { stage });
        let value = body();
        self.report(Progress::StageFinish { stage });
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn silent_reporter_ignores_events() {
        ProgressReporter::new().report(Progress::StructureDone);
    }

    #[test]
    fn stage_labels_match_display() {
        for stage in [
            Stage::Deduplicating,
            Stage::ComputingDescriptors,
            Stage::EvaluatingRules,
        ] {
            assert_eq!(stage.to_string(), stage.label());
        }
        assert_eq!(Stage::ComputingDescriptors.label(), "Computing Descriptors");
    }

    #[test]
    fn stage_brackets_the_body() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            seen.lock().unwrap().push(event);
        }));
        let unique = reporter.stage(Stage::Deduplicating, || {
            reporter.report(Progress::StructureSkipped {
                key: "row-3".to_string(),
            });
            7
        });
        drop(reporter);

        assert_eq!(unique, 7);
        assert_eq!(
            seen.into_inner().unwrap(),
            vec![
                Progress::StageStart {
                    stage: Stage::Deduplicating
                },
                Progress::StructureSkipped {
                    key: "row-3".to_string()
                },
                Progress::StageFinish {
                    stage: Stage::Deduplicating
                },
            ]
        );
    }
}
