/// Hooks a caller can implement to observe long-running operations.
///
/// Every hook has a no-op default, so implementors pick only the ones
/// they care about.
pub trait ProgressListener: Send + Sync {
    fn set_status(&self, _status: &str) {}
    fn set_progress(&self, _progress: usize) {}
    fn set_max(&self, _max: usize) {}
}

/// Progress state threaded explicitly through each installation call.
///
/// Wraps an optional listener together with the current maximum, so the
/// maximum lives with the operation that set it instead of in shared
/// mutable state.
pub struct ProgressState<'a> {
    listener: Option<&'a dyn ProgressListener>,
    max: usize,
}

impl<'a> ProgressState<'a> {
    pub fn new(listener: &'a dyn ProgressListener) -> Self {
        Self {
            listener: Some(listener),
            max: 0,
        }
    }

    /// A state that swallows every report.
    pub fn none() -> ProgressState<'static> {
        ProgressState {
            listener: None,
            max: 0,
        }
    }

    pub fn status(&self, text: &str) {
        if let Some(listener) = self.listener {
            listener.set_status(text);
        }
    }

    pub fn set_progress(&self, progress: usize) {
        if let Some(listener) = self.listener {
            listener.set_progress(progress);
        }
    }

    pub fn set_max(&mut self, max: usize) {
        self.max = max;
        if let Some(listener) = self.listener {
            listener.set_max(max);
        }
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        statuses: Mutex<Vec<String>>,
        maxes: Mutex<Vec<usize>>,
    }

    impl ProgressListener for Recorder {
        fn set_status(&self, status: &str) {
            self.statuses.lock().unwrap().push(status.to_string());
        }

        fn set_max(&self, max: usize) {
            self.maxes.lock().unwrap().push(max);
        }
    }

    #[test]
    fn forwards_to_listener_and_tracks_max() {
        let recorder = Recorder::default();
        let mut progress = ProgressState::new(&recorder);
        progress.status("working");
        progress.set_max(7);
        assert_eq!(progress.max(), 7);
        assert_eq!(*recorder.statuses.lock().unwrap(), vec!["working"]);
        assert_eq!(*recorder.maxes.lock().unwrap(), vec![7]);
    }

    #[test]
    fn none_state_swallows_reports() {
        let mut progress = ProgressState::none();
        progress.status("ignored");
        progress.set_max(3);
        progress.set_progress(1);
        assert_eq!(progress.max(), 3);
    }
}
