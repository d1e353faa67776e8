use std::fmt;

/// Identifies one built primitive set.
///
/// A builder issues a new, strictly increasing version for every rebuild, so a token
/// held by a caller can always be compared against the builder's current one to tell
/// whether it is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneVersion(u64);

impl SceneVersion {
    pub(crate) fn first() -> Self {
        Self(1)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SceneVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

pub type ReadyCallback<'a> = Box<dyn FnMut(SceneVersion) + 'a>;

/// Edge-triggered "geometry exists" notification.
///
/// Fires at most once per version; notifying the same version again is a no-op.
#[derive(Default)]
pub struct ReadySignal<'a> {
    callback: Option<ReadyCallback<'a>>,
    last_notified: Option<SceneVersion>,
}

impl<'a> ReadySignal<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ReadyCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
            last_notified: None,
        }
    }

    /// Notifies the callback for `version` unless it was already notified.
    ///
    /// Returns `true` if this call was the one that fired.
    pub fn notify(&mut self, version: SceneVersion) -> bool {
        if self.last_notified == Some(version) {
            return false;
        }
        self.last_notified = Some(version);
        if let Some(cb) = self.callback.as_mut() {
            cb(version);
        }
        true
    }
}
