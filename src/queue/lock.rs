use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A blocking binary lock that is not tied to a guard's lifetime, so it can
/// live in a shared map and be taken by whoever asks for the key next.
pub struct Lock {
    state: Mutex<bool>,
    wake: Condvar,
}

impl Default for Lock {
    fn default() -> Self {
        Self::new()
    }
}

impl Lock {
    pub fn new() -> Self {
        Lock {
            state: Mutex::new(false),
            wake: Condvar::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, bool> {
        // the flag stays meaningful even if a holder panicked
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn lock(&self) {
        let mut locked = self.state();
        while *locked {
            locked = self
                .wake
                .wait(locked)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *locked = true;
    }

    pub fn try_lock(&self) -> bool {
        let mut locked = self.state();
        if *locked {
            false
        } else {
            *locked = true;
            true
        }
    }

    pub fn unlock(&self) {
        let mut locked = self.state();
        if *locked {
            *locked = false;
            self.wake.notify_one();
        }
    }

    pub fn is_locked(&self) -> bool {
        *self.state()
    }
}
