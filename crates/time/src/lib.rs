pub use chrono;

use std::{
    sync::Arc,
    thread::JoinHandle,
    time::Duration as StdDuration,
};

use chrono::{DateTime, Duration, Utc};
use log::info;
use parking_lot::{Condvar, Mutex};

/// Source of "now" for everything that needs the current time. The
/// composition root decides whether that is the wall clock or the
/// simulated one.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct ClockState {
    current: DateTime<Utc>,
    multiplier: f32,
    paused: bool,
    running: bool,
}

struct Shared {
    state: Mutex<ClockState>,
    wakeup: Condvar,
}

/// Simulated application clock: a background thread advances one simulated
/// second every `1 / multiplier` real seconds. State lives behind a mutex;
/// pause/resume and shutdown go through the condvar so the ticker reacts
/// without waiting out a full tick.
pub struct SimClock {
    shared: Arc<Shared>,
    ticker: Option<JoinHandle<()>>,
}

impl SimClock {
    pub fn start(multiplier: f32) -> SimClock {
        SimClock::start_at(Utc::now(), multiplier)
    }

    pub fn start_at(epoch: DateTime<Utc>, multiplier: f32) -> SimClock {
        SimClock::spawn(epoch, multiplier, false)
    }

    /// Starts with the ticker idle; `resume` begins the advance. Useful
    /// when the time base must stay fixed until the caller says otherwise.
    pub fn start_paused(epoch: DateTime<Utc>, multiplier: f32) -> SimClock {
        SimClock::spawn(epoch, multiplier, true)
    }

    fn spawn(epoch: DateTime<Utc>, multiplier: f32, paused: bool) -> SimClock {
        let shared = Arc::new(Shared {
            state: Mutex::new(ClockState {
                current: epoch,
                multiplier: multiplier.max(MIN_MULTIPLIER),
                paused,
                running: true,
            }),
            wakeup: Condvar::new(),
        });

        let ticker_shared = shared.clone();
        let ticker = std::thread::spawn(move || tick_loop(&ticker_shared));

        SimClock {
            shared,
            ticker: Some(ticker),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.shared.state.lock().current
    }

    pub fn multiplier(&self) -> f32 {
        self.shared.state.lock().multiplier
    }

    pub fn set_multiplier(&self, multiplier: f32) {
        let mut state = self.shared.state.lock();
        state.multiplier = multiplier.max(MIN_MULTIPLIER);
        self.shared.wakeup.notify_all();
    }

    pub fn advance_days(&self, days: i64) {
        let mut state = self.shared.state.lock();
        state.current += Duration::days(days);
    }

    pub fn pause(&self) {
        let mut state = self.shared.state.lock();
        state.paused = true;
        self.shared.wakeup.notify_all();
    }

    pub fn resume(&self) {
        let mut state = self.shared.state.lock();
        state.paused = false;
        self.shared.wakeup.notify_all();
    }

    pub fn is_paused(&self) -> bool {
        self.shared.state.lock().paused
    }
}

const MIN_MULTIPLIER: f32 = 0.001;

fn tick_loop(shared: &Shared) {
    loop {
        let mut state = shared.state.lock();
        while state.paused && state.running {
            shared.wakeup.wait(&mut state);
        }
        if !state.running {
            break;
        }

        let interval = StdDuration::from_secs_f32(1.0 / state.multiplier);
        let timed_out = shared.wakeup.wait_for(&mut state, interval).timed_out();
        if !state.running {
            break;
        }
        if timed_out && !state.paused {
            state.current += Duration::seconds(1);
        }
    }
}

impl Clock for SimClock {
    fn now(&self) -> DateTime<Utc> {
        SimClock::now(self)
    }
}

impl Drop for SimClock {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.running = false;
            self.shared.wakeup.notify_all();
        }
        if let Some(ticker) = self.ticker.take() {
            if ticker.join().is_err() {
                info!("Clock ticker thread did not shut down cleanly");
            }
        }
    }
}
